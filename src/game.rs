//! The game session: entity collections, the per-tick pipeline
//! (input -> simulate -> collide), splitting, and the win/lose machine.

use rand::Rng;
use std::rc::Rc;

use crate::entity::{collides, Entity, Kind, SizeClass};
use crate::space::Space;
use crate::sprite::SpriteSet;
use crate::vec2::{self, Vec2};

pub const WORLD_WIDTH: f32 = 160.0;
pub const WORLD_HEIGHT: f32 = 112.0;
pub const ASTEROID_COUNT: usize = 6;
pub const EXPLOSION_TICKS: u32 = 30;

const ROTATION_DEG: f32 = 3.0;
const THRUST_ACCEL: f32 = 0.08;
const BULLET_BOOST: f32 = 2.0;
const ASTEROID_DRIFT: f32 = 0.45;
const ASTEROID_SPIN: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn text(self) -> &'static str {
        match self {
            Outcome::Won => "You won!",
            Outcome::Lost => "You lost!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipState {
    Flying,
    Exploding { frame: u32 },
    Removed,
}

/// Edge-triggered control intents, queued by the key handler and consumed at
/// the start of the next tick.
#[derive(Default)]
struct Intents {
    rotate_left: bool,
    rotate_right: bool,
    thrust: bool,
    fire: bool,
}

pub struct Game {
    pub space: Space,
    sprites: SpriteSet,
    pub ship: Entity,
    pub ship_state: ShipState,
    pub asteroids: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub outcome: Option<Outcome>,
    pub paused: bool,
    pub tick_count: u64,
    intents: Intents,
    bell: bool,
}

impl Game {
    pub fn new() -> Self {
        let space = Space::new(WORLD_WIDTH, WORLD_HEIGHT);
        let sprites = SpriteSet::load();

        let ship = Entity::new(
            Kind::Ship,
            Rc::clone(&sprites.ship),
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            Vec2::ZERO,
        );

        let asteroids = (0..ASTEROID_COUNT)
            .map(|_| {
                spawn_asteroid(
                    &sprites,
                    vec2::random_ring_pos(WORLD_WIDTH, WORLD_HEIGHT),
                    SizeClass::Big,
                )
            })
            .collect();

        Game {
            space,
            sprites,
            ship,
            ship_state: ShipState::Flying,
            asteroids,
            bullets: Vec::new(),
            outcome: None,
            paused: false,
            tick_count: 0,
            intents: Intents::default(),
            bell: false,
        }
    }

    // ── Control surface ────────────────────────────────────────────────

    pub fn press_rotate_left(&mut self) {
        self.intents.rotate_left = true;
    }

    pub fn press_rotate_right(&mut self) {
        self.intents.rotate_right = true;
    }

    pub fn press_thrust(&mut self) {
        self.intents.thrust = true;
    }

    pub fn press_fire(&mut self) {
        self.intents.fire = true;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Start a fresh session. Only honored once the current one is over.
    pub fn restart(&mut self) {
        if self.outcome.is_some() {
            *self = Game::new();
        }
    }

    pub fn status_text(&self) -> Option<&'static str> {
        self.outcome.map(Outcome::text)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// One-shot sound cue, drained by the shell each frame.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    // ── Per-tick pipeline ──────────────────────────────────────────────

    pub fn tick(&mut self) {
        if self.paused {
            self.intents = Intents::default();
            return;
        }
        self.tick_count += 1;

        self.apply_intents();
        self.advance_ship();
        for rock in &mut self.asteroids {
            rock.update(&self.space);
        }
        for bullet in &mut self.bullets {
            bullet.update(&self.space);
        }
        self.bullets.retain(|b| b.alive);

        self.resolve_collisions();
    }

    /// Queued input mutates the ship before simulation. Rotation keys are
    /// mutually exclusive within a tick; clockwise wins when both are held.
    fn apply_intents(&mut self) {
        let intents = std::mem::take(&mut self.intents);
        if self.ship_state != ShipState::Flying {
            return;
        }

        if intents.rotate_right {
            self.ship.turn(ROTATION_DEG);
        } else if intents.rotate_left {
            self.ship.turn(-ROTATION_DEG);
        }

        if intents.thrust {
            self.ship.vel += self.ship.dir * THRUST_ACCEL;
        }

        if intents.fire {
            self.fire();
        }
    }

    fn fire(&mut self) {
        let mut bullet = Entity::new(
            Kind::Bullet,
            Rc::clone(&self.sprites.bullet),
            self.ship.pos,
            self.ship.vel + self.ship.dir * BULLET_BOOST,
        );
        bullet.dir = self.ship.dir;
        self.bullets.push(bullet);
        self.bell = true;
    }

    fn advance_ship(&mut self) {
        match self.ship_state {
            ShipState::Flying => self.ship.update(&self.space),
            ShipState::Exploding { frame } => {
                // The wreck holds position; only the animation advances.
                self.ship_state = if frame + 1 >= EXPLOSION_TICKS {
                    self.ship.alive = false;
                    ShipState::Removed
                } else {
                    ShipState::Exploding { frame: frame + 1 }
                };
            }
            ShipState::Removed => {}
        }
    }

    /// Collision pass: ship vs rocks, then bullets vs rocks. Removals and
    /// split children are deferred past iteration so the pass never reads a
    /// killed entity.
    fn resolve_collisions(&mut self) {
        if self.ship_state == ShipState::Flying
            && self
                .asteroids
                .iter()
                .any(|rock| collides(&self.ship, rock, &self.space))
        {
            self.ship_state = ShipState::Exploding { frame: 0 };
            self.bell = true;
            if self.outcome.is_none() {
                self.outcome = Some(Outcome::Lost);
            }
        }

        let mut dead_bullets = vec![false; self.bullets.len()];
        let mut dead_rocks = vec![false; self.asteroids.len()];
        let mut splits: Vec<(Vec2, SizeClass)> = Vec::new();

        for (bi, bullet) in self.bullets.iter().enumerate() {
            for (ai, rock) in self.asteroids.iter().enumerate() {
                if dead_rocks[ai] {
                    continue;
                }
                if collides(bullet, rock, &self.space) {
                    dead_bullets[bi] = true;
                    dead_rocks[ai] = true;
                    if let Kind::Asteroid(size) = rock.kind {
                        splits.push((rock.pos, size));
                    }
                    break;
                }
            }
        }

        let mut bi = 0;
        self.bullets.retain(|_| {
            let keep = !dead_bullets[bi];
            bi += 1;
            keep
        });
        let mut ai = 0;
        self.asteroids.retain(|_| {
            let keep = !dead_rocks[ai];
            ai += 1;
            keep
        });

        for (pos, size) in splits {
            self.split_asteroid(pos, size);
        }

        if self.asteroids.is_empty() && self.outcome.is_none() {
            self.outcome = Some(Outcome::Won);
        }
    }

    /// A destroyed rock leaves two children one class smaller at its spot,
    /// each with a fresh independent velocity draw. Small rocks just vanish.
    fn split_asteroid(&mut self, pos: Vec2, size: SizeClass) {
        if let Some(child) = size.split() {
            for _ in 0..2 {
                let rock = spawn_asteroid(&self.sprites, pos, child);
                self.asteroids.push(rock);
            }
        }
    }
}

fn spawn_asteroid(sprites: &SpriteSet, pos: Vec2, size: SizeClass) -> Entity {
    let mut rock = Entity::new(
        Kind::Asteroid(size),
        sprites.asteroid(size),
        pos,
        vec2::random_drift(ASTEROID_DRIFT),
    );
    rock.spin = rand::thread_rng().gen_range(-ASTEROID_SPIN..ASTEROID_SPIN);
    rock
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Park a still, spinless rock of the given size at `pos`.
    fn place_rock(game: &mut Game, pos: Vec2, size: SizeClass) {
        let mut rock = spawn_asteroid(&game.sprites, pos, size);
        rock.vel = Vec2::ZERO;
        rock.spin = 0.0;
        game.asteroids = vec![rock];
    }

    fn place_bullet(game: &mut Game, pos: Vec2) {
        let mut bullet = Entity::new(
            Kind::Bullet,
            Rc::clone(&game.sprites.bullet),
            pos,
            Vec2::ZERO,
        );
        bullet.dir = crate::vec2::UP;
        game.bullets.push(bullet);
    }

    #[test]
    fn new_session_has_six_big_rocks_and_a_flying_ship() {
        let game = Game::new();
        assert_eq!(game.asteroids.len(), ASTEROID_COUNT);
        assert!(game
            .asteroids
            .iter()
            .all(|a| a.kind == Kind::Asteroid(SizeClass::Big)));
        assert_eq!(game.ship_state, ShipState::Flying);
        assert!(game.outcome.is_none());
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn spawned_rocks_lie_within_the_screen_after_one_tick() {
        let mut game = Game::new();
        game.tick();
        for rock in &game.asteroids {
            assert!(rock.pos.x >= 0.0 && rock.pos.x < WORLD_WIDTH);
            assert!(rock.pos.y >= 0.0 && rock.pos.y < WORLD_HEIGHT);
        }
    }

    #[test]
    fn firing_spawns_a_boosted_bullet_and_rings_the_bell() {
        let mut game = Game::new();
        game.asteroids.clear();
        game.outcome = None;
        game.press_fire();
        game.tick();
        assert_eq!(game.bullets.len(), 1);
        let b = &game.bullets[0];
        // Ship starts at rest facing up, so the bullet climbs at boost speed.
        assert!(b.vel.y < -1.9, "bullet vel was {:?}", b.vel);
        assert!(game.take_bell());
        assert!(!game.take_bell(), "bell is one-shot");
    }

    #[test]
    fn firing_without_a_flying_ship_is_a_noop() {
        let mut game = Game::new();
        game.ship_state = ShipState::Removed;
        game.press_fire();
        game.tick();
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn both_rotation_keys_resolve_clockwise() {
        let mut game = Game::new();
        game.press_rotate_left();
        game.press_rotate_right();
        game.tick();
        let angle = game.ship.dir.angle_deg();
        assert!((angle - 3.0).abs() < 1e-3, "angle was {}", angle);
    }

    #[test]
    fn thrust_accelerates_along_the_heading_without_clamp() {
        let mut game = Game::new();
        game.asteroids.clear();
        game.outcome = None;
        for _ in 0..200 {
            game.press_thrust();
            game.tick();
        }
        // 200 ticks of thrust straight up; no max-speed cap applies.
        assert!(game.ship.vel.y < -15.0, "vel was {:?}", game.ship.vel);
    }

    #[test]
    fn bullet_hit_splits_big_into_two_medium() {
        let mut game = Game::new();
        let spot = Vec2::new(40.0, 30.0);
        place_rock(&mut game, spot, SizeClass::Big);
        place_bullet(&mut game, spot);
        game.tick();
        assert_eq!(game.asteroids.len(), 2);
        assert!(game
            .asteroids
            .iter()
            .all(|a| a.kind == Kind::Asteroid(SizeClass::Medium)));
        assert!(game.bullets.is_empty(), "the bullet is spent");
        assert!(game.outcome.is_none());
    }

    #[test]
    fn medium_splits_into_two_small() {
        let mut game = Game::new();
        let spot = Vec2::new(40.0, 30.0);
        place_rock(&mut game, spot, SizeClass::Medium);
        place_bullet(&mut game, spot);
        game.tick();
        assert_eq!(game.asteroids.len(), 2);
        assert!(game
            .asteroids
            .iter()
            .all(|a| a.kind == Kind::Asteroid(SizeClass::Small)));
    }

    #[test]
    fn small_rock_vanishes_and_wins_the_session() {
        let mut game = Game::new();
        let spot = Vec2::new(40.0, 30.0);
        place_rock(&mut game, spot, SizeClass::Small);
        place_bullet(&mut game, spot);
        game.tick();
        assert!(game.asteroids.is_empty());
        assert_eq!(game.outcome, Some(Outcome::Won));
        assert_eq!(game.status_text(), Some("You won!"));
    }

    #[test]
    fn win_is_not_retriggered_or_overwritten() {
        let mut game = Game::new();
        game.asteroids.clear();
        game.tick();
        assert_eq!(game.outcome, Some(Outcome::Won));
        game.tick();
        assert_eq!(game.outcome, Some(Outcome::Won));

        // A lost session with no rocks left must stay lost.
        let mut game = Game::new();
        game.asteroids.clear();
        game.outcome = Some(Outcome::Lost);
        game.tick();
        assert_eq!(game.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn ship_collision_explodes_once_and_loses_immediately() {
        let mut game = Game::new();
        let ship_pos = game.ship.pos;
        place_rock(&mut game, ship_pos, SizeClass::Big);
        game.tick();
        assert!(matches!(game.ship_state, ShipState::Exploding { .. }));
        assert_eq!(game.outcome, Some(Outcome::Lost));
        assert_eq!(game.status_text(), Some("You lost!"));

        // Status is set before the animation finishes; the ship is removed
        // only once the animation has run its course.
        for _ in 0..EXPLOSION_TICKS {
            game.tick();
        }
        assert_eq!(game.ship_state, ShipState::Removed);
        assert!(!game.ship.alive);
        assert_eq!(game.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn exploding_ship_ignores_input() {
        let mut game = Game::new();
        let ship_pos = game.ship.pos;
        place_rock(&mut game, ship_pos, SizeClass::Big);
        game.tick();
        let dir = game.ship.dir;
        game.press_rotate_right();
        game.press_fire();
        game.tick();
        assert_eq!(game.ship.dir, dir);
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn pause_freezes_simulation_and_collisions() {
        let mut game = Game::new();
        let spot = Vec2::new(40.0, 30.0);
        place_rock(&mut game, spot, SizeClass::Big);
        game.asteroids[0].vel = Vec2::new(1.0, 0.0);
        game.paused = true;
        let before = game.asteroids[0].pos;
        let ticks = game.tick_count;
        game.tick();
        game.tick();
        assert_eq!(game.asteroids[0].pos, before);
        assert_eq!(game.tick_count, ticks);
    }

    #[test]
    fn restart_is_gated_on_game_over() {
        let mut game = Game::new();
        game.asteroids.clear();
        game.restart();
        assert!(
            game.asteroids.is_empty(),
            "restart must be ignored mid-session"
        );

        game.tick(); // rocks are gone, so this wins
        assert!(game.is_over());
        game.restart();
        assert_eq!(game.asteroids.len(), ASTEROID_COUNT);
        assert!(game.outcome.is_none());
        assert_eq!(game.ship_state, ShipState::Flying);
    }
}
