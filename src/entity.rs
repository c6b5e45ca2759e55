//! The single moving-object representation shared by the ship, asteroids and
//! bullets, plus the mirror-aware two-phase collision test.

use std::rc::Rc;

use crate::space::Space;
use crate::sprite::{Mask, Shape};
use crate::vec2::{Vec2, UP};

/// Masks are re-rasterized only when the facing crosses into a new step,
/// matching the ship's per-tick rotation increment.
const ANGLE_STEP_DEG: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    Big,
    Medium,
    Small,
}

impl SizeClass {
    /// The class produced by splitting, one step smaller. `Small` rocks
    /// vanish without children.
    pub fn split(self) -> Option<SizeClass> {
        match self {
            SizeClass::Big => Some(SizeClass::Medium),
            SizeClass::Medium => Some(SizeClass::Small),
            SizeClass::Small => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Ship,
    Asteroid(SizeClass),
    Bullet,
}

pub struct Entity {
    pub kind: Kind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub dir: Vec2,
    /// Constant heading rotation in degrees per tick; cosmetic spin for rocks.
    pub spin: f32,
    pub alive: bool,
    shape: Rc<Shape>,
    mask: Mask,
    mask_step: i32,
}

impl Entity {
    pub fn new(kind: Kind, shape: Rc<Shape>, pos: Vec2, vel: Vec2) -> Self {
        let mask = shape.rasterize(0.0);
        Entity {
            kind,
            pos,
            vel,
            dir: UP,
            spin: 0.0,
            alive: true,
            shape,
            mask,
            mask_step: 0,
        }
    }

    /// Bullets fly straight off the edge; everything else wraps.
    pub fn wraps(&self) -> bool {
        !matches!(self.kind, Kind::Bullet)
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn half_extents(&self) -> (f32, f32) {
        self.mask.half_extents()
    }

    /// Rotate the heading by `deg` and re-derive the mask if needed.
    pub fn turn(&mut self, deg: f32) {
        self.dir = self.dir.rotated(deg).normalized();
        self.refresh_mask();
    }

    /// One simulation step: spin, integrate, then wrap or expire.
    pub fn update(&mut self, space: &Space) {
        if self.spin != 0.0 {
            self.dir = self.dir.rotated(self.spin).normalized();
        }
        self.refresh_mask();

        self.pos += self.vel;

        if self.wraps() {
            self.pos = space.wrap(self.pos);
        } else {
            let (hw, hh) = self.half_extents();
            if !space.rect_intersects_screen(self.pos, hw, hh) {
                self.alive = false;
            }
        }
    }

    /// Positions at which this entity currently exists: its own plus any
    /// wrapped copies. A killed entity has no positions at all, so master
    /// and mirrors live and die together by construction.
    pub fn mirror_offsets(&self, space: &Space) -> Vec<Vec2> {
        if self.wraps() {
            let (hw, hh) = self.half_extents();
            space.mirror_offsets(self.pos, hw, hh)
        } else {
            vec![Vec2::ZERO]
        }
    }

    /// Rasterizing is the expensive part of a tick, so only do it when the
    /// heading has moved into a new quantized step.
    fn refresh_mask(&mut self) {
        let step = (self.dir.angle_deg() / ANGLE_STEP_DEG).round() as i32;
        if step != self.mask_step {
            self.mask = self.shape.rasterize(step as f32 * ANGLE_STEP_DEG);
            self.mask_step = step;
        }
    }
}

/// Mirror-aware two-phase collision test. For every pair of wrapped copies:
/// broad phase rejects on bounding rects, narrow phase scans only the clipped
/// overlap for a dot both masks mark opaque. Symmetric in its arguments.
pub fn collides(a: &Entity, b: &Entity, space: &Space) -> bool {
    let (ahw, ahh) = a.half_extents();
    let (bhw, bhh) = b.half_extents();

    let b_offsets = b.mirror_offsets(space);
    for oa in a.mirror_offsets(space) {
        let ac = a.pos + oa;
        for &ob in &b_offsets {
            let bc = b.pos + ob;

            let x0 = (ac.x - ahw).max(bc.x - bhw);
            let x1 = (ac.x + ahw).min(bc.x + bhw);
            let y0 = (ac.y - ahh).max(bc.y - bhh);
            let y1 = (ac.y + ahh).min(bc.y + bhh);
            if x0 >= x1 || y0 >= y1 {
                continue;
            }

            if masks_overlap(a, ac, b, bc, (x0, y0, x1, y1)) {
                return true;
            }
        }
    }
    false
}

/// Scan dot centers inside the clipped overlap rect; first dot opaque in both
/// masks wins.
fn masks_overlap(a: &Entity, ac: Vec2, b: &Entity, bc: Vec2, clip: (f32, f32, f32, f32)) -> bool {
    let (x0, y0, x1, y1) = clip;
    let (ahw, ahh) = a.half_extents();
    let (bhw, bhh) = b.half_extents();

    let mut wy = y0.floor() + 0.5;
    while wy < y1 {
        let mut wx = x0.floor() + 0.5;
        while wx < x1 {
            let ax = (wx - (ac.x - ahw)).floor() as i32;
            let ay = (wy - (ac.y - ahh)).floor() as i32;
            let bx = (wx - (bc.x - bhw)).floor() as i32;
            let by = (wy - (bc.y - bhh)).floor() as i32;
            if a.mask().get(ax, ay) && b.mask().get(bx, by) {
                return true;
            }
            wx += 1.0;
        }
        wy += 1.0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_space() -> Space {
        Space::new(160.0, 112.0)
    }

    fn square(half: f32) -> Rc<Shape> {
        Rc::new(Shape::new(vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]))
    }

    fn block(kind: Kind, pos: Vec2, half: f32) -> Entity {
        Entity::new(kind, square(half), pos, Vec2::ZERO)
    }

    #[test]
    fn update_integrates_and_wraps() {
        let space = test_space();
        let mut e = block(Kind::Ship, Vec2::new(159.0, 4.0), 2.0);
        e.vel = Vec2::new(3.0, -6.0);
        e.update(&space);
        assert!((e.pos.x - 2.0).abs() < 1e-4);
        assert!((e.pos.y - 110.0).abs() < 1e-4);
        assert!(e.alive);
    }

    #[test]
    fn bullet_does_not_wrap_and_expires_offscreen() {
        let space = test_space();
        let mut b = block(Kind::Bullet, Vec2::new(158.0, 50.0), 1.0);
        b.vel = Vec2::new(4.0, 0.0);
        b.update(&space);
        assert!(b.pos.x > 160.0, "bullet position must stay unwrapped");
        assert!(b.alive, "still touching the screen rect");
        for _ in 0..4 {
            b.update(&space);
        }
        assert!(!b.alive, "bullet must die once fully offscreen");
    }

    #[test]
    fn bullet_has_only_the_identity_offset() {
        let space = test_space();
        let b = block(Kind::Bullet, Vec2::new(159.5, 50.0), 2.0);
        assert_eq!(b.mirror_offsets(&space), vec![Vec2::ZERO]);
    }

    #[test]
    fn turning_rederives_the_mask() {
        // A thin bar reads differently at 90 degrees.
        let bar = Rc::new(Shape::new(vec![
            Vec2::new(-6.0, -1.0),
            Vec2::new(6.0, -1.0),
            Vec2::new(6.0, 1.0),
            Vec2::new(-6.0, 1.0),
        ]));
        let mut e = Entity::new(Kind::Ship, bar, Vec2::new(80.0, 56.0), Vec2::ZERO);
        let dim = e.mask().dim() as i32;
        let horizontal_left = e.mask().get(1, dim / 2);
        e.turn(90.0);
        assert_ne!(e.mask().get(1, dim / 2), horizontal_left);
    }

    #[test]
    fn overlapping_blocks_collide() {
        let space = test_space();
        let a = block(Kind::Ship, Vec2::new(80.0, 56.0), 4.0);
        let b = block(Kind::Asteroid(SizeClass::Big), Vec2::new(83.0, 57.0), 4.0);
        assert!(collides(&a, &b, &space));
    }

    #[test]
    fn collision_is_symmetric() {
        let space = test_space();
        let a = block(Kind::Ship, Vec2::new(80.0, 56.0), 4.0);
        let b = block(Kind::Asteroid(SizeClass::Big), Vec2::new(85.0, 56.0), 4.0);
        let c = block(Kind::Bullet, Vec2::new(20.0, 20.0), 1.0);
        assert_eq!(collides(&a, &b, &space), collides(&b, &a, &space));
        assert_eq!(collides(&a, &c, &space), collides(&c, &a, &space));
    }

    #[test]
    fn distant_blocks_never_collide() {
        let space = test_space();
        let a = block(Kind::Ship, Vec2::new(40.0, 30.0), 4.0);
        let b = block(Kind::Asteroid(SizeClass::Small), Vec2::new(100.0, 80.0), 4.0);
        assert!(!collides(&a, &b, &space));
    }

    #[test]
    fn collision_reaches_across_the_wrapped_edge() {
        // Rock straddling the right edge, bullet just inside the left edge:
        // only the rock's (-width, 0) copy can touch it.
        let space = test_space();
        let rock = block(Kind::Asteroid(SizeClass::Big), Vec2::new(159.0, 56.0), 6.0);
        let bullet = block(Kind::Bullet, Vec2::new(3.0, 56.0), 1.5);
        assert!(collides(&rock, &bullet, &space));
        assert!(collides(&bullet, &rock, &space));
    }

    #[test]
    fn near_edge_but_disjoint_does_not_collide() {
        let space = test_space();
        let rock = block(Kind::Asteroid(SizeClass::Big), Vec2::new(159.0, 56.0), 6.0);
        let bullet = block(Kind::Bullet, Vec2::new(20.0, 56.0), 1.5);
        assert!(!collides(&rock, &bullet, &space));
    }
}
