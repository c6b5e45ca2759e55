use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::TickRate;
use crate::game::Game;

const NORMAL_FPS: u64 = 60;
const SLOW_FPS: u64 = 1;

#[derive(Clone, Copy, PartialEq)]
pub enum Speed {
    Normal,
    Slow,
}

pub struct App {
    pub should_quit: bool,
    pub game: Game,
    pub speed: Speed,
    tick_rate: TickRate,
}

impl App {
    pub fn new(tick_rate: TickRate) -> Self {
        Self {
            should_quit: false,
            game: Game::new(),
            speed: Speed::Normal,
            tick_rate,
        }
    }

    pub fn on_tick(&mut self) {
        self.game.tick();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.game.toggle_pause(),
            // Operator controls: retime the clock, never the game logic.
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.speed = Speed::Slow;
                self.tick_rate.set_fps(SLOW_FPS);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.speed = Speed::Normal;
                self.tick_rate.set_fps(NORMAL_FPS);
            }
            KeyCode::Enter => self.game.restart(),
            KeyCode::Left => self.game.press_rotate_left(),
            KeyCode::Right => self.game.press_rotate_right(),
            KeyCode::Up => self.game.press_thrust(),
            KeyCode::Char(' ') => self.game.press_fire(),
            _ => {}
        }
    }

    /// Pending audio cue, surfaced as a terminal bell by the main loop.
    pub fn take_bell(&mut self) -> bool {
        self.game.take_bell()
    }
}
