use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Shared handle on the tick interval, so the slow-motion and fast operator
/// modes can retime the loop without touching game logic.
#[derive(Clone)]
pub struct TickRate(Arc<AtomicU64>);

impl TickRate {
    pub fn set_fps(&self, fps: u64) {
        self.0.store(1000 / fps.max(1), Ordering::Relaxed);
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::Relaxed))
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    tick_rate: TickRate,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = TickRate(Arc::new(AtomicU64::new(tick_rate_ms)));
        let rate = tick_rate.clone();

        thread::spawn(move || loop {
            if event::poll(rate.interval()).unwrap_or(false) {
                if let Ok(crossterm::event::Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        if tx.send(Event::Key(key)).is_err() {
                            return;
                        }
                    }
                }
            } else if tx.send(Event::Tick).is_err() {
                return;
            }
        });

        Self { rx, tick_rate }
    }

    pub fn tick_rate(&self) -> TickRate {
        self.tick_rate.clone()
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
