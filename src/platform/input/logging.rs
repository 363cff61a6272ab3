// Dry-run implementations that only log what would have been injected

use super::{InjectResult, InputInjector, UiHandler};
use crate::models::gesture::{GestureAction, GestureLabel};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Injector that records nothing and logs every call
#[derive(Debug, Default)]
pub struct LoggingInjector {
    calls: AtomicU64,
}

impl LoggingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of injection calls received
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl InputInjector for LoggingInjector {
    fn move_pointer(&self, x: f32, y: f32) -> InjectResult<()> {
        self.count();
        info!("move pointer to ({:.0}, {:.0})", x, y);
        Ok(())
    }

    fn scroll(&self, amount: i32) -> InjectResult<()> {
        self.count();
        info!("scroll {}", amount);
        Ok(())
    }

    fn hscroll(&self, amount: i32) -> InjectResult<()> {
        self.count();
        info!("horizontal scroll {}", amount);
        Ok(())
    }

    fn click(&self) -> InjectResult<()> {
        self.count();
        info!("click");
        Ok(())
    }
}

/// UI handler that logs each action and remembers how many it saw
#[derive(Debug, Default)]
pub struct LoggingUiHandler {
    handled: u64,
}

impl LoggingUiHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> u64 {
        self.handled
    }
}

impl UiHandler for LoggingUiHandler {
    fn handle(&mut self, action: GestureAction, label: GestureLabel) {
        self.handled += 1;
        info!("{} -> {}", label, action.to_string());
    }
}
