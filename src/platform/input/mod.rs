// Input injection and UI callbacks - the services gesture actions are delivered to

pub mod logging;

pub use logging::{LoggingInjector, LoggingUiHandler};

use crate::models::gesture::{GestureAction, GestureLabel};

/// OS-level pointer and wheel control.
/// Called from the dispatcher task, so implementations must be thread-safe.
pub trait InputInjector: Send + Sync {
    /// Move the pointer to absolute screen coordinates
    fn move_pointer(&self, x: f32, y: f32) -> InjectResult<()>;

    /// Vertical wheel; positive scrolls up
    fn scroll(&self, amount: i32) -> InjectResult<()>;

    /// Horizontal wheel; positive scrolls right
    fn hscroll(&self, amount: i32) -> InjectResult<()>;

    /// Primary button click at the current pointer position
    fn click(&self) -> InjectResult<()>;
}

/// Receives application-level actions (menus, modes, volume)
pub trait UiHandler: Send {
    fn handle(&mut self, action: GestureAction, label: GestureLabel);
}

#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("Input injection unavailable: {0}")]
    Unavailable(String),

    #[error("Input injection failed: {0}")]
    Failed(String),
}

pub type InjectResult<T> = Result<T, InjectError>;
