// Cursor mapping - fingertip to screen coordinates, plus coarse frame-to-frame motion

use crate::models::gesture::Direction;
use crate::models::pose::{PoseError, PoseResult};

/// Default per-frame fingertip displacement (pixels) treated as deliberate motion
pub const DEFAULT_JITTER_PX: f32 = 20.0;

/// Linearly scale a point in frame pixel space onto the screen.
///
/// Fails when the frame has no area; callers must skip pointer
/// movement for such frames.
pub fn map_to_screen(
    x: f32,
    y: f32,
    frame_width: f32,
    frame_height: f32,
    screen_width: f32,
    screen_height: f32,
) -> PoseResult<(f32, f32)> {
    if frame_width <= 0.0 || frame_height <= 0.0 {
        return Err(PoseError::InvalidFrameGeometry {
            width: frame_width,
            height: frame_height,
        });
    }

    Ok((
        x / frame_width * screen_width,
        y / frame_height * screen_height,
    ))
}

/// Tracks the last fingertip position to classify coarse motion.
/// Advisory only: nothing here is rate limited.
pub struct CursorMapper {
    last_position: Option<(f32, f32)>,
    jitter_px: f32,
}

impl CursorMapper {
    pub fn new(jitter_px: f32) -> Self {
        Self {
            last_position: None,
            jitter_px,
        }
    }

    /// Record the fingertip for this frame and report the dominant direction
    /// of travel since the previous one, if it exceeded the jitter threshold.
    pub fn track(&mut self, tip_px: (f32, f32)) -> Option<Direction> {
        let previous = self.last_position.replace(tip_px)?;

        let dx = tip_px.0 - previous.0;
        let dy = tip_px.1 - previous.1;

        if dx.abs() <= self.jitter_px && dy.abs() <= self.jitter_px {
            return None;
        }

        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        Some(direction)
    }

    /// Forget the last position (no hand in frame)
    pub fn reset(&mut self) {
        self.last_position = None;
    }

    pub fn last_position(&self) -> Option<(f32, f32)> {
        self.last_position
    }
}

impl Default for CursorMapper {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_PX)
    }
}
