use crate::models::pose::{PoseError, PoseResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum time between two scroll events of the same direction (ms)
    pub scroll_cooldown_ms: u64,
    /// Minimum time before the same gesture can trigger its action again (ms)
    pub gesture_debounce_ms: u64,
    /// Wrist samples kept per axis by the motion estimator
    pub motion_window: usize,
    /// Mean per-frame wrist displacement that counts as a scroll (pixels)
    pub scroll_threshold_px: f32,
    /// Fingertip displacement below which motion is ignored (pixels)
    pub cursor_jitter_px: f32,
    /// Index tip to thumb tip distance for the "good" gesture (normalized)
    pub good_gesture_distance: f32,
    /// Maximum pending events between producer and consumer
    pub queue_capacity: usize,
    /// How often the consumer drains the event queue (ms)
    pub poll_interval_ms: u64,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Wheel delta per scroll event
    pub scroll_amount: i32,
    /// Move the pointer while the index finger points up
    pub pointer_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_cooldown_ms: 500,
            gesture_debounce_ms: 5000,
            motion_window: 10,
            scroll_threshold_px: 5.0,
            cursor_jitter_px: 20.0,
            good_gesture_distance: 0.05,
            queue_capacity: 64,
            poll_interval_ms: 100,
            screen_width: 1920,
            screen_height: 1080,
            scroll_amount: 100,
            pointer_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> PoseResult<()> {
        if self.scroll_cooldown_ms == 0 {
            return Err(PoseError::InvalidConfig(
                "scroll_cooldown_ms must be greater than 0".to_string(),
            ));
        }

        if self.gesture_debounce_ms == 0 {
            return Err(PoseError::InvalidConfig(
                "gesture_debounce_ms must be greater than 0".to_string(),
            ));
        }

        if self.motion_window < 2 || self.motion_window > 120 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid motion window: {}. Must be between 2 and 120 samples",
                self.motion_window
            )));
        }

        if !self.scroll_threshold_px.is_finite() || self.scroll_threshold_px <= 0.0 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid scroll threshold: {}. Must be a positive number of pixels",
                self.scroll_threshold_px
            )));
        }

        if !self.cursor_jitter_px.is_finite() || self.cursor_jitter_px < 0.0 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid cursor jitter: {}. Must not be negative",
                self.cursor_jitter_px
            )));
        }

        if !(self.good_gesture_distance > 0.0 && self.good_gesture_distance <= 1.0) {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid good gesture distance: {}. Must be in (0.0, 1.0]",
                self.good_gesture_distance
            )));
        }

        if self.queue_capacity == 0 {
            return Err(PoseError::InvalidConfig(
                "queue_capacity must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms > 10_000 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid poll interval: {}. Must be between 1 and 10000 ms",
                self.poll_interval_ms
            )));
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid screen size: {}x{}",
                self.screen_width, self.screen_height
            )));
        }

        if self.scroll_amount <= 0 {
            return Err(PoseError::InvalidConfig(format!(
                "Invalid scroll amount: {}. Must be positive",
                self.scroll_amount
            )));
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn scroll_cooldown(&self) -> Duration {
        Duration::from_millis(self.scroll_cooldown_ms)
    }

    pub fn gesture_debounce(&self) -> Duration {
        Duration::from_millis(self.gesture_debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".gesture_control");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
