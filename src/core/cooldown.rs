// Cooldown tracking - per-key rate limiting and the session-level gesture debounce

use crate::models::gesture::GestureLabel;
use std::collections::HashMap;
use std::time::Duration;

/// Last-fired timestamps (milliseconds) keyed by action name.
/// Entries are created on first use and only removed by `reset`.
#[derive(Debug, Default)]
pub struct CooldownManager {
    last_fired: HashMap<String, i64>,
}

impl CooldownManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and stamps `now` when `key` has never fired or its last
    /// firing is at least `window` old. A `now` earlier than the last stamp
    /// (the clock went backwards) is allowed and restamps the key.
    pub fn allow(&mut self, key: &str, now: i64, window: Duration) -> bool {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);

        if let Some(&last) = self.last_fired.get(key) {
            if (0..window_ms).contains(&now.saturating_sub(last)) {
                return false;
            }
        }

        self.last_fired.insert(key.to_string(), now);
        true
    }

    pub fn last_fired(&self, key: &str) -> Option<i64> {
        self.last_fired.get(key).copied()
    }

    /// Drop every stamp (session reset)
    pub fn reset(&mut self) {
        self.last_fired.clear();
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

/// Consumer-side guard against a held gesture re-triggering its action.
///
/// Only the most recently dispatched label is remembered: a different label
/// always goes through, the same label only once the window has elapsed.
#[derive(Debug)]
pub struct GestureDebouncer {
    cooldowns: CooldownManager,
    last_gesture: Option<GestureLabel>,
    window: Duration,
}

impl GestureDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            cooldowns: CooldownManager::new(),
            last_gesture: None,
            window,
        }
    }

    pub fn accept(&mut self, label: GestureLabel, now: i64) -> bool {
        if self.last_gesture != Some(label) {
            self.cooldowns.reset();
            self.last_gesture = Some(label);
        }

        self.cooldowns.allow(label.as_str(), now, self.window)
    }

    /// Forget the last gesture (hand left the frame)
    pub fn clear(&mut self) {
        self.cooldowns.reset();
        self.last_gesture = None;
    }

    pub fn last_gesture(&self) -> Option<GestureLabel> {
        self.last_gesture
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
