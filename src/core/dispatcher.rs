// Gesture dispatcher - the consumer half of the pipeline.
// Applies the session-level debounce and turns events into injected input
// or UI actions.

use crate::core::config::EngineConfig;
use crate::core::cooldown::GestureDebouncer;
use crate::core::event_channel::EventReceiver;
use crate::models::gesture::{Direction, GestureAction, GestureEvent, GestureLabel};
use crate::platform::input::{InjectResult, InputInjector, UiHandler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==============================================================================
// Action Map
// ==============================================================================

/// Gesture label to action bindings. Unbound labels map to `GestureAction::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMap {
    bindings: HashMap<GestureLabel, GestureAction>,
}

impl ActionMap {
    /// Map with no bindings
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a label, returning the previous action if there was one
    pub fn bind(&mut self, label: GestureLabel, action: GestureAction) -> Option<GestureAction> {
        self.bindings.insert(label, action)
    }

    pub fn unbind(&mut self, label: GestureLabel) -> Option<GestureAction> {
        self.bindings.remove(&label)
    }

    pub fn action_for(&self, label: GestureLabel) -> GestureAction {
        self.bindings
            .get(&label)
            .copied()
            .unwrap_or(GestureAction::None)
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(GestureLabel::IndexPointingUp, GestureAction::ControllerMode);
        map.bind(GestureLabel::PeaceSign, GestureAction::ScrollMode);
        map.bind(GestureLabel::Three, GestureAction::OpenRoomList);
        map.bind(GestureLabel::RockNRoll, GestureAction::ShowMainMenu);
        map.bind(GestureLabel::OpenHand, GestureAction::Click);
        map.bind(GestureLabel::ThumbsUp, GestureAction::VolumeUp);
        map.bind(GestureLabel::ThumbsDown, GestureAction::VolumeDown);
        map.bind(GestureLabel::GoodGesture, GestureAction::Confirm);
        map
    }
}

// ==============================================================================
// Dispatcher
// ==============================================================================

/// Result of dispatching one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// The gesture's action was carried out
    Triggered {
        label: GestureLabel,
        action: GestureAction,
    },
    /// Same gesture seen again inside the debounce window
    Debounced(GestureLabel),
    /// Gesture accepted but bound to no action
    Unbound(GestureLabel),
    Scrolled(Direction),
    PointerMoved { x: f32, y: f32 },
    /// Advisory event, logged only
    Logged,
    /// Hand left the frame; debounce cleared
    HandReset,
}

/// Consumer-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub gestures_dispatched: u64,
    pub gestures_debounced: u64,
    pub scrolls_dispatched: u64,
    pub injection_failures: u64,
}

pub struct GestureDispatcher {
    debouncer: GestureDebouncer,
    /// Hand epoch of the last gesture seen
    last_epoch: Option<u64>,
    actions: ActionMap,
    injector: Arc<dyn InputInjector>,
    ui: Box<dyn UiHandler>,
    scroll_amount: i32,
    stats: DispatchStats,
}

impl GestureDispatcher {
    pub fn new(
        config: &EngineConfig,
        injector: Arc<dyn InputInjector>,
        ui: Box<dyn UiHandler>,
    ) -> Self {
        Self {
            debouncer: GestureDebouncer::new(config.gesture_debounce()),
            last_epoch: None,
            actions: ActionMap::default(),
            injector,
            ui,
            scroll_amount: config.scroll_amount,
            stats: DispatchStats::default(),
        }
    }

    pub fn with_action_map(mut self, actions: ActionMap) -> Self {
        self.actions = actions;
        self
    }

    pub fn action_map(&self) -> &ActionMap {
        &self.actions
    }

    /// Handle one event. Only injector calls can fail.
    pub fn dispatch(&mut self, event: GestureEvent) -> InjectResult<Dispatch> {
        match event {
            GestureEvent::Gesture {
                label,
                timestamp,
                epoch,
            } => {
                // A new epoch means the hand left the frame, even if the
                // HandLost event itself was dropped on overflow
                if self.last_epoch.is_some_and(|last| last != epoch) {
                    debug!("Hand epoch {} started, clearing debounce", epoch);
                    self.debouncer.clear();
                }
                self.last_epoch = Some(epoch);
                self.dispatch_gesture(label, timestamp)
            }

            // Scrolls are already rate limited per direction by the producer
            GestureEvent::Scroll { direction, .. } => {
                match direction {
                    Direction::Up => self.injector.scroll(self.scroll_amount)?,
                    Direction::Down => self.injector.scroll(-self.scroll_amount)?,
                    Direction::Right => self.injector.hscroll(self.scroll_amount)?,
                    Direction::Left => self.injector.hscroll(-self.scroll_amount)?,
                }
                self.stats.scrolls_dispatched += 1;
                debug!("{}", direction.scroll_key());
                Ok(Dispatch::Scrolled(direction))
            }

            GestureEvent::Pointer { x, y, .. } => {
                self.injector.move_pointer(x, y)?;
                Ok(Dispatch::PointerMoved { x, y })
            }

            GestureEvent::Motion { direction, timestamp } => {
                debug!("Fingertip moving {} at {}", direction.to_string(), timestamp);
                Ok(Dispatch::Logged)
            }

            GestureEvent::HandLost { .. } => {
                self.debouncer.clear();
                Ok(Dispatch::HandReset)
            }
        }
    }

    fn dispatch_gesture(&mut self, label: GestureLabel, timestamp: i64) -> InjectResult<Dispatch> {
        if !self.debouncer.accept(label, timestamp) {
            self.stats.gestures_debounced += 1;
            return Ok(Dispatch::Debounced(label));
        }

        let action = self.actions.action_for(label);
        match action {
            GestureAction::None => return Ok(Dispatch::Unbound(label)),
            GestureAction::Click => self.injector.click()?,
            _ => self.ui.handle(action, label),
        }

        self.stats.gestures_dispatched += 1;
        info!("Gesture {} -> {}", label, action.to_string());
        Ok(Dispatch::Triggered { label, action })
    }

    /// Dispatch everything currently queued. Injection failures are logged
    /// and counted; they never stop the drain.
    pub fn drain(&mut self, rx: &EventReceiver<GestureEvent>) -> usize {
        let events = rx.drain();
        let count = events.len();

        for event in events {
            let kind = event.kind();
            if let Err(e) = self.dispatch(event) {
                self.stats.injection_failures += 1;
                warn!("Failed to dispatch {} event: {}", kind, e);
            }
        }

        count
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}
