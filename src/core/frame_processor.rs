// Frame processor - the producer half of the pipeline.
// Classifies the primary hand of each frame, derives scroll/pointer/motion
// events and pushes them into the event channel.

use crate::core::classifier::GestureClassifier;
use crate::core::config::EngineConfig;
use crate::core::cooldown::CooldownManager;
use crate::core::cursor_mapper::{map_to_screen, CursorMapper};
use crate::core::event_channel::EventSender;
use crate::core::motion_estimator::MotionEstimator;
use crate::models::gesture::{GestureEvent, GestureLabel};
use crate::models::pose::{PoseError, PoseFrame, PoseResult, RawPoseFrame};
use tracing::{debug, warn};

/// What a single frame produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Label of the primary hand, `None` when no hand was detected
    pub label: Option<GestureLabel>,
    pub events_pushed: usize,
    pub events_dropped: usize,
}

/// Producer-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    pub frames_processed: u64,
    pub frames_with_hand: u64,
    pub invalid_frames: u64,
    pub events_pushed: u64,
    pub events_dropped: u64,
}

pub struct FrameProcessor {
    classifier: GestureClassifier,
    motion: MotionEstimator,
    cursor: CursorMapper,
    cooldowns: CooldownManager,
    config: EngineConfig,
    hand_present: bool,
    /// Bumped on every hand-to-idle transition, carried by gesture events
    hand_epoch: u64,
    overflowing: bool,
    stats: ProducerStats,
}

impl FrameProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: GestureClassifier::new()
                .with_good_gesture_distance(config.good_gesture_distance),
            motion: MotionEstimator::new(config.motion_window, config.scroll_threshold_px),
            cursor: CursorMapper::new(config.cursor_jitter_px),
            cooldowns: CooldownManager::new(),
            config,
            hand_present: false,
            hand_epoch: 0,
            overflowing: false,
            stats: ProducerStats::default(),
        }
    }

    /// Replace the classifier (custom rule tables)
    pub fn with_classifier(mut self, classifier: GestureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Validate a provider frame, then process it. A frame containing any
    /// malformed hand is rejected as a whole and produces no events.
    pub fn process_raw(
        &mut self,
        raw: RawPoseFrame,
        tx: &EventSender<GestureEvent>,
    ) -> PoseResult<FrameOutcome> {
        let frame = PoseFrame::try_from(raw).map_err(|e| {
            self.stats.invalid_frames += 1;
            e
        })?;

        self.process_frame(&frame, tx)
    }

    pub fn process_frame(
        &mut self,
        frame: &PoseFrame,
        tx: &EventSender<GestureEvent>,
    ) -> PoseResult<FrameOutcome> {
        if frame.frame_width == 0 || frame.frame_height == 0 {
            self.stats.invalid_frames += 1;
            return Err(PoseError::InvalidFrameGeometry {
                width: frame.frame_width as f32,
                height: frame.frame_height as f32,
            });
        }

        self.stats.frames_processed += 1;
        let timestamp = frame.timestamp;
        let mut outcome = FrameOutcome::default();

        let Some(hand) = frame.primary_hand() else {
            self.motion.reset();
            self.cursor.reset();

            if self.hand_present {
                self.hand_present = false;
                self.hand_epoch = self.hand_epoch.wrapping_add(1);
                debug!("Hand lost at {}", timestamp);
                self.emit(tx, GestureEvent::HandLost { timestamp }, &mut outcome);
            }
            return Ok(outcome);
        };

        self.hand_present = true;
        self.stats.frames_with_hand += 1;

        let label = self.classifier.classify(hand);
        outcome.label = Some(label);
        if label.is_known() {
            let epoch = self.hand_epoch;
            self.emit(
                tx,
                GestureEvent::Gesture {
                    label,
                    timestamp,
                    epoch,
                },
                &mut outcome,
            );
        }

        // Scrolling: wrist motion while the peace sign is held
        let wrist = hand.wrist_px(frame.frame_width, frame.frame_height);
        let estimate = self.motion.update(label == GestureLabel::PeaceSign, wrist);
        for direction in estimate.directions() {
            if self
                .cooldowns
                .allow(direction.scroll_key(), timestamp, self.config.scroll_cooldown())
            {
                self.emit(tx, GestureEvent::Scroll { direction, timestamp }, &mut outcome);
            }
        }

        let tip = hand.index_tip_px(frame.frame_width, frame.frame_height);
        if let Some(direction) = self.cursor.track(tip) {
            self.emit(tx, GestureEvent::Motion { direction, timestamp }, &mut outcome);
        }

        if label == GestureLabel::IndexPointingUp && self.config.pointer_enabled {
            let (x, y) = map_to_screen(
                tip.0,
                tip.1,
                frame.frame_width as f32,
                frame.frame_height as f32,
                self.config.screen_width as f32,
                self.config.screen_height as f32,
            )?;
            self.emit(tx, GestureEvent::Pointer { x, y, timestamp }, &mut outcome);
        }

        debug!(
            "Frame {}: {} ({} events)",
            timestamp, label, outcome.events_pushed
        );

        Ok(outcome)
    }

    /// Clear motion history, cursor state and scroll cooldowns.
    /// Starts a new hand epoch, so the consumer's debounce resets too.
    pub fn reset(&mut self) {
        self.motion.reset();
        self.cursor.reset();
        self.cooldowns.reset();
        self.hand_present = false;
        self.hand_epoch = self.hand_epoch.wrapping_add(1);
        self.overflowing = false;
    }

    pub fn stats(&self) -> ProducerStats {
        self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn emit(
        &mut self,
        tx: &EventSender<GestureEvent>,
        event: GestureEvent,
        outcome: &mut FrameOutcome,
    ) {
        outcome.events_pushed += 1;
        self.stats.events_pushed += 1;

        match tx.push(event) {
            Some(evicted) => {
                outcome.events_dropped += 1;
                self.stats.events_dropped += 1;
                if !self.overflowing {
                    self.overflowing = true;
                    warn!(
                        "Event queue full ({} pending), dropping oldest {} event",
                        tx.capacity(),
                        evicted.kind()
                    );
                }
            }
            None => self.overflowing = false,
        }
    }
}
