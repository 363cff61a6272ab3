// Data models for classified gestures, motion directions and queued events

use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Gesture Labels
// ==============================================================================

/// Discrete classification result of one hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    Unknown,
    IndexPointingUp,
    PeaceSign,
    Three,
    RockNRoll,
    OpenHand,
    ThumbsUp,
    ThumbsDown,
    GoodGesture,
}

impl GestureLabel {
    /// Every label, in declaration order
    pub const ALL: [GestureLabel; 9] = [
        GestureLabel::Unknown,
        GestureLabel::IndexPointingUp,
        GestureLabel::PeaceSign,
        GestureLabel::Three,
        GestureLabel::RockNRoll,
        GestureLabel::OpenHand,
        GestureLabel::ThumbsUp,
        GestureLabel::ThumbsDown,
        GestureLabel::GoodGesture,
    ];

    /// Display name shown to the user and used as a debounce key
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::Unknown => "UNKNOWN",
            GestureLabel::IndexPointingUp => "INDEX POINTING UP",
            GestureLabel::PeaceSign => "PEACE SIGN",
            GestureLabel::Three => "THREE",
            GestureLabel::RockNRoll => "ROCK'N ROLL!!!",
            GestureLabel::OpenHand => "OPEN HAND",
            GestureLabel::ThumbsUp => "THUMBS UP",
            GestureLabel::ThumbsDown => "THUMBS DOWN",
            GestureLabel::GoodGesture => "GOOD",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, GestureLabel::Unknown)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Directions
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn to_string(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Action-level cooldown key for scrolling in this direction
    pub fn scroll_key(&self) -> &'static str {
        match self {
            Direction::Up => "SCROLL UP",
            Direction::Down => "SCROLL DOWN",
            Direction::Left => "SCROLL LEFT",
            Direction::Right => "SCROLL RIGHT",
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

// ==============================================================================
// Gesture Events (producer -> consumer)
// ==============================================================================

/// Item carried by the event channel. Timestamps are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// A classified gesture for the primary hand. `epoch` counts how many
    /// times the hand has left the frame before this gesture was seen.
    Gesture {
        label: GestureLabel,
        timestamp: i64,
        #[serde(default)]
        epoch: u64,
    },
    /// Rate-limited scroll tick derived from wrist motion
    Scroll { direction: Direction, timestamp: i64 },
    /// Coarse fingertip motion, advisory only
    Motion { direction: Direction, timestamp: i64 },
    /// Screen target for the pointer while pointing
    Pointer { x: f32, y: f32, timestamp: i64 },
    /// The tracked hand left the frame
    HandLost { timestamp: i64 },
}

impl GestureEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            GestureEvent::Gesture { timestamp, .. }
            | GestureEvent::Scroll { timestamp, .. }
            | GestureEvent::Motion { timestamp, .. }
            | GestureEvent::Pointer { timestamp, .. }
            | GestureEvent::HandLost { timestamp } => *timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GestureEvent::Gesture { .. } => "gesture",
            GestureEvent::Scroll { .. } => "scroll",
            GestureEvent::Motion { .. } => "motion",
            GestureEvent::Pointer { .. } => "pointer",
            GestureEvent::HandLost { .. } => "hand_lost",
        }
    }
}

// ==============================================================================
// Actions (consumer-side mapping targets)
// ==============================================================================

/// Application-level action a gesture is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureAction {
    ControllerMode,
    ScrollMode,
    OpenRoomList,
    ShowMainMenu,
    Click,
    VolumeUp,
    VolumeDown,
    Confirm,
    None,
}

impl GestureAction {
    pub fn to_string(&self) -> &'static str {
        match self {
            GestureAction::ControllerMode => "controller_mode",
            GestureAction::ScrollMode => "scroll_mode",
            GestureAction::OpenRoomList => "open_room_list",
            GestureAction::ShowMainMenu => "show_main_menu",
            GestureAction::Click => "click",
            GestureAction::VolumeUp => "volume_up",
            GestureAction::VolumeDown => "volume_down",
            GestureAction::Confirm => "confirm",
            GestureAction::None => "none",
        }
    }
}

// ==============================================================================
// Session Statistics
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub frames_processed: u64,
    pub frames_with_hand: u64,
    pub invalid_frames: u64,
    pub events_pushed: u64,
    pub events_dropped: u64,
    pub gestures_dispatched: u64,
    pub gestures_debounced: u64,
    pub scrolls_dispatched: u64,
    pub injection_failures: u64,
}
