// Data models for hand tracking input: landmarks, hand poses and pose frames

use serde::{Deserialize, Serialize};

/// Number of landmarks produced per detected hand
pub const HAND_LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Landmark Point
// ==============================================================================

/// One tracked anatomical point, in image-normalized coordinates.
/// Origin is the top-left corner and `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32, // Depth relative to the wrist, unused by the classifier
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance to another point
    pub fn distance_2d(&self, other: &LandmarkPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Scale normalized coordinates into pixel space of a frame
    pub fn to_pixels(&self, frame_width: u32, frame_height: u32) -> (f32, f32) {
        (self.x * frame_width as f32, self.y * frame_height as f32)
    }
}

// ==============================================================================
// Hand Landmarks (21 keypoints per hand)
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn to_string(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

// ==============================================================================
// Hand Pose
// ==============================================================================

/// Full 21-landmark snapshot of one hand in one frame.
///
/// The landmark count is enforced at construction, so every `HandPose`
/// the engine sees is well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    landmarks: [LandmarkPoint; HAND_LANDMARK_COUNT],
    pub handedness: Option<Handedness>,
    pub confidence: f32,
}

impl HandPose {
    /// Build a pose from provider output; fails unless exactly 21 points are given
    pub fn new(landmarks: Vec<LandmarkPoint>) -> PoseResult<Self> {
        let actual = landmarks.len();
        let landmarks: [LandmarkPoint; HAND_LANDMARK_COUNT] =
            landmarks.try_into().map_err(|_| PoseError::InvalidPose {
                expected: HAND_LANDMARK_COUNT,
                actual,
            })?;

        Ok(Self {
            landmarks,
            handedness: None,
            confidence: 1.0,
        })
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn landmark(&self, landmark: HandLandmark) -> &LandmarkPoint {
        &self.landmarks[landmark.index()]
    }

    pub fn landmarks(&self) -> &[LandmarkPoint; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Wrist position in pixel space
    pub fn wrist_px(&self, frame_width: u32, frame_height: u32) -> (f32, f32) {
        self.landmark(HandLandmark::Wrist)
            .to_pixels(frame_width, frame_height)
    }

    /// Index fingertip position in pixel space
    pub fn index_tip_px(&self, frame_width: u32, frame_height: u32) -> (f32, f32) {
        self.landmark(HandLandmark::IndexFingerTip)
            .to_pixels(frame_width, frame_height)
    }
}

impl TryFrom<Vec<LandmarkPoint>> for HandPose {
    type Error = PoseError;

    fn try_from(landmarks: Vec<LandmarkPoint>) -> PoseResult<Self> {
        Self::new(landmarks)
    }
}

// ==============================================================================
// Pose Frames
// ==============================================================================

/// Provider output for one camera frame, before validation.
/// Each hand is a plain landmark list so malformed detections can be represented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPoseFrame {
    pub timestamp: i64, // Milliseconds
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub hands: Vec<Vec<LandmarkPoint>>,
}

/// Validated hand tracking result for a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
    pub timestamp: i64, // Milliseconds
    pub frame_width: u32,
    pub frame_height: u32,
    pub hands: Vec<HandPose>,
}

impl PoseFrame {
    pub fn new(timestamp: i64, frame_width: u32, frame_height: u32, hands: Vec<HandPose>) -> Self {
        Self {
            timestamp,
            frame_width,
            frame_height,
            hands,
        }
    }

    /// Frame with no detected hand
    pub fn idle(timestamp: i64, frame_width: u32, frame_height: u32) -> Self {
        Self::new(timestamp, frame_width, frame_height, Vec::new())
    }

    /// The hand that drives classification (first detection)
    pub fn primary_hand(&self) -> Option<&HandPose> {
        self.hands.first()
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}

impl TryFrom<RawPoseFrame> for PoseFrame {
    type Error = PoseError;

    fn try_from(raw: RawPoseFrame) -> PoseResult<Self> {
        let hands = raw
            .hands
            .into_iter()
            .map(HandPose::new)
            .collect::<PoseResult<Vec<_>>>()?;

        Ok(Self {
            timestamp: raw.timestamp,
            frame_width: raw.frame_width,
            frame_height: raw.frame_height,
            hands,
        })
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Invalid hand pose: expected {expected} landmarks, got {actual}")]
    InvalidPose { expected: usize, actual: usize },

    #[error("Invalid frame geometry: {width}x{height}")]
    InvalidFrameGeometry { width: f32, height: f32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Gesture session already running")]
    AlreadyRunning,

    #[error("Gesture session not running")]
    NotRunning,

    #[error("Pose source failed: {0}")]
    SourceFailed(String),

    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

pub type PoseResult<T> = Result<T, PoseError>;
