// Gesture classification - maps a 21-point hand pose to a discrete label

use crate::models::gesture::GestureLabel;
use crate::models::pose::{HandLandmark, HandPose, LandmarkPoint, PoseResult};

/// Fingertip distance below which thumb and index count as touching
pub const DEFAULT_GOOD_GESTURE_DISTANCE: f32 = 0.05;

// ==============================================================================
// Finger Primitives
// ==============================================================================

/// A finger is up when its tip is above its pip joint, which is above its mcp
/// (smaller y is higher in the image). Ties are not "up".
pub fn finger_up(pose: &HandPose, tip: HandLandmark, pip: HandLandmark, mcp: HandLandmark) -> bool {
    let tip_y = pose.landmark(tip).y;
    let pip_y = pose.landmark(pip).y;
    let mcp_y = pose.landmark(mcp).y;
    tip_y < pip_y && pip_y < mcp_y
}

/// Negation of [`finger_up`]; a half-curled finger therefore reads as down.
pub fn finger_down(pose: &HandPose, tip: HandLandmark, pip: HandLandmark, mcp: HandLandmark) -> bool {
    !finger_up(pose, tip, pip, mcp)
}

fn index_up(pose: &HandPose) -> bool {
    finger_up(
        pose,
        HandLandmark::IndexFingerTip,
        HandLandmark::IndexFingerPip,
        HandLandmark::IndexFingerMcp,
    )
}

fn middle_up(pose: &HandPose) -> bool {
    finger_up(
        pose,
        HandLandmark::MiddleFingerTip,
        HandLandmark::MiddleFingerPip,
        HandLandmark::MiddleFingerMcp,
    )
}

fn ring_up(pose: &HandPose) -> bool {
    finger_up(
        pose,
        HandLandmark::RingFingerTip,
        HandLandmark::RingFingerPip,
        HandLandmark::RingFingerMcp,
    )
}

fn pinky_up(pose: &HandPose) -> bool {
    finger_up(
        pose,
        HandLandmark::PinkyTip,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyMcp,
    )
}

/// Tip below pip only, without looking at the mcp
fn tip_below_pip(pose: &HandPose, tip: HandLandmark, pip: HandLandmark) -> bool {
    pose.landmark(tip).y > pose.landmark(pip).y
}

// ==============================================================================
// Rule Table
// ==============================================================================

/// Tunables shared by every predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierParams {
    pub good_gesture_distance: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            good_gesture_distance: DEFAULT_GOOD_GESTURE_DISTANCE,
        }
    }
}

pub type GesturePredicate = fn(&HandPose, &ClassifierParams) -> bool;

/// One `(predicate, label)` entry; rules are evaluated top to bottom
#[derive(Clone, Copy)]
pub struct GestureRule {
    pub label: GestureLabel,
    pub predicate: GesturePredicate,
}

impl GestureRule {
    pub const fn new(label: GestureLabel, predicate: GesturePredicate) -> Self {
        Self { label, predicate }
    }

    pub fn matches(&self, pose: &HandPose, params: &ClassifierParams) -> bool {
        (self.predicate)(pose, params)
    }
}

impl std::fmt::Debug for GestureRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRule")
            .field("label", &self.label)
            .finish()
    }
}

fn is_index_pointing_up(pose: &HandPose, _: &ClassifierParams) -> bool {
    index_up(pose) && !middle_up(pose) && !ring_up(pose) && !pinky_up(pose)
}

fn is_peace_sign(pose: &HandPose, _: &ClassifierParams) -> bool {
    index_up(pose)
        && middle_up(pose)
        && tip_below_pip(pose, HandLandmark::RingFingerTip, HandLandmark::RingFingerPip)
        && tip_below_pip(pose, HandLandmark::PinkyTip, HandLandmark::PinkyPip)
}

fn is_three(pose: &HandPose, _: &ClassifierParams) -> bool {
    index_up(pose)
        && middle_up(pose)
        && ring_up(pose)
        && tip_below_pip(pose, HandLandmark::PinkyTip, HandLandmark::PinkyPip)
}

fn is_rock_n_roll(pose: &HandPose, _: &ClassifierParams) -> bool {
    index_up(pose) && pinky_up(pose) && !middle_up(pose) && !ring_up(pose)
}

fn is_open_hand(pose: &HandPose, _: &ClassifierParams) -> bool {
    index_up(pose) && middle_up(pose) && ring_up(pose) && pinky_up(pose)
}

fn is_thumbs_up(pose: &HandPose, _: &ClassifierParams) -> bool {
    pose.landmark(HandLandmark::ThumbTip).y < pose.landmark(HandLandmark::ThumbIp).y
}

fn is_thumbs_down(pose: &HandPose, _: &ClassifierParams) -> bool {
    pose.landmark(HandLandmark::ThumbTip).y > pose.landmark(HandLandmark::ThumbIp).y
}

fn is_good_gesture(pose: &HandPose, params: &ClassifierParams) -> bool {
    let index_tip = pose.landmark(HandLandmark::IndexFingerTip);
    let thumb_tip = pose.landmark(HandLandmark::ThumbTip);
    index_tip.distance_2d(thumb_tip) < params.good_gesture_distance
}

/// Built-in rules in priority order. ThumbsUp/ThumbsDown/GoodGesture overlap
/// freely; the order alone decides between them.
pub const DEFAULT_RULES: [GestureRule; 8] = [
    GestureRule::new(GestureLabel::IndexPointingUp, is_index_pointing_up),
    GestureRule::new(GestureLabel::PeaceSign, is_peace_sign),
    GestureRule::new(GestureLabel::Three, is_three),
    GestureRule::new(GestureLabel::RockNRoll, is_rock_n_roll),
    GestureRule::new(GestureLabel::OpenHand, is_open_hand),
    GestureRule::new(GestureLabel::ThumbsUp, is_thumbs_up),
    GestureRule::new(GestureLabel::ThumbsDown, is_thumbs_down),
    GestureRule::new(GestureLabel::GoodGesture, is_good_gesture),
];

// ==============================================================================
// Classifier
// ==============================================================================

/// Stateless rule-table classifier
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    rules: Vec<GestureRule>,
    params: ClassifierParams,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            params: ClassifierParams::default(),
        }
    }

    /// Replace the rule table; order is precedence
    pub fn with_rules(mut self, rules: Vec<GestureRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_good_gesture_distance(mut self, distance: f32) -> Self {
        self.params.good_gesture_distance = distance;
        self
    }

    pub fn rules(&self) -> &[GestureRule] {
        &self.rules
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// First matching rule wins; `Unknown` when nothing matches
    pub fn classify(&self, pose: &HandPose) -> GestureLabel {
        self.rules
            .iter()
            .find(|rule| rule.matches(pose, &self.params))
            .map(|rule| rule.label)
            .unwrap_or(GestureLabel::Unknown)
    }

    /// Classify raw provider output, rejecting anything but 21 landmarks
    pub fn classify_landmarks(&self, landmarks: &[LandmarkPoint]) -> PoseResult<GestureLabel> {
        let pose = HandPose::new(landmarks.to_vec())?;
        Ok(self.classify(&pose))
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the built-in rules and thresholds
pub fn classify(pose: &HandPose) -> GestureLabel {
    DEFAULT_RULES
        .iter()
        .find(|rule| rule.matches(pose, &ClassifierParams::default()))
        .map(|rule| rule.label)
        .unwrap_or(GestureLabel::Unknown)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::pose::{HandLandmark, HandPose, LandmarkPoint};

    /// Vertical layout of one finger: (tip, pip, mcp) y values
    pub const UP: (f32, f32, f32) = (0.30, 0.40, 0.50);
    pub const CURLED: (f32, f32, f32) = (0.55, 0.45, 0.50);

    /// Build a pose from per-finger layouts. The thumb is level (tip.y == ip.y)
    /// and far from the index tip unless overridden.
    pub fn hand(
        index: (f32, f32, f32),
        middle: (f32, f32, f32),
        ring: (f32, f32, f32),
        pinky: (f32, f32, f32),
    ) -> Vec<LandmarkPoint> {
        let mut points = vec![LandmarkPoint::new(0.5, 0.8, 0.0); 21];

        let fingers = [
            (index, HandLandmark::IndexFingerTip, HandLandmark::IndexFingerPip, HandLandmark::IndexFingerMcp, 0.40),
            (middle, HandLandmark::MiddleFingerTip, HandLandmark::MiddleFingerPip, HandLandmark::MiddleFingerMcp, 0.47),
            (ring, HandLandmark::RingFingerTip, HandLandmark::RingFingerPip, HandLandmark::RingFingerMcp, 0.54),
            (pinky, HandLandmark::PinkyTip, HandLandmark::PinkyPip, HandLandmark::PinkyMcp, 0.61),
        ];
        for ((tip_y, pip_y, mcp_y), tip, pip, mcp, x) in fingers {
            points[tip.index()] = LandmarkPoint::new(x, tip_y, 0.0);
            points[pip.index()] = LandmarkPoint::new(x, pip_y, 0.0);
            points[mcp.index()] = LandmarkPoint::new(x, mcp_y, 0.0);
        }

        points[HandLandmark::ThumbIp.index()] = LandmarkPoint::new(0.25, 0.60, 0.0);
        points[HandLandmark::ThumbTip.index()] = LandmarkPoint::new(0.20, 0.60, 0.0);
        points
    }

    pub fn pose(points: Vec<LandmarkPoint>) -> HandPose {
        HandPose::new(points).expect("fixture must have 21 landmarks")
    }

    pub fn peace_sign() -> HandPose {
        pose(hand(UP, UP, CURLED, CURLED))
    }

    pub fn pointing_up() -> HandPose {
        pose(hand(UP, CURLED, CURLED, CURLED))
    }

    pub fn three() -> HandPose {
        pose(hand(UP, UP, UP, CURLED))
    }

    pub fn open_hand() -> HandPose {
        pose(hand(UP, UP, UP, UP))
    }

    pub fn rock_n_roll() -> HandPose {
        pose(hand(UP, CURLED, CURLED, UP))
    }

    pub fn fist_with_thumb(tip_y: f32) -> HandPose {
        let mut points = hand(CURLED, CURLED, CURLED, CURLED);
        points[HandLandmark::ThumbTip.index()].y = tip_y;
        pose(points)
    }

    /// Shift every landmark; used to move the wrist between frames
    pub fn translated(pose_points: Vec<LandmarkPoint>, dx: f32, dy: f32) -> Vec<LandmarkPoint> {
        pose_points
            .into_iter()
            .map(|p| LandmarkPoint::new(p.x + dx, p.y + dy, p.z))
            .collect()
    }
}
