pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::classifier::{classify, GestureClassifier};
pub use crate::core::config::EngineConfig;
pub use crate::core::dispatcher::{ActionMap, GestureDispatcher};
pub use crate::core::frame_processor::FrameProcessor;
pub use crate::core::session::GestureSession;
pub use models::gesture::{Direction, GestureAction, GestureEvent, GestureLabel, SessionStats};
pub use models::pose::{HandPose, LandmarkPoint, PoseError, PoseFrame, PoseResult, RawPoseFrame};
