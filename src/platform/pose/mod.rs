// Pose providers - where hand landmark frames come from

pub mod source;

pub use source::{ChannelSource, PoseSource, ReplaySource, VecSource};
