pub mod config;

// Gesture recognition
pub mod classifier;
pub mod motion_estimator;
pub mod cursor_mapper;
pub mod cooldown;

// Producer/consumer runtime
pub mod event_channel;
pub mod frame_processor;
pub mod dispatcher;
pub mod session;
