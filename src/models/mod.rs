// Data models for hand poses, gesture labels and the events they produce

pub mod gesture;
pub mod pose;
