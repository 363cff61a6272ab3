// Pose sources: replayed recordings, frames pushed by an external tracker,
// and in-memory sequences

use crate::models::pose::{PoseError, PoseResult, RawPoseFrame};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Supplier of hand tracking results, one frame at a time.
/// `Ok(None)` means the stream has ended.
#[async_trait]
pub trait PoseSource: Send {
    async fn next_frame(&mut self) -> PoseResult<Option<RawPoseFrame>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

// ==============================================================================
// Replay Source
// ==============================================================================

/// Reads `RawPoseFrame`s from a JSON-lines recording.
///
/// Blank lines are ignored. Lines that fail to parse are skipped with a
/// warning and counted; I/O errors end the stream with `SourceFailed`.
/// With real-time pacing enabled, frames are released according to the
/// difference between consecutive timestamps.
pub struct ReplaySource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    realtime: bool,
    last_timestamp: Option<i64>,
    line_number: usize,
    skipped_lines: usize,
}

impl ReplaySource {
    pub async fn open(path: &Path) -> PoseResult<Self> {
        let file = File::open(path).await.map_err(|e| {
            PoseError::SourceFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            realtime: false,
            last_timestamp: None,
            line_number: 0,
            skipped_lines: 0,
        })
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Lines that could not be parsed so far
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Sleep for the gap since the previous frame. Timestamps that stand
    /// still or run backwards release the frame immediately.
    async fn pace(&mut self, timestamp: i64) {
        if let Some(previous) = self.last_timestamp.replace(timestamp) {
            let gap = timestamp.saturating_sub(previous);
            if self.realtime && gap > 0 {
                tokio::time::sleep(Duration::from_millis(gap as u64)).await;
            }
        }
    }
}

#[async_trait]
impl PoseSource for ReplaySource {
    async fn next_frame(&mut self) -> PoseResult<Option<RawPoseFrame>> {
        loop {
            let line = self.lines.next_line().await.map_err(|e| {
                PoseError::SourceFailed(format!(
                    "Failed to read {} at line {}: {}",
                    self.path.display(),
                    self.line_number + 1,
                    e
                ))
            })?;

            let Some(line) = line else {
                debug!("Replay of {} finished after {} lines", self.path.display(), self.line_number);
                return Ok(None);
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<RawPoseFrame>(&line) {
                Ok(frame) => {
                    self.pace(frame.timestamp).await;
                    return Ok(Some(frame));
                }
                Err(e) => {
                    self.skipped_lines += 1;
                    warn!(
                        "Skipping malformed frame at {}:{}: {}",
                        self.path.display(),
                        self.line_number,
                        e
                    );
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!(
            "replay {}{}",
            self.path.display(),
            if self.realtime { " (real time)" } else { "" }
        )
    }
}

// ==============================================================================
// Channel Source
// ==============================================================================

/// Frames pushed by an external hand tracker through a tokio channel.
/// The stream ends when every sender is dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<RawPoseFrame>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<RawPoseFrame>) -> Self {
        Self { rx }
    }

    /// Create a bounded channel and the source reading from it
    pub fn channel(buffer: usize) -> (mpsc::Sender<RawPoseFrame>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl PoseSource for ChannelSource {
    async fn next_frame(&mut self) -> PoseResult<Option<RawPoseFrame>> {
        Ok(self.rx.recv().await)
    }

    fn describe(&self) -> String {
        "external tracker channel".to_string()
    }
}

// ==============================================================================
// In-memory Source
// ==============================================================================

/// Fixed sequence of frames, optionally spaced out in time
pub struct VecSource {
    frames: VecDeque<RawPoseFrame>,
    frame_delay: Option<Duration>,
}

impl VecSource {
    pub fn new(frames: Vec<RawPoseFrame>) -> Self {
        Self {
            frames: frames.into(),
            frame_delay: None,
        }
    }

    /// Sleep this long before yielding each frame
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl PoseSource for VecSource {
    async fn next_frame(&mut self) -> PoseResult<Option<RawPoseFrame>> {
        if self.frames.is_empty() {
            return Ok(None);
        }

        if let Some(delay) = self.frame_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.frames.pop_front())
    }

    fn describe(&self) -> String {
        format!("{} in-memory frames", self.frames.len())
    }
}
