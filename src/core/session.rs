// Gesture session - runs the producer and consumer as two tokio tasks

use crate::core::config::EngineConfig;
use crate::core::dispatcher::{DispatchStats, GestureDispatcher};
use crate::core::event_channel::event_channel;
use crate::core::frame_processor::{FrameProcessor, ProducerStats};
use crate::models::gesture::{GestureEvent, SessionStats};
use crate::models::pose::{PoseError, PoseResult};
use crate::platform::input::{InputInjector, UiHandler};
use crate::platform::pose::PoseSource;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

struct SessionTasks {
    session_id: String,
    started_at: i64,
    stop_tx: watch::Sender<bool>,
    producer: JoinHandle<ProducerStats>,
    consumer: JoinHandle<DispatchStats>,
}

/// One gesture-control session.
///
/// The producer reads frames from a `PoseSource` and feeds the event
/// channel; the consumer drains it every `poll_interval_ms`. The consumer
/// keeps running until the producer has gone away and the queue is empty,
/// so nothing already queued is lost on stop.
pub struct GestureSession {
    config: EngineConfig,
    is_running: Arc<RwLock<bool>>,
    drained: Arc<Notify>,
    tasks: Mutex<Option<SessionTasks>>,
}

impl GestureSession {
    pub fn new(config: EngineConfig) -> PoseResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            is_running: Arc::new(RwLock::new(false)),
            drained: Arc::new(Notify::new()),
            tasks: Mutex::new(None),
        })
    }

    /// Start processing frames from `source`.
    /// A finished session must be collected with `wait` or `stop` before restarting.
    pub async fn start<S>(
        &self,
        source: S,
        injector: Arc<dyn InputInjector>,
        ui: Box<dyn UiHandler>,
    ) -> PoseResult<()>
    where
        S: PoseSource + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        if tasks.is_some() {
            return Err(PoseError::AlreadyRunning);
        }

        let session_id = Uuid::new_v4().to_string();
        let (tx, rx) = event_channel::<GestureEvent>(self.config.queue_capacity);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        *self.is_running.write().await = true;

        // Producer
        let processor = FrameProcessor::new(self.config.clone());
        let mut source = source;
        let producer = tokio::spawn(async move {
            let mut processor = processor;
            info!("Reading frames from {}", source.describe());

            loop {
                let next = tokio::select! {
                    _ = stop_rx.changed() => {
                        debug!("Producer received stop signal");
                        break;
                    }
                    next = source.next_frame() => next,
                };

                match next {
                    Ok(Some(raw)) => {
                        if let Err(e) = processor.process_raw(raw, &tx) {
                            warn!("Skipping invalid frame: {}", e);
                        }
                    }
                    Ok(None) => {
                        info!("Pose source exhausted");
                        break;
                    }
                    Err(e) => {
                        warn!("Pose source failed: {}", e);
                        break;
                    }
                }
            }

            // Dropping the sender tells the consumer no more events will arrive
            drop(tx);
            processor.stats()
        });

        // Consumer
        let mut dispatcher = GestureDispatcher::new(&self.config, injector, ui);
        let poll_interval = self.config.poll_interval();
        let is_running = self.is_running.clone();
        let drained = self.drained.clone();
        let consumer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                dispatcher.drain(&rx);

                if rx.is_closed() {
                    dispatcher.drain(&rx);
                    break;
                }
            }

            *is_running.write().await = false;
            drained.notify_one();
            dispatcher.stats()
        });

        info!("Started gesture session {}", session_id);
        *tasks = Some(SessionTasks {
            session_id,
            started_at: chrono::Utc::now().timestamp_millis(),
            stop_tx,
            producer,
            consumer,
        });

        Ok(())
    }

    /// Signal the producer to stop, wait for both tasks and report statistics
    pub async fn stop(&self) -> PoseResult<SessionStats> {
        let tasks = self.tasks.lock().await.take().ok_or(PoseError::NotRunning)?;

        // The producer may already have exited at end of stream
        let _ = tasks.stop_tx.send(true);
        self.finish(tasks).await
    }

    /// Wait for the source to run dry and the queue to drain, then collect
    /// the session like `stop`
    pub async fn wait(&self) -> PoseResult<SessionStats> {
        self.finished().await;
        self.stop().await
    }

    /// Resolves once the consumer has drained the last event. Unlike `wait`
    /// this leaves the session in place, so it can be raced against other
    /// shutdown triggers.
    pub async fn finished(&self) {
        while self.is_running().await {
            self.drained.notified().await;
        }
    }

    /// True from `start` until the consumer has drained the last event
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub async fn session_id(&self) -> Option<String> {
        self.tasks
            .lock()
            .await
            .as_ref()
            .map(|tasks| tasks.session_id.clone())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn finish(&self, tasks: SessionTasks) -> PoseResult<SessionStats> {
        let SessionTasks {
            session_id,
            started_at,
            stop_tx,
            producer,
            consumer,
        } = tasks;

        let producer = producer
            .await
            .map_err(|e| PoseError::TaskFailed(format!("producer: {}", e)))?;
        let consumer = consumer
            .await
            .map_err(|e| PoseError::TaskFailed(format!("consumer: {}", e)))?;
        drop(stop_tx);

        *self.is_running.write().await = false;

        let stats = SessionStats {
            session_id,
            frames_processed: producer.frames_processed,
            frames_with_hand: producer.frames_with_hand,
            invalid_frames: producer.invalid_frames,
            events_pushed: producer.events_pushed,
            events_dropped: producer.events_dropped,
            gestures_dispatched: consumer.gestures_dispatched,
            gestures_debounced: consumer.gestures_debounced,
            scrolls_dispatched: consumer.scrolls_dispatched,
            injection_failures: consumer.injection_failures,
        };

        info!(
            "Gesture session {} finished after {} ms: {} frames, {} gestures dispatched",
            stats.session_id,
            chrono::Utc::now().timestamp_millis() - started_at,
            stats.frames_processed,
            stats.gestures_dispatched
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::{LandmarkPoint, RawPoseFrame};
    use crate::platform::input::{LoggingInjector, LoggingUiHandler};
    use crate::platform::pose::{ChannelSource, VecSource};
    use std::time::Duration;

    fn fast_config() -> EngineConfig {
        EngineConfig {
            poll_interval_ms: 5,
            ..EngineConfig::default()
        }
    }

    fn idle_frame(timestamp: i64) -> RawPoseFrame {
        RawPoseFrame {
            timestamp,
            frame_width: 640,
            frame_height: 480,
            hands: Vec::new(),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            queue_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GestureSession::new(config),
            Err(PoseError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let session = GestureSession::new(fast_config()).unwrap();
        let (_tx, source) = ChannelSource::channel(4);
        session
            .start(source, Arc::new(LoggingInjector::new()), Box::new(LoggingUiHandler::new()))
            .await
            .unwrap();
        assert!(session.is_running().await);
        assert!(session.session_id().await.is_some());

        let (_tx2, second) = ChannelSource::channel(4);
        let result = session
            .start(second, Arc::new(LoggingInjector::new()), Box::new(LoggingUiHandler::new()))
            .await;
        assert!(matches!(result, Err(PoseError::AlreadyRunning)));

        session.stop().await.unwrap();
        assert!(!session.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let session = GestureSession::new(fast_config()).unwrap();
        assert!(matches!(session.stop().await, Err(PoseError::NotRunning)));
        assert!(matches!(session.wait().await, Err(PoseError::NotRunning)));
    }

    #[tokio::test]
    async fn test_stop_interrupts_live_source() {
        let session = GestureSession::new(fast_config()).unwrap();
        let (tx, source) = ChannelSource::channel(4);
        session
            .start(source, Arc::new(LoggingInjector::new()), Box::new(LoggingUiHandler::new()))
            .await
            .unwrap();

        tx.send(idle_frame(0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Sender still alive: only the stop signal can end the producer
        let stats = session.stop().await.unwrap();
        assert_eq!(stats.frames_processed, 1);
        assert!(!stats.session_id.is_empty());
    }

    #[tokio::test]
    async fn test_wait_counts_invalid_frames() {
        let session = GestureSession::new(fast_config()).unwrap();
        let frames = vec![
            idle_frame(0),
            RawPoseFrame {
                hands: vec![vec![LandmarkPoint::default(); 5]],
                ..idle_frame(100)
            },
            RawPoseFrame {
                frame_width: 0,
                ..idle_frame(200)
            },
            idle_frame(300),
        ];

        session
            .start(
                VecSource::new(frames),
                Arc::new(LoggingInjector::new()),
                Box::new(LoggingUiHandler::new()),
            )
            .await
            .unwrap();
        let stats = session.wait().await.unwrap();

        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.invalid_frames, 2);
        assert_eq!(stats.events_pushed, 0);
        assert!(!session.is_running().await);
    }
}
