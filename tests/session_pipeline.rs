// End-to-end runs of a gesture session over in-memory pose sources

use gesture_control_lib::core::config::EngineConfig;
use gesture_control_lib::core::session::GestureSession;
use gesture_control_lib::models::gesture::{GestureAction, GestureLabel};
use gesture_control_lib::models::pose::{HandLandmark, LandmarkPoint, RawPoseFrame};
use gesture_control_lib::platform::input::{InjectResult, InputInjector, UiHandler};
use gesture_control_lib::platform::pose::{ChannelSource, VecSource};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

#[derive(Debug, Clone, PartialEq)]
enum Injected {
    Pointer,
    Scroll(i32),
    HScroll(i32),
    Click,
}

#[derive(Default)]
struct RecordingInjector {
    calls: Mutex<Vec<Injected>>,
}

impl RecordingInjector {
    fn calls(&self) -> Vec<Injected> {
        self.calls.lock().unwrap().clone()
    }
}

impl InputInjector for RecordingInjector {
    fn move_pointer(&self, _x: f32, _y: f32) -> InjectResult<()> {
        self.calls.lock().unwrap().push(Injected::Pointer);
        Ok(())
    }

    fn scroll(&self, amount: i32) -> InjectResult<()> {
        self.calls.lock().unwrap().push(Injected::Scroll(amount));
        Ok(())
    }

    fn hscroll(&self, amount: i32) -> InjectResult<()> {
        self.calls.lock().unwrap().push(Injected::HScroll(amount));
        Ok(())
    }

    fn click(&self) -> InjectResult<()> {
        self.calls.lock().unwrap().push(Injected::Click);
        Ok(())
    }
}

type UiLog = Arc<Mutex<Vec<(GestureAction, GestureLabel)>>>;

struct RecordingUi(UiLog);

impl UiHandler for RecordingUi {
    fn handle(&mut self, action: GestureAction, label: GestureLabel) {
        self.0.lock().unwrap().push((action, label));
    }
}

/// Landmarks for a hand with the given fingers raised, wrist at `wrist_y_px`.
/// The thumb is level so neither thumb gesture fires.
fn hand(raised: [bool; 4], wrist_y_px: f32) -> Vec<LandmarkPoint> {
    let dy = wrist_y_px / HEIGHT as f32 - 0.8;
    let mut points = vec![LandmarkPoint::new(0.5, 0.8 + dy, 0.0); 21];

    let fingers = [
        (HandLandmark::IndexFingerTip, HandLandmark::IndexFingerPip, HandLandmark::IndexFingerMcp, 0.40),
        (HandLandmark::MiddleFingerTip, HandLandmark::MiddleFingerPip, HandLandmark::MiddleFingerMcp, 0.47),
        (HandLandmark::RingFingerTip, HandLandmark::RingFingerPip, HandLandmark::RingFingerMcp, 0.54),
        (HandLandmark::PinkyTip, HandLandmark::PinkyPip, HandLandmark::PinkyMcp, 0.61),
    ];
    for ((tip, pip, mcp, x), up) in fingers.into_iter().zip(raised) {
        let tip_y = if up { 0.30 } else { 0.55 };
        points[tip.index()] = LandmarkPoint::new(x, tip_y + dy, 0.0);
        points[pip.index()] = LandmarkPoint::new(x, 0.40 + dy, 0.0);
        points[mcp.index()] = LandmarkPoint::new(x, 0.50 + dy, 0.0);
    }

    points[HandLandmark::ThumbIp.index()] = LandmarkPoint::new(0.25, 0.60 + dy, 0.0);
    points[HandLandmark::ThumbTip.index()] = LandmarkPoint::new(0.20, 0.60 + dy, 0.0);
    points
}

const PEACE: [bool; 4] = [true, true, false, false];
const THREE: [bool; 4] = [true, true, true, false];
const OPEN: [bool; 4] = [true, true, true, true];

fn frame(timestamp: i64, hand: Option<Vec<LandmarkPoint>>) -> RawPoseFrame {
    RawPoseFrame {
        timestamp,
        frame_width: WIDTH,
        frame_height: HEIGHT,
        hands: hand.into_iter().collect(),
    }
}

fn config() -> EngineConfig {
    EngineConfig {
        poll_interval_ms: 5,
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn test_peace_sign_scrolls_down_once() {
    let injector = Arc::new(RecordingInjector::default());
    let ui: UiLog = Arc::default();
    let session = GestureSession::new(config()).unwrap();

    let frames = vec![
        frame(0, Some(hand(PEACE, 200.0))),
        frame(100, Some(hand(PEACE, 210.0))),
        frame(200, Some(hand(PEACE, 220.0))),
    ];

    session
        .start(
            VecSource::new(frames),
            injector.clone(),
            Box::new(RecordingUi(ui.clone())),
        )
        .await
        .unwrap();
    let stats = session.wait().await.unwrap();

    assert_eq!(injector.calls(), vec![Injected::Scroll(-100)]);
    assert_eq!(stats.scrolls_dispatched, 1);
    assert_eq!(stats.frames_processed, 3);
    assert_eq!(stats.frames_with_hand, 3);

    // Scroll mode is announced once; the held sign is debounced
    assert_eq!(
        *ui.lock().unwrap(),
        vec![(GestureAction::ScrollMode, GestureLabel::PeaceSign)]
    );
    assert_eq!(stats.gestures_dispatched, 1);
    assert_eq!(stats.gestures_debounced, 2);
}

#[tokio::test]
async fn test_gesture_sequence_with_hand_loss() {
    let injector = Arc::new(RecordingInjector::default());
    let ui: UiLog = Arc::default();
    let session = GestureSession::new(config()).unwrap();

    let frames = vec![
        frame(0, Some(hand(THREE, 300.0))),
        frame(100, Some(hand(THREE, 300.0))),
        frame(200, None),
        // Hand came back: the same gesture triggers again
        frame(300, Some(hand(THREE, 300.0))),
        frame(400, Some(hand(OPEN, 300.0))),
    ];

    session
        .start(
            VecSource::new(frames),
            injector.clone(),
            Box::new(RecordingUi(ui.clone())),
        )
        .await
        .unwrap();
    let stats = session.wait().await.unwrap();

    assert_eq!(
        *ui.lock().unwrap(),
        vec![
            (GestureAction::OpenRoomList, GestureLabel::Three),
            (GestureAction::OpenRoomList, GestureLabel::Three),
        ]
    );
    assert_eq!(injector.calls(), vec![Injected::Click]);
    assert_eq!(stats.gestures_dispatched, 3);
    assert_eq!(stats.gestures_debounced, 1);
    assert_eq!(stats.frames_with_hand, 4);
}

#[tokio::test]
async fn test_live_source_debounce_window() {
    let injector = Arc::new(RecordingInjector::default());
    let ui: UiLog = Arc::default();
    let session = GestureSession::new(config()).unwrap();
    let (tx, source) = ChannelSource::channel(8);

    session
        .start(source, injector, Box::new(RecordingUi(ui.clone())))
        .await
        .unwrap();

    for timestamp in [0, 1_000, 4_999, 5_000] {
        tx.send(frame(timestamp, Some(hand(THREE, 300.0))))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    drop(tx);

    let stats = session.wait().await.unwrap();
    assert_eq!(ui.lock().unwrap().len(), 2);
    assert_eq!(stats.gestures_debounced, 2);
    assert!(!session.is_running().await);
}

#[tokio::test]
async fn test_session_can_restart_after_wait() {
    let session = GestureSession::new(config()).unwrap();
    let injector = Arc::new(RecordingInjector::default());

    for _ in 0..2 {
        let ui: UiLog = Arc::default();
        session
            .start(
                VecSource::new(vec![frame(0, Some(hand(THREE, 300.0)))]),
                injector.clone(),
                Box::new(RecordingUi(ui.clone())),
            )
            .await
            .unwrap();
        let stats = session.wait().await.unwrap();

        // Debounce state is per session
        assert_eq!(stats.gestures_dispatched, 1);
        assert_eq!(ui.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_overflow_keeps_newest_events() {
    let injector = Arc::new(RecordingInjector::default());
    let ui: UiLog = Arc::default();
    let session = GestureSession::new(EngineConfig {
        queue_capacity: 2,
        poll_interval_ms: 1_000,
        ..EngineConfig::default()
    })
    .unwrap();

    // The in-memory source never yields, so every frame is queued before the
    // consumer's first drain
    let frames = (0..6)
        .map(|i| frame(i * 100, Some(hand(if i % 2 == 0 { THREE } else { OPEN }, 300.0))))
        .collect();

    session
        .start(VecSource::new(frames), injector, Box::new(RecordingUi(ui)))
        .await
        .unwrap();
    let stats = session.wait().await.unwrap();

    assert_eq!(stats.events_pushed, 6);
    assert!(stats.events_dropped > 0);
    assert_eq!(
        stats.gestures_dispatched + stats.gestures_debounced + stats.events_dropped,
        6
    );
}
