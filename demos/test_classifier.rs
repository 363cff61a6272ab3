/// Example program that classifies a few synthetic hand poses and runs a
/// short scripted session through the logging injector
/// Run with: cargo run --example test_classifier

use gesture_control_lib::core::classifier::GestureClassifier;
use gesture_control_lib::core::config::EngineConfig;
use gesture_control_lib::core::session::GestureSession;
use gesture_control_lib::models::pose::{HandLandmark, HandPose, LandmarkPoint, RawPoseFrame};
use gesture_control_lib::platform::input::{LoggingInjector, LoggingUiHandler};
use gesture_control_lib::platform::pose::VecSource;
use std::sync::Arc;

/// Synthetic hand: raised fingers are straight, the rest curled
fn hand_points(raised: [bool; 4], thumb_tip_y: f32, wrist_y: f32) -> Vec<LandmarkPoint> {
    let mut points = vec![LandmarkPoint::new(0.5, wrist_y, 0.0); 21];

    let fingers = [
        (HandLandmark::IndexFingerTip, HandLandmark::IndexFingerPip, HandLandmark::IndexFingerMcp, 0.40),
        (HandLandmark::MiddleFingerTip, HandLandmark::MiddleFingerPip, HandLandmark::MiddleFingerMcp, 0.47),
        (HandLandmark::RingFingerTip, HandLandmark::RingFingerPip, HandLandmark::RingFingerMcp, 0.54),
        (HandLandmark::PinkyTip, HandLandmark::PinkyPip, HandLandmark::PinkyMcp, 0.61),
    ];
    for ((tip, pip, mcp, x), up) in fingers.into_iter().zip(raised) {
        points[tip.index()] = LandmarkPoint::new(x, if up { 0.30 } else { 0.55 }, 0.0);
        points[pip.index()] = LandmarkPoint::new(x, 0.40, 0.0);
        points[mcp.index()] = LandmarkPoint::new(x, 0.50, 0.0);
    }

    points[HandLandmark::ThumbIp.index()] = LandmarkPoint::new(0.25, 0.60, 0.0);
    points[HandLandmark::ThumbTip.index()] = LandmarkPoint::new(0.20, thumb_tip_y, 0.0);
    points
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Gesture Classifier Test ===\n");

    let classifier = GestureClassifier::new();
    println!("Rules (priority order):");
    for (i, rule) in classifier.rules().iter().enumerate() {
        println!("  {}. {}", i + 1, rule.label);
    }
    println!();

    let shapes = [
        ("index only", [true, false, false, false], 0.60),
        ("index + middle", [true, true, false, false], 0.60),
        ("three fingers", [true, true, true, false], 0.60),
        ("index + pinky", [true, false, false, true], 0.60),
        ("all fingers", [true, true, true, true], 0.60),
        ("fist, thumb raised", [false, false, false, false], 0.50),
        ("fist, thumb lowered", [false, false, false, false], 0.70),
        ("fist, thumb level", [false, false, false, false], 0.60),
    ];

    println!("Classification:");
    for (name, raised, thumb_y) in shapes {
        let pose = HandPose::new(hand_points(raised, thumb_y, 0.8))?;
        println!("  {:<22} -> {}", name, classifier.classify(&pose));
    }
    println!();

    // Peace sign moving down the frame, then a pause and an open hand
    let mut frames: Vec<RawPoseFrame> = (0..5)
        .map(|i| RawPoseFrame {
            timestamp: i * 100,
            frame_width: 640,
            frame_height: 480,
            hands: vec![hand_points([true, true, false, false], 0.60, 0.60 + 0.03 * i as f32)],
        })
        .collect();
    frames.push(RawPoseFrame {
        timestamp: 500,
        frame_width: 640,
        frame_height: 480,
        hands: Vec::new(),
    });
    frames.push(RawPoseFrame {
        timestamp: 600,
        frame_width: 640,
        frame_height: 480,
        hands: vec![hand_points([true, true, true, true], 0.60, 0.8)],
    });

    println!("Scripted session ({} frames):", frames.len());
    let session = GestureSession::new(EngineConfig::default())?;
    session
        .start(
            VecSource::new(frames),
            Arc::new(LoggingInjector::new()),
            Box::new(LoggingUiHandler::new()),
        )
        .await?;
    let stats = session.wait().await?;

    println!("  Frames processed:    {}", stats.frames_processed);
    println!("  Events pushed:       {}", stats.events_pushed);
    println!("  Gestures dispatched: {}", stats.gestures_dispatched);
    println!("  Gestures debounced:  {}", stats.gestures_debounced);
    println!("  Scrolls dispatched:  {}", stats.scrolls_dispatched);

    println!("\n=== Test Complete ===");
    Ok(())
}
