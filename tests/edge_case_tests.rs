//! Edge case tests for geometry, movement detection and the lock controller

use gesture_effects::{
    classifier::{GestureClass, GestureClassifier},
    config::{Config, LockConfig},
    constants::DEFAULT_PALM_MARGIN,
    geometry::{finger_spread, joint_angle, palm_frontality, planar_cosine},
    landmarks::{Landmark, LandmarkFrame},
    lock::{LockController, LockTransition},
    movement_detector::MovementDetector,
    pipeline::GesturePipeline,
    state::StateStore,
    synthetic,
};
use nalgebra::{Vector2, Vector3};
use std::f64::consts::FRAC_PI_2;
use std::time::{Duration, Instant};

#[test]
fn test_degenerate_vectors_have_defined_values() {
    let zero = Vector3::zeros();
    assert_eq!(planar_cosine(&Vector2::zeros(), &Vector2::new(1.0, 0.0)), 0.0);
    assert!((joint_angle(&zero, &zero, &zero) - FRAC_PI_2).abs() < 1e-12);

    let collapsed = synthetic::collapsed();
    assert_eq!(palm_frontality(&collapsed), 0.0);
    assert_eq!(finger_spread(&collapsed), 0.0);
}

#[test]
fn test_collapsed_hand_classification_is_finite() {
    let observation = GestureClassifier::default().classify(&synthetic::collapsed());
    // Every tip coincides, so only the pinch predicate holds
    assert_eq!(observation.class, GestureClass::Pinch);
    assert!(observation.confidence.is_finite());
    assert!((0.0..=1.0).contains(&observation.confidence));
}

#[test]
fn test_infinite_coordinate_is_dropped() {
    let mut points = synthetic::pinch().points().to_vec();
    points[3] = Landmark::new(f64::INFINITY, 0.5, 0.0);

    let store = StateStore::new();
    let mut pipeline = GesturePipeline::new(&Config::default(), store.clone()).unwrap();
    assert!(pipeline.on_frame(LandmarkFrame::new(points), Instant::now()).is_none());
    assert!(store.get_state().landmarks.is_none());
}

#[test]
fn test_movement_detector_extreme_values() {
    let mut detector = MovementDetector::new(3, 0.03);
    for _ in 0..3 {
        detector.update(Vector3::new(1e6, -1e6, 0.0));
    }
    assert!(detector.is_still());

    detector.update(Vector3::new(0.0, 0.0, 0.0));
    assert!(!detector.is_still());
    let stats = detector.get_stats().unwrap();
    assert!(stats.max_deviation > stats.mean_deviation);

    detector.reset();
    assert!(detector.get_stats().is_none());
}

#[test]
fn test_zero_hold_unlocks_on_frame_count_alone() {
    let config = LockConfig {
        reset_hold_ms: 0,
        ..LockConfig::default()
    };
    let mut lock = LockController::new(config, DEFAULT_PALM_MARGIN);
    let start = Instant::now();
    let palm = synthetic::open_palm();

    assert!(lock.step(&synthetic::pinch(), GestureClass::Pinch, start).is_some());
    let mut transition = None;
    for i in 1..=5 {
        transition = lock.step(&palm, GestureClass::None, start + Duration::from_millis(i));
        if transition.is_some() {
            break;
        }
    }
    // The wrist buffer fills on the fourth palm frame, so the count reaches five on the eighth
    assert_eq!(transition, None);
    assert_eq!(lock.state().reset_stability_count(), 2);

    let transition = (6..=8)
        .find_map(|i| lock.step(&palm, GestureClass::None, start + Duration::from_millis(i)));
    assert!(matches!(transition, Some(LockTransition::Unlocked { .. })));
    assert_eq!(lock.status(start).reset_progress, 0.0);
}

#[test]
fn test_same_gesture_is_selectable_again_after_reset() {
    let mut lock = LockController::default();
    let start = Instant::now();

    assert!(lock.step(&synthetic::point(), GestureClass::Point, start).is_some());
    lock.force_unlock();
    let again = lock.step(&synthetic::point(), GestureClass::Point, start + Duration::from_millis(33));
    assert!(matches!(
        again,
        Some(LockTransition::Locked {
            gesture: GestureClass::Point,
            ..
        })
    ));
}

#[test]
fn test_lock_status_with_clock_skew() {
    let mut lock = LockController::default();
    let start = Instant::now() + Duration::from_secs(10);
    assert!(lock.step(&synthetic::pinch(), GestureClass::Pinch, start).is_some());
    for i in 1..=6 {
        lock.step(&synthetic::open_palm(), GestureClass::None, start + Duration::from_millis(i * 10));
    }
    // Asking about an instant before the hold started saturates to zero
    let status = lock.status(start);
    assert!(status.is_in_reset);
    assert_eq!(status.reset_progress, 0.0);
}
