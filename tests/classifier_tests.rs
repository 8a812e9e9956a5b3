//! Gesture classifier tests on synthetic and randomized hands

mod test_helpers;

use gesture_effects::{
    classifier::{GestureClass, GestureClassifier, GestureObservation},
    config::{ClassifierConfig, TieBreak},
    landmarks::{Landmark, LandmarkFrame, INDEX_TIP, PINKY_TIP, THUMB_TIP},
    synthetic,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use test_helpers::jittered;

fn classify(frame: &LandmarkFrame) -> GestureClass {
    GestureClassifier::default().classify(frame).class
}

fn with_joint(frame: &LandmarkFrame, joint: usize, landmark: Landmark) -> LandmarkFrame {
    let mut points = frame.points().to_vec();
    points[joint] = landmark;
    LandmarkFrame::new(points)
}

#[test]
fn test_pinch_threshold_boundary() {
    let base = synthetic::pinch();
    let thumb = base.get(THUMB_TIP).copied().unwrap();

    // Index tip straight to the right of the thumb tip
    let near = with_joint(&base, INDEX_TIP, Landmark::new(thumb.x + 0.069, thumb.y, 0.0));
    let far = with_joint(&base, INDEX_TIP, Landmark::new(thumb.x + 0.071, thumb.y, 0.0));

    assert_eq!(classify(&near), GestureClass::Pinch);
    assert_ne!(classify(&far), GestureClass::Pinch);
}

#[test]
fn test_pinch_ignores_depth() {
    let base = synthetic::pinch();
    let tip = base.get(INDEX_TIP).copied().unwrap();
    let deep = with_joint(&base, INDEX_TIP, Landmark::new(tip.x, tip.y, 0.5));
    assert_eq!(classify(&deep), GestureClass::Pinch);
}

#[test]
fn test_palm_requires_every_tip_above_wrist() {
    let dropped = with_joint(&synthetic::closed_palm(), PINKY_TIP, Landmark::new(0.55, 0.9, 0.0));
    assert_eq!(classify(&dropped), GestureClass::None);

    let thumb_down = with_joint(&synthetic::closed_palm(), THUMB_TIP, Landmark::new(0.3, 0.85, 0.0));
    assert_eq!(classify(&thumb_down), GestureClass::None);
}

#[test]
fn test_pinch_outranks_other_active_classes() {
    // The pinch pose also has every tip above the wrist
    let classifier = GestureClassifier::default();
    let scores = classifier.scores(&synthetic::pinch());
    assert!(scores[0].active);
    assert!(scores[2].active);
    assert_eq!(classifier.classify(&synthetic::pinch()).class, GestureClass::Pinch);
}

#[test]
fn test_confidence_policy_can_override_priority() {
    let classifier = GestureClassifier::new(ClassifierConfig {
        tie_break: TieBreak::Confidence,
        ..ClassifierConfig::default()
    });
    let observation = classifier.classify(&synthetic::pinch());
    let best = classifier
        .scores(&synthetic::pinch())
        .into_iter()
        .filter(|s| s.active)
        .fold(0.0_f64, |acc, s| acc.max(s.confidence));
    assert!((observation.confidence - best).abs() < 1e-12);
}

#[test]
fn test_open_palm_confidence_exceeds_closed_palm() {
    let classifier = GestureClassifier::default();
    let open = classifier.classify(&synthetic::open_palm());
    let closed = classifier.classify(&synthetic::closed_palm());
    assert_eq!(open.class, GestureClass::Palm);
    assert!(open.confidence > closed.confidence);
}

#[test]
fn test_jitter_keeps_synthetic_classes() {
    let mut rng = StdRng::seed_from_u64(42);
    let cases = [
        (synthetic::pinch(), GestureClass::Pinch),
        (synthetic::point(), GestureClass::Point),
        (synthetic::open_palm(), GestureClass::Palm),
    ];
    for (frame, expected) in cases {
        for _ in 0..50 {
            assert_eq!(classify(&jittered(&frame, &mut rng, 0.002)), expected);
        }
    }
}

#[test]
fn test_nan_coordinate_is_none() {
    let frame = with_joint(&synthetic::pinch(), 11, Landmark::new(0.5, f64::NAN, 0.0));
    assert_eq!(GestureClassifier::default().classify(&frame), GestureObservation::NONE);
}

fn frame_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = LandmarkFrame> {
    prop::collection::vec((0.0..1.0f64, 0.0..1.0f64, -0.2..0.2f64), len)
        .prop_map(|points| LandmarkFrame::from_coords(&points.into_iter().map(|(x, y, z)| [x, y, z]).collect::<Vec<_>>()))
}

proptest! {
    #[test]
    fn prop_short_frames_are_none(frame in frame_strategy(0..21)) {
        prop_assert_eq!(GestureClassifier::default().classify(&frame), GestureObservation::NONE);
    }

    #[test]
    fn prop_confidence_within_unit_interval(frame in frame_strategy(21..22)) {
        let classifier = GestureClassifier::default();
        let observation = classifier.classify(&frame);
        prop_assert!((0.0..=1.0).contains(&observation.confidence));
        for score in classifier.scores(&frame) {
            prop_assert!(score.confidence.is_finite());
            prop_assert!((0.0..=1.0).contains(&score.confidence));
        }
        if observation.class.is_none() {
            prop_assert_eq!(observation.confidence, 0.0);
        }
    }

    #[test]
    fn prop_translation_does_not_change_class(dx in -0.1..0.1f64, dy in -0.1..0.1f64) {
        for frame in [synthetic::pinch(), synthetic::point(), synthetic::open_palm()] {
            let moved = synthetic::shifted(&frame, dx, dy);
            prop_assert_eq!(classify(&moved), classify(&frame));
        }
    }
}
