//! Gesture classification from a single landmark frame.
//!
//! Each gesture class is evaluated independently into an
//! [`ClassScore`] (an "active" predicate plus a confidence in `[0, 1]`), then
//! the scores are combined according to the configured [`TieBreak`]. With the
//! default fixed-priority policy Pinch beats Point beats Palm whenever the
//! higher-priority class is active, regardless of confidences.

use log::debug;
use nalgebra::Vector3;

use crate::{
    config::{ClassifierConfig, TieBreak},
    constants::{
        PALM_FRONTALITY_WEIGHT, PALM_SHAPE_WEIGHT, PALM_SPREAD_WEIGHT, PINCH_ALIGNMENT_WEIGHT,
        PINCH_DISTANCE_WEIGHT, PINCH_POSITION_WEIGHT, POINT_CURL_WEIGHT, POINT_EXTENSION_WEIGHT,
        SPREAD_NORMALIZATION,
    },
    geometry::{finger_spread, is_above, joint_angle, palm_frontality, planar, planar_cosine, planar_distance},
    landmarks::{
        LandmarkFrame, FINGER_JOINTS, FINGER_TIPS, INDEX_PIP, INDEX_TIP, THUMB_IP, THUMB_TIP, WRIST,
    },
};

/// Discrete recognized hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureClass {
    /// No recognized gesture
    #[default]
    None,
    /// Thumb and index tips touching
    Pinch,
    /// Index extended, other fingers curled
    Point,
    /// Open hand, all tips above the wrist
    Palm,
}

impl GestureClass {
    /// Recognized classes in priority order
    pub const PRIORITY: [Self; 3] = [Self::Pinch, Self::Point, Self::Palm];

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pinch => "pinch",
            Self::Point => "point",
            Self::Palm => "palm",
        }
    }
}

impl std::fmt::Display for GestureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureObservation {
    pub class: GestureClass,
    /// Only meaningful when `class` is not `None`
    pub confidence: f64,
}

impl GestureObservation {
    /// The empty observation: no class, zero confidence
    pub const NONE: Self = Self {
        class: GestureClass::None,
        confidence: 0.0,
    };

    #[must_use]
    pub const fn new(class: GestureClass, confidence: f64) -> Self {
        Self { class, confidence }
    }
}

/// Per-class evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    pub class: GestureClass,
    pub active: bool,
    pub confidence: f64,
}

/// Stateless frame classifier
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    #[must_use]
    pub const fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one frame.
    ///
    /// Invalid frames (wrong length or a missing coordinate) yield
    /// [`GestureObservation::NONE`].
    #[must_use]
    pub fn classify(&self, frame: &LandmarkFrame) -> GestureObservation {
        if !frame.is_valid() {
            return GestureObservation::NONE;
        }

        let scores = self.scores(frame);
        let winner = match self.config.tie_break {
            TieBreak::Priority => scores.iter().find(|s| s.active),
            TieBreak::Confidence => scores
                .iter()
                .filter(|s| s.active)
                .fold(None, |best: Option<&ClassScore>, s| match best {
                    Some(b) if b.confidence >= s.confidence => Some(b),
                    _ => Some(s),
                }),
        };

        let observation = winner.map_or(GestureObservation::NONE, |s| {
            GestureObservation::new(s.class, s.confidence)
        });
        debug!(
            "Classified frame as {} (confidence {:.2})",
            observation.class, observation.confidence
        );
        observation
    }

    /// Evaluate every class independently, in priority order.
    ///
    /// The frame must be valid.
    #[must_use]
    pub fn scores(&self, frame: &LandmarkFrame) -> [ClassScore; 3] {
        [self.score_pinch(frame), self.score_point(frame), self.score_palm(frame)]
    }

    /// Interior PIP angle exceeds the extension threshold
    #[must_use]
    pub fn is_finger_extended(&self, frame: &LandmarkFrame, finger: usize) -> bool {
        let (mcp, pip, tip) = FINGER_JOINTS[finger];
        joint_angle(&frame.joint(mcp), &frame.joint(pip), &frame.joint(tip)) > self.config.finger_extension_angle
    }

    fn score_pinch(&self, frame: &LandmarkFrame) -> ClassScore {
        let thumb_tip = frame.joint(THUMB_TIP);
        let index_tip = frame.joint(INDEX_TIP);
        let threshold = self.config.pinch_threshold;
        let distance = planar_distance(&thumb_tip, &index_tip);
        let distance_score = (1.0 - distance / threshold).max(0.0);

        let confidence = if self.config.blend_pinch_confidence {
            // Thumb and index should point at each other
            let thumb_dir = planar(&(thumb_tip - frame.joint(THUMB_IP)));
            let index_dir = planar(&(index_tip - frame.joint(INDEX_PIP)));
            let alignment = planar_cosine(&thumb_dir, &(-index_dir)).max(0.0);

            let midpoint: Vector3<f64> = (thumb_tip + index_tip) / 2.0;
            let hand_size = planar_distance(&frame.joint(WRIST), &midpoint).max(crate::constants::EPSILON);
            let position_score = (1.0 - 2.0 * distance / hand_size).max(0.0);

            distance_score * PINCH_DISTANCE_WEIGHT
                + alignment * PINCH_ALIGNMENT_WEIGHT
                + position_score * PINCH_POSITION_WEIGHT
        } else {
            distance_score
        };

        ClassScore {
            class: GestureClass::Pinch,
            active: distance < threshold,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    fn score_point(&self, frame: &LandmarkFrame) -> ClassScore {
        let wrist = frame.joint(WRIST);
        let index_extended = self.is_finger_extended(frame, 0)
            && is_above(&frame.joint(INDEX_TIP), &wrist, self.config.point_margin);
        let curled = (1..4).filter(|&f| !self.is_finger_extended(frame, f)).count();
        let curl_fraction = curled as f64 / 3.0;

        let extension_score = if index_extended { 1.0 } else { 0.0 };
        let confidence = extension_score * POINT_EXTENSION_WEIGHT + curl_fraction * POINT_CURL_WEIGHT;

        ClassScore {
            class: GestureClass::Point,
            active: index_extended && curled == 3,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    fn score_palm(&self, frame: &LandmarkFrame) -> ClassScore {
        let active = is_palm_shape(frame, self.config.palm_margin);
        let confidence = if active {
            let spread = (finger_spread(frame) * SPREAD_NORMALIZATION).min(1.0);
            PALM_SHAPE_WEIGHT + spread * PALM_SPREAD_WEIGHT + palm_frontality(frame) * PALM_FRONTALITY_WEIGHT
        } else {
            0.0
        };

        ClassScore {
            class: GestureClass::Palm,
            active,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// All four fingertips and the thumb tip lie above the wrist by `margin`.
///
/// The frame must be valid.
#[must_use]
pub fn is_palm_shape(frame: &LandmarkFrame, margin: f64) -> bool {
    let wrist = frame.joint(WRIST);
    FINGER_TIPS
        .iter()
        .chain(std::iter::once(&THUMB_TIP))
        .all(|&tip| is_above(&frame.joint(tip), &wrist, margin))
}
