//! Hand landmark data produced by an external pose tracker.
//!
//! One [`LandmarkFrame`] holds the 21 joints of a single hand at one instant,
//! in the tracker's normalized image coordinates: `x` grows to the right,
//! `y` grows downward, and `z` is relative depth. A joint "above" the wrist
//! therefore has a smaller `y`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::NUM_HAND_LANDMARKS;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Tips of the four non-thumb fingers, index to pinky
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// (MCP, PIP, TIP) triples of the four non-thumb fingers, index to pinky
pub const FINGER_JOINTS: [(usize, usize, usize); 4] = [
    (INDEX_MCP, INDEX_PIP, INDEX_TIP),
    (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP),
    (RING_MCP, RING_PIP, RING_TIP),
    (PINKY_MCP, PINKY_PIP, PINKY_TIP),
];

/// A single tracked joint position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All three coordinates are present (finite)
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[must_use]
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Landmark {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// One detection cycle's worth of hand joints.
///
/// A frame is never mutated after construction. It may hold any number of
/// points; only frames passing [`LandmarkFrame::is_valid`] are classified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Build a frame from raw `[x, y, z]` triples
    #[must_use]
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self {
            points: coords.iter().copied().map(Landmark::from).collect(),
        }
    }

    /// Exactly 21 joints, each with every coordinate present
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.points.len() == NUM_HAND_LANDMARKS && self.points.iter().all(Landmark::is_finite)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, joint: usize) -> Option<&Landmark> {
        self.points.get(joint)
    }

    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Joint position as a vector.
    ///
    /// # Panics
    ///
    /// Panics if `joint` is out of range; callers check [`Self::is_valid`] first.
    #[must_use]
    pub fn joint(&self, joint: usize) -> Vector3<f64> {
        self.points[joint].to_vector()
    }

    /// Wrist position, if the frame has one
    #[must_use]
    pub fn wrist(&self) -> Option<Vector3<f64>> {
        self.get(WRIST).map(Landmark::to_vector)
    }
}
