//! Vector geometry on hand landmarks.
//!
//! Planar measurements use the image (x, y) plane only; depth is used for the
//! palm normal. Every division is taken over a floored denominator so that
//! degenerate (zero-length) vectors produce a defined value instead of NaN.

use nalgebra::{Vector2, Vector3};

use crate::{
    constants::EPSILON,
    landmarks::{LandmarkFrame, FINGER_TIPS, INDEX_MCP, MIDDLE_MCP, PINKY_MCP, WRIST},
};

/// Project onto the image plane
#[must_use]
pub fn planar(v: &Vector3<f64>) -> Vector2<f64> {
    Vector2::new(v.x, v.y)
}

/// Euclidean distance in the image plane
#[must_use]
pub fn planar_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (planar(a) - planar(b)).norm()
}

/// Cosine of the angle between two planar vectors.
///
/// Returns 0 when either vector is degenerate.
#[must_use]
pub fn planar_cosine(u: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
    let denom = (u.norm() * v.norm()).max(EPSILON * EPSILON);
    (u.dot(v) / denom).clamp(-1.0, 1.0)
}

/// Interior angle at `vertex` formed by `a` and `c`, in radians.
///
/// A straight chain `a - vertex - c` gives π; a fully folded one gives 0.
#[must_use]
pub fn joint_angle(a: &Vector3<f64>, vertex: &Vector3<f64>, c: &Vector3<f64>) -> f64 {
    let u = planar(&(a - vertex));
    let v = planar(&(c - vertex));
    planar_cosine(&u, &v).acos()
}

/// `point` lies above `reference` (smaller image y) by more than `margin`
#[must_use]
pub fn is_above(point: &Vector3<f64>, reference: &Vector3<f64>, margin: f64) -> bool {
    point.y < reference.y - margin
}

/// Unit palm normal from the wrist-to-middle-MCP and index-to-pinky-MCP edges.
///
/// Returns `None` when the two edges are parallel or degenerate.
#[must_use]
pub fn palm_normal(frame: &LandmarkFrame) -> Option<Vector3<f64>> {
    let wrist = frame.joint(WRIST);
    let along = frame.joint(MIDDLE_MCP) - wrist;
    let across = frame.joint(PINKY_MCP) - frame.joint(INDEX_MCP);
    let normal = along.cross(&across);
    let length = normal.norm();
    if length <= f64::EPSILON {
        return None;
    }
    Some(normal / length)
}

/// How squarely the palm faces the camera: 0 for edge-on, 1 for frontal
#[must_use]
pub fn palm_frontality(frame: &LandmarkFrame) -> f64 {
    palm_normal(frame).map_or(0.0, |n| n.z.abs())
}

/// Average planar distance between adjacent non-thumb fingertips
#[must_use]
pub fn finger_spread(frame: &LandmarkFrame) -> f64 {
    let gaps: Vec<f64> = FINGER_TIPS
        .windows(2)
        .map(|pair| planar_distance(&frame.joint(pair[0]), &frame.joint(pair[1])))
        .collect();
    gaps.iter().sum::<f64>() / gaps.len() as f64
}
