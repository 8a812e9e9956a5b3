//! Deterministic synthetic hand poses.
//!
//! These frames stand in for tracker output in the demo session and the test
//! suite. All poses share a wrist at (0.50, 0.80, 0.0) so that switching
//! between them does not register as wrist movement.

use crate::landmarks::{
    Landmark, LandmarkFrame, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, PINKY_MCP, THUMB_TIP,
};

const WRIST: Landmark = Landmark::new(0.50, 0.80, 0.0);
const MCP_Y: f64 = 0.60;
const EXTENDED_TIP_Y: f64 = 0.36;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// MCP, PIP, DIP, TIP of a straight finger
fn extended_finger(mcp_x: f64, tip_x: f64) -> [Landmark; 4] {
    let at = |t: f64| Landmark::new(lerp(mcp_x, tip_x, t), lerp(MCP_Y, EXTENDED_TIP_Y, t), 0.0);
    [at(0.0), at(0.4), at(0.7), at(1.0)]
}

/// MCP, PIP, DIP, TIP of a finger folded back toward the palm
fn curled_finger(mcp_x: f64, tip_x: f64) -> [Landmark; 4] {
    [
        Landmark::new(mcp_x, MCP_Y, 0.0),
        Landmark::new(mcp_x, 0.53, 0.0),
        Landmark::new(lerp(mcp_x, tip_x, 0.5), 0.57, 0.0),
        Landmark::new(tip_x, 0.63, 0.0),
    ]
}

fn assemble(thumb: [Landmark; 4], fingers: [[Landmark; 4]; 4]) -> LandmarkFrame {
    let mut points = Vec::with_capacity(21);
    points.push(WRIST);
    points.extend_from_slice(&thumb);
    for finger in &fingers {
        points.extend_from_slice(finger);
    }
    LandmarkFrame::new(points)
}

fn raised_thumb() -> [Landmark; 4] {
    [
        Landmark::new(0.44, 0.75, 0.0),
        Landmark::new(0.38, 0.69, 0.0),
        Landmark::new(0.33, 0.63, 0.0),
        Landmark::new(0.29, 0.57, 0.0),
    ]
}

fn tucked_thumb() -> [Landmark; 4] {
    [
        Landmark::new(0.44, 0.75, 0.0),
        Landmark::new(0.40, 0.70, 0.0),
        Landmark::new(0.42, 0.65, 0.0),
        Landmark::new(0.46, 0.64, 0.0),
    ]
}

/// Frontal open hand with the fingers spread: the palm and reset pose
#[must_use]
pub fn open_palm() -> LandmarkFrame {
    assemble(
        raised_thumb(),
        [
            extended_finger(0.41, 0.36),
            extended_finger(0.47, 0.45),
            extended_finger(0.53, 0.54),
            extended_finger(0.59, 0.63),
        ],
    )
}

/// Frontal open hand with the fingers held together
#[must_use]
pub fn closed_palm() -> LandmarkFrame {
    assemble(
        raised_thumb(),
        [
            extended_finger(0.41, 0.43),
            extended_finger(0.47, 0.47),
            extended_finger(0.53, 0.51),
            extended_finger(0.59, 0.55),
        ],
    )
}

/// Index extended upward, the other fingers curled
#[must_use]
pub fn point() -> LandmarkFrame {
    assemble(
        tucked_thumb(),
        [
            extended_finger(0.41, 0.36),
            curled_finger(0.47, 0.48),
            curled_finger(0.53, 0.51),
            curled_finger(0.59, 0.54),
        ],
    )
}

/// Frontal pinch: thumb tip at (0.50, 0.50), index tip at (0.53, 0.52)
#[must_use]
pub fn pinch() -> LandmarkFrame {
    let thumb = [
        Landmark::new(0.44, 0.75, 0.0),
        Landmark::new(0.42, 0.67, 0.0),
        Landmark::new(0.45, 0.57, 0.0),
        Landmark::new(0.50, 0.50, 0.0),
    ];
    let index = [
        Landmark::new(0.45, 0.62, 0.0),
        Landmark::new(0.49, 0.52, 0.0),
        Landmark::new(0.52, 0.49, 0.0),
        Landmark::new(0.53, 0.52, 0.0),
    ];
    assemble(
        thumb,
        [
            index,
            curled_finger(0.49, 0.50),
            curled_finger(0.53, 0.53),
            curled_finger(0.57, 0.56),
        ],
    )
}

/// Pinch seen edge-on: the palm normal lies in the image plane
#[must_use]
pub fn side_pinch() -> LandmarkFrame {
    let mut points = pinch().points().to_vec();
    points[MIDDLE_MCP] = Landmark::new(0.50, 0.60, 0.02);
    points[INDEX_MCP] = Landmark::new(0.50, 0.60, -0.05);
    points[PINKY_MCP] = Landmark::new(0.50, 0.62, 0.10);
    LandmarkFrame::new(points)
}

/// Every joint at the same position
#[must_use]
pub fn collapsed() -> LandmarkFrame {
    LandmarkFrame::new(vec![Landmark::new(0.5, 0.5, 0.0); 21])
}

/// Translate every joint of `frame` in the image plane
#[must_use]
pub fn shifted(frame: &LandmarkFrame, dx: f64, dy: f64) -> LandmarkFrame {
    LandmarkFrame::new(
        frame
            .points()
            .iter()
            .map(|p| Landmark::new(p.x + dx, p.y + dy, p.z))
            .collect(),
    )
}

/// The first `len` joints of `frame`
#[must_use]
pub fn truncated(frame: &LandmarkFrame, len: usize) -> LandmarkFrame {
    LandmarkFrame::new(frame.points().iter().take(len).copied().collect())
}

/// Thumb-index tip distance of the frontal pinch pose
#[must_use]
pub fn pinch_distance() -> f64 {
    let frame = pinch();
    crate::geometry::planar_distance(&frame.joint(THUMB_TIP), &frame.joint(INDEX_TIP))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_poses_are_valid() {
        for frame in [open_palm(), closed_palm(), point(), pinch(), side_pinch(), collapsed()] {
            assert!(frame.is_valid());
        }
    }

    #[test]
    fn test_pinch_distance_matches_scenario() {
        assert!((pinch_distance() - 0.036).abs() < 1e-3);
    }

    #[test]
    fn test_shift_moves_wrist() {
        let moved = shifted(&open_palm(), 0.1, -0.1);
        let wrist = moved.wrist().unwrap();
        assert!((wrist.x - 0.6).abs() < 1e-12);
        assert!((wrist.y - 0.7).abs() < 1e-12);
    }
}
