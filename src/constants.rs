//! Constants used throughout the application

use std::f64::consts::PI;

/// Number of joints in one hand landmark frame
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Default thumb-index distance below which a pinch is active (normalized units)
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.07;

/// Interior PIP angle above which a finger counts as extended (radians)
pub const DEFAULT_FINGER_EXTENSION_ANGLE: f64 = 0.6 * PI;

/// Height the index tip must clear above the wrist for a point
pub const DEFAULT_POINT_MARGIN: f64 = 0.05;

/// Height every tip must clear above the wrist for an open palm
pub const DEFAULT_PALM_MARGIN: f64 = 0.02;

/// Pinch confidence blend weights (distance, alignment, wrist-normalized position)
pub const PINCH_DISTANCE_WEIGHT: f64 = 0.6;
pub const PINCH_ALIGNMENT_WEIGHT: f64 = 0.3;
pub const PINCH_POSITION_WEIGHT: f64 = 0.1;

/// Point confidence weights (index extension, fraction of curled fingers)
pub const POINT_EXTENSION_WEIGHT: f64 = 0.6;
pub const POINT_CURL_WEIGHT: f64 = 0.4;

/// Palm confidence weights (base shape, spread, frontality)
pub const PALM_SHAPE_WEIGHT: f64 = 0.6;
pub const PALM_SPREAD_WEIGHT: f64 = 0.2;
pub const PALM_FRONTALITY_WEIGHT: f64 = 0.2;

/// Scale that maps average fingertip spread onto [0, 1]
pub const SPREAD_NORMALIZATION: f64 = 5.0;

/// Default stability window length
pub const DEFAULT_STABILITY_WINDOW: usize = 5;

/// Fraction of the window the majority class must occupy
pub const DEFAULT_MAJORITY_RATIO: f64 = 0.6;

/// Minimum reset-pose hold duration in milliseconds
pub const DEFAULT_RESET_HOLD_MS: u64 = 1500;

/// Consecutive qualifying frames required before a reset can fire
pub const DEFAULT_RESET_STABILITY_FRAMES: u32 = 5;

/// Minimum palm frontality for the reset pose
pub const DEFAULT_PALM_FRONTALITY_THRESHOLD: f64 = 0.6;

/// Maximum wrist deviation from its rolling mean for the reset pose
pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.03;

/// Minimum average adjacent-fingertip distance for the reset pose
pub const DEFAULT_MIN_FINGER_SPREAD: f64 = 0.07;

/// Wrist position buffer length
pub const DEFAULT_WRIST_BUFFER_SIZE: usize = 5;

/// Floor applied to vector magnitudes before dividing
pub const EPSILON: f64 = 1e-3;
