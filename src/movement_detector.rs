//! Movement detection for tracking whether the hand is held still.
//!
//! This module keeps a rolling buffer of wrist positions and reports the hand
//! as still when every buffered position lies within a threshold of the
//! buffer's mean.

use nalgebra::Vector3;
use std::collections::VecDeque;

/// Wrist stillness detector using a rolling position buffer
#[derive(Debug, Clone)]
pub struct MovementDetector {
    window_size: usize,
    movement_threshold: f64,
    positions: VecDeque<Vector3<f64>>,
}

impl MovementDetector {
    /// Create a new movement detector
    #[must_use]
    pub fn new(window_size: usize, movement_threshold: f64) -> Self {
        Self {
            window_size,
            movement_threshold,
            positions: VecDeque::with_capacity(window_size),
        }
    }

    /// Record a wrist position; the oldest is dropped once the buffer is full
    pub fn push(&mut self, position: Vector3<f64>) {
        if self.window_size == 0 {
            return;
        }
        if self.positions.len() >= self.window_size {
            self.positions.pop_front();
        }
        self.positions.push_back(position);
    }

    /// Buffer is full and its maximum deviation is below the threshold
    #[must_use]
    pub fn is_still(&self) -> bool {
        self.get_stats()
            .is_some_and(|stats| stats.max_deviation < self.movement_threshold)
    }

    /// Record a position and report stillness
    pub fn update(&mut self, position: Vector3<f64>) -> bool {
        self.push(position);
        self.is_still()
    }

    /// Get current statistics, once the buffer is full
    #[must_use]
    pub fn get_stats(&self) -> Option<Statistics> {
        if self.window_size == 0 || self.positions.len() < self.window_size {
            return None;
        }
        Some(Self::calculate_stats(&self.positions))
    }

    /// Number of buffered positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reset the detector
    pub fn reset(&mut self) {
        self.positions.clear();
    }

    /// Calculate statistics for a position window
    fn calculate_stats(data: &VecDeque<Vector3<f64>>) -> Statistics {
        let n = data.len() as f64;
        let mean = data.iter().fold(Vector3::zeros(), |acc, p| acc + p) / n;

        let deviations = data.iter().map(|p| (p - mean).norm());
        let max_deviation = deviations.clone().fold(0.0, f64::max);
        let mean_deviation = deviations.sum::<f64>() / n;

        Statistics {
            mean,
            max_deviation,
            mean_deviation,
        }
    }
}

/// Statistical summary of a position window
#[derive(Debug, Clone, Copy)]
pub struct Statistics {
    /// Mean position
    pub mean: Vector3<f64>,
    /// Largest distance of any position from the mean
    pub max_deviation: f64,
    /// Average distance of the positions from the mean
    pub mean_deviation: f64,
}
