use std::collections::VecDeque;

use super::GestureFilter;
use crate::classifier::{GestureClass, GestureObservation};

/// Majority vote filter over the last `window_size` observations.
///
/// The stable class is recomputed from the window contents on every call: it
/// is the most frequent non-`None` class, reported only once the window is
/// full and only if that class fills at least `majority_ratio` of it.
pub struct MajorityVoteFilter {
    window_size: usize,
    required: usize,
    window: VecDeque<GestureClass>,
}

impl MajorityVoteFilter {
    /// Create a new majority vote filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero or `majority_ratio` is outside (0, 1]
    #[must_use]
    pub fn new(window_size: usize, majority_ratio: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(
            majority_ratio > 0.0 && majority_ratio <= 1.0,
            "Majority ratio must be in (0, 1], got {}",
            majority_ratio
        );
        // Guard against 0.6 * 5 landing a hair above 3.0
        let required = ((majority_ratio * window_size as f64) - 1e-9).ceil().max(1.0) as usize;
        Self {
            window_size,
            required,
            window: VecDeque::with_capacity(window_size),
        }
    }

    /// Occurrences needed for a class to be stable
    #[must_use]
    pub const fn required_count(&self) -> usize {
        self.required
    }

    /// Current window contents, oldest first
    pub fn window(&self) -> impl Iterator<Item = GestureClass> + '_ {
        self.window.iter().copied()
    }

    fn majority(&self) -> GestureClass {
        if self.window.len() < self.window_size {
            return GestureClass::None;
        }

        // Priority order breaks ties between equally frequent classes
        let mut best = (GestureClass::None, 0);
        for class in GestureClass::PRIORITY {
            let count = self.window.iter().filter(|&&c| c == class).count();
            if count > best.1 {
                best = (class, count);
            }
        }

        if best.1 >= self.required {
            best.0
        } else {
            GestureClass::None
        }
    }
}

impl GestureFilter for MajorityVoteFilter {
    fn observe(&mut self, observation: GestureObservation) -> GestureClass {
        if self.window.len() >= self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(observation.class);

        self.majority()
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn name(&self) -> &str {
        "MajorityVoteFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GestureClass::{None as NoGesture, Palm, Pinch, Point};

    fn feed(filter: &mut MajorityVoteFilter, classes: &[GestureClass]) -> GestureClass {
        let mut last = NoGesture;
        for &class in classes {
            last = filter.observe(GestureObservation::new(class, 1.0));
        }
        last
    }

    #[test]
    fn test_required_count() {
        assert_eq!(MajorityVoteFilter::new(5, 0.6).required_count(), 3);
        assert_eq!(MajorityVoteFilter::new(5, 1.0).required_count(), 5);
        assert_eq!(MajorityVoteFilter::new(3, 0.5).required_count(), 2);
        assert_eq!(MajorityVoteFilter::new(4, 0.01).required_count(), 1);
    }

    #[test]
    fn test_absorbs_single_misclassification() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        assert_eq!(feed(&mut filter, &[Pinch, Pinch, Point, Pinch, Pinch]), Pinch);
    }

    #[test]
    fn test_no_majority() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        assert_eq!(feed(&mut filter, &[Pinch, Point, Palm, NoGesture, Pinch]), NoGesture);
    }

    #[test]
    fn test_requires_full_window() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        for _ in 0..4 {
            assert_eq!(filter.observe(GestureObservation::new(Palm, 1.0)), NoGesture);
        }
        assert_eq!(filter.observe(GestureObservation::new(Palm, 1.0)), Palm);
    }

    #[test]
    fn test_oldest_dropped_on_overflow() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        feed(&mut filter, &[Palm, Palm, Palm, Point, Point]);
        assert_eq!(filter.observe(GestureObservation::new(Point, 1.0)), Point);
        assert_eq!(filter.window().count(), 5);
        assert_eq!(filter.window().next(), Some(Palm));
    }

    #[test]
    fn test_none_majority_is_not_stable() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        assert_eq!(feed(&mut filter, &[NoGesture, NoGesture, NoGesture, Pinch, Pinch]), NoGesture);
    }

    #[test]
    fn test_reset_empties_window() {
        let mut filter = MajorityVoteFilter::new(5, 0.6);
        feed(&mut filter, &[Palm; 5]);
        filter.reset();
        assert_eq!(filter.window().count(), 0);
        assert_eq!(filter.observe(GestureObservation::new(Palm, 1.0)), NoGesture);
    }
}
