// Motion estimation - turns wrist movement during a scroll gesture into scroll directions

use crate::models::gesture::Direction;
use std::collections::VecDeque;

/// Default number of wrist samples kept per axis
pub const DEFAULT_WINDOW: usize = 10;

/// Default mean per-frame displacement (pixels) needed to report a direction
pub const DEFAULT_THRESHOLD_PX: f32 = 5.0;

/// Result of one estimator update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollEstimate {
    pub up_down: Option<Direction>,
    pub left_right: Option<Direction>,
}

impl ScrollEstimate {
    pub fn none() -> Self {
        Self::default()
    }

    /// Directions present in this estimate, vertical first
    pub fn directions(&self) -> impl Iterator<Item = Direction> {
        self.up_down.into_iter().chain(self.left_right)
    }
}

/// Rolling-window wrist tracker.
///
/// History only accumulates while the scroll gesture is held; any inactive
/// update wipes it, so a fresh activation needs two new samples before a
/// direction can be reported.
pub struct MotionEstimator {
    capacity: usize,
    threshold_px: f32,
    x_history: VecDeque<f32>,
    y_history: VecDeque<f32>,
}

impl MotionEstimator {
    /// Create a new estimator
    ///
    /// # Arguments
    /// * `capacity` - Samples kept per axis; the oldest is evicted on overflow
    /// * `threshold_px` - Mean displacement per frame that counts as movement
    pub fn new(capacity: usize, threshold_px: f32) -> Self {
        let capacity = capacity.max(2);
        Self {
            capacity,
            threshold_px,
            x_history: VecDeque::with_capacity(capacity),
            y_history: VecDeque::with_capacity(capacity),
        }
    }

    /// Feed one frame. `active` is whether the scroll gesture is currently shown.
    pub fn update(&mut self, active: bool, wrist_px: (f32, f32)) -> ScrollEstimate {
        if !active {
            self.reset();
            return ScrollEstimate::none();
        }

        Self::push_bounded(&mut self.x_history, wrist_px.0, self.capacity);
        Self::push_bounded(&mut self.y_history, wrist_px.1, self.capacity);

        ScrollEstimate {
            up_down: self
                .axis_direction(&self.y_history)
                .map(|positive| if positive { Direction::Down } else { Direction::Up }),
            left_right: self
                .axis_direction(&self.x_history)
                .map(|positive| if positive { Direction::Right } else { Direction::Left }),
        }
    }

    /// Clear both histories
    pub fn reset(&mut self) {
        self.x_history.clear();
        self.y_history.clear();
    }

    /// Number of samples currently held (both axes hold the same count)
    pub fn len(&self) -> usize {
        self.y_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_bounded(history: &mut VecDeque<f32>, value: f32, capacity: usize) {
        while history.len() >= capacity {
            history.pop_front();
        }
        history.push_back(value);
    }

    /// `Some(true)` for movement toward larger coordinates, `Some(false)` toward smaller
    fn axis_direction(&self, history: &VecDeque<f32>) -> Option<bool> {
        let mean = Self::mean_step(history)?;
        if mean >= self.threshold_px {
            Some(true)
        } else if mean <= -self.threshold_px {
            Some(false)
        } else {
            None
        }
    }

    /// Mean of consecutive first differences; needs at least two samples
    fn mean_step(history: &VecDeque<f32>) -> Option<f32> {
        if history.len() < 2 {
            return None;
        }

        let steps = history
            .iter()
            .zip(history.iter().skip(1))
            .map(|(prev, next)| next - prev);
        let total: f32 = steps.sum();

        Some(total / (history.len() - 1) as f32)
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_THRESHOLD_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_y(estimator: &mut MotionEstimator, ys: &[f32]) -> ScrollEstimate {
        let mut last = ScrollEstimate::none();
        for y in ys {
            last = estimator.update(true, (320.0, *y));
        }
        last
    }

    #[test]
    fn test_downward_motion() {
        let mut estimator = MotionEstimator::default();
        let ys: Vec<f32> = (0..10).map(|i| 100.0 + 5.0 * i as f32).collect();

        let estimate = feed_y(&mut estimator, &ys);
        assert_eq!(estimate.up_down, Some(Direction::Down));
        assert_eq!(estimate.left_right, None);
    }

    #[test]
    fn test_upward_motion() {
        let mut estimator = MotionEstimator::default();
        let ys: Vec<f32> = (0..10).rev().map(|i| 100.0 + 5.0 * i as f32).collect();

        let estimate = feed_y(&mut estimator, &ys);
        assert_eq!(estimate.up_down, Some(Direction::Up));
    }

    #[test]
    fn test_constant_position_has_no_direction() {
        let mut estimator = MotionEstimator::default();
        let estimate = feed_y(&mut estimator, &[200.0; 10]);
        assert_eq!(estimate, ScrollEstimate::none());
    }

    #[test]
    fn test_single_sample_has_no_direction() {
        let mut estimator = MotionEstimator::default();
        let estimate = estimator.update(true, (0.0, 100.0));
        assert_eq!(estimate, ScrollEstimate::none());
        assert_eq!(estimator.len(), 1);
    }

    #[test]
    fn test_horizontal_motion() {
        let mut estimator = MotionEstimator::default();
        estimator.update(true, (100.0, 50.0));
        let estimate = estimator.update(true, (90.0, 50.0));
        assert_eq!(estimate.left_right, Some(Direction::Left));
        assert_eq!(estimate.up_down, None);

        let directions: Vec<_> = estimate.directions().collect();
        assert_eq!(directions, vec![Direction::Left]);
    }

    #[test]
    fn test_small_jitter_is_ignored() {
        let mut estimator = MotionEstimator::default();
        let estimate = feed_y(&mut estimator, &[100.0, 102.0, 101.0, 104.0, 103.0]);
        assert_eq!(estimate.up_down, None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut estimator = MotionEstimator::new(10, 5.0);

        // A long downward run followed by a steady hold: once the window has
        // rolled past the run the hold dominates.
        let mut ys: Vec<f32> = (0..10).map(|i| 100.0 + 10.0 * i as f32).collect();
        ys.extend([190.0; 10]);

        let estimate = feed_y(&mut estimator, &ys);
        assert_eq!(estimator.len(), 10);
        assert_eq!(estimate.up_down, None);
    }

    #[test]
    fn test_deactivation_clears_history() {
        let mut estimator = MotionEstimator::default();
        feed_y(&mut estimator, &[100.0, 110.0, 120.0]);
        assert_eq!(estimator.len(), 3);

        let estimate = estimator.update(false, (0.0, 130.0));
        assert_eq!(estimate, ScrollEstimate::none());
        assert!(estimator.is_empty());

        // Reactivation needs two fresh samples
        let estimate = estimator.update(true, (0.0, 140.0));
        assert_eq!(estimate.up_down, None);
        let estimate = estimator.update(true, (0.0, 150.0));
        assert_eq!(estimate.up_down, Some(Direction::Down));
    }
}
