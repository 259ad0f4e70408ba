//! Pointer velocity estimation.

use std::collections::VecDeque;
use std::time::Instant;

/// Most positions kept.
const HISTORY_SIZE: usize = 20;

/// Only positions this recent, relative to the newest, are used.
const HORIZON_MS: f64 = 100.0;

/// A pointer that moved less than [`MIN_MOVEMENT`] over this span is at rest.
const ASSUME_STOPPED_MS: f64 = 40.0;

const MIN_MOVEMENT: f64 = 2.0;

/// Per-sample weight falloff, newest first.
const DECAY: f64 = 0.95;

#[derive(Debug, Clone, Copy)]
struct Point {
    at: Instant,
    position: f64,
}

/// Estimates horizontal pointer velocity from recent positions.
///
/// The estimate is a least-squares slope over the last 100 ms with newer
/// positions weighted more, in pixels per millisecond.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    points: VecDeque<Point>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pointer at `position` pixels.
    pub fn add(&mut self, at: Instant, position: f64) {
        if self.points.len() == HISTORY_SIZE {
            self.points.pop_front();
        }
        self.points.push_back(Point { at, position });
    }

    /// Forget every recorded position.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Signed velocity in pixels per millisecond, 0 without enough data.
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.points.back() else {
            return 0.0;
        };

        // (time relative to the newest point in ms, position), newest first
        let window: Vec<(f64, f64)> = self
            .points
            .iter()
            .rev()
            .map(|p| {
                let age = newest.at.saturating_duration_since(p.at).as_secs_f64() * 1000.0;
                (-age, p.position)
            })
            .take_while(|(t, _)| -t <= HORIZON_MS)
            .collect();

        if window.len() < 2 {
            return 0.0;
        }
        let (oldest_t, oldest_x) = window[window.len() - 1];
        if -oldest_t > ASSUME_STOPPED_MS && (newest.position - oldest_x).abs() < MIN_MOVEMENT {
            return 0.0;
        }

        let mut sum_w = 0.0;
        let mut sum_t = 0.0;
        let mut sum_x = 0.0;
        let mut sum_tt = 0.0;
        let mut sum_tx = 0.0;
        let mut weight = 1.0;
        for &(t, x) in &window {
            sum_w += weight;
            sum_t += weight * t;
            sum_x += weight * x;
            sum_tt += weight * t * t;
            sum_tx += weight * t * x;
            weight *= DECAY;
        }

        let denominator = sum_w * sum_tt - sum_t * sum_t;
        if denominator.abs() < f64::EPSILON {
            return 0.0;
        }
        (sum_w * sum_tx - sum_t * sum_x) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_two_points_give_their_slope() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.add(start, 0.0);
        tracker.add(at(start, 40), 48.0);
        assert!((tracker.velocity() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_steady_leftward_motion() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        for i in 0..6 {
            tracker.add(at(start, i * 10), -(i as f64) * 5.0);
        }
        assert!((tracker.velocity() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_old_points_are_ignored() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.add(start, 0.0);
        tracker.add(at(start, 500), 400.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_resting_pointer_has_no_velocity() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.add(start, 80.0);
        tracker.add(at(start, 30), 81.0);
        tracker.add(at(start, 60), 81.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_single_point_and_reset() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
        tracker.add(start, 10.0);
        assert_eq!(tracker.velocity(), 0.0);

        tracker.add(at(start, 10), 30.0);
        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }
}
