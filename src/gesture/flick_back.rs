//! Flick-to-dismiss controller.
//!
//! Unlike [`super::SwipeBackController`] the page does not follow the
//! pointer. A rightward movement faster than `min_velocity` fires the back
//! callback while the pointer is still down, at most once per gesture.

use super::{GestureSample, VelocityTracker};
use crate::error::{Error, Result};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Threshold for a flick-back gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickConfig {
    /// Rightward speed in pixels per millisecond that goes back.
    pub min_velocity: f64,
}

impl Default for FlickConfig {
    fn default() -> Self {
        Self { min_velocity: 0.3 }
    }
}

impl FlickConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_velocity.is_finite() && self.min_velocity > 0.0) {
            return Err(Error::config(format!(
                "flick velocity must be a positive number, got {}",
                self.min_velocity
            )));
        }
        Ok(())
    }
}

/// Fires `on_back` when a drag moves right fast enough.
pub struct FlickBackController<F> {
    config: FlickConfig,
    on_back: F,
    velocity: VelocityTracker,
    pressed: bool,
    fired: bool,
    torn_down: bool,
}

impl<F: FnMut()> FlickBackController<F> {
    pub fn new(config: FlickConfig, on_back: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            on_back,
            velocity: VelocityTracker::new(),
            pressed: false,
            fired: false,
            torn_down: false,
        })
    }

    /// Feed one drag sample observed at `at`.
    pub fn on_gesture_sample(&mut self, sample: GestureSample, at: Instant) {
        if self.torn_down {
            return;
        }

        if !sample.is_pressed {
            self.pressed = false;
            self.velocity.reset();
            return;
        }

        if !self.pressed {
            self.pressed = true;
            self.fired = false;
            self.velocity.reset();
        }
        self.velocity.add(at, sample.movement_x);

        if self.fired || sample.direction_x <= 0 {
            return;
        }
        let velocity = self.velocity.velocity();
        if velocity > self.config.min_velocity {
            debug!(velocity, "flick: back triggered");
            self.fired = true;
            (self.on_back)();
        }
    }

    /// Ignore every later sample.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.pressed = false;
        self.velocity.reset();
    }
}

impl<F> FlickBackController<F> {
    /// Whether a drag is in progress.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &FlickConfig {
        &self.config
    }
}

impl<F> fmt::Debug for FlickBackController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlickBackController")
            .field("config", &self.config)
            .field("pressed", &self.pressed)
            .field("fired", &self.fired)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
