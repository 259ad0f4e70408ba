//! Swipe-to-dismiss controller.
//!
//! Turns a horizontal drag into a page offset that follows the pointer and a
//! one-shot back signal fired on release.
//!
//! # State Machine
//!
//! - `Idle`: released, offset at rest.
//! - `Dragging`: pressed, offset tracks the drag 1:1, capped to `[0, max_drag]`.
//! - `Settling`: released, offset springs back to 0.
//!
//! A press while `Settling` re-enters `Dragging` and overrides the spring at
//! once. The direction remembered for the release check is cleared on every
//! entry into `Dragging`, so a previous gesture can never satisfy it.

use super::{GestureSample, Spring, SpringSpec};
use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Thresholds for a swipe-back controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Largest offset the page may be dragged to.
    pub max_drag: f64,
    /// Displacement a rightward release must exceed to go back.
    pub trigger_distance: f64,
    /// Spring used to settle the page after release.
    pub spring: SpringSpec,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_drag: 200.0,
            trigger_distance: 100.0,
            spring: SpringSpec::default_spring(),
        }
    }
}

impl SwipeConfig {
    /// Check that the back gesture is reachable.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_drag.is_finite() && self.max_drag > 0.0) {
            return Err(Error::config(format!(
                "max_drag must be a positive number, got {}",
                self.max_drag
            )));
        }
        if !(self.trigger_distance.is_finite() && self.trigger_distance > 0.0) {
            return Err(Error::config(format!(
                "trigger_distance must be a positive number, got {}",
                self.trigger_distance
            )));
        }
        if self.trigger_distance > self.max_drag {
            return Err(Error::config(format!(
                "trigger_distance ({}) exceeds max_drag ({})",
                self.trigger_distance, self.max_drag
            )));
        }
        Ok(())
    }
}

/// Phase of the swipe interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipePhase {
    #[default]
    Idle,
    Dragging,
    Settling,
}

/// Drives a page offset from drag samples and fires `on_back` on a
/// qualifying release.
pub struct SwipeBackController<F> {
    config: SwipeConfig,
    on_back: F,
    offset: Spring,
    last_direction: i8,
    phase: SwipePhase,
    torn_down: bool,
}

impl<F: FnMut()> SwipeBackController<F> {
    /// Create a controller. Fails if the thresholds are inconsistent.
    pub fn new(config: SwipeConfig, on_back: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            offset: Spring::new(0.0, config.spring),
            config,
            on_back,
            last_direction: 0,
            phase: SwipePhase::Idle,
            torn_down: false,
        })
    }

    /// Feed one drag sample.
    pub fn on_gesture_sample(&mut self, sample: GestureSample) {
        if self.torn_down {
            return;
        }

        if sample.is_pressed {
            if self.phase != SwipePhase::Dragging {
                debug!(from = ?self.phase, "swipe: drag started");
                self.phase = SwipePhase::Dragging;
                self.last_direction = 0;
            }
            if sample.direction_x != 0 {
                self.last_direction = sample.direction_x.signum();
            }
            let movement = if sample.movement_x.is_nan() {
                0.0
            } else {
                sample.movement_x
            };
            self.offset.snap_to(movement.clamp(0.0, self.config.max_drag));
            return;
        }

        // Only the pressed -> released edge counts as a release.
        if self.phase != SwipePhase::Dragging {
            return;
        }

        self.phase = SwipePhase::Settling;
        if self.should_go_back(sample.movement_x) {
            debug!(movement_x = sample.movement_x, "swipe: back triggered");
            (self.on_back)();
        }

        self.offset.animate_to(0.0);
        if !self.offset.is_running() {
            self.phase = SwipePhase::Idle;
        }
    }

    /// Advance the settle animation. Returns whether it is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.torn_down || self.phase != SwipePhase::Settling {
            return false;
        }
        let running = self.offset.step(dt);
        if !running {
            self.phase = SwipePhase::Idle;
        }
        running
    }

    /// Stop animating and ignore every later sample.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.offset.snap_to(0.0);
        self.phase = SwipePhase::Idle;
    }

    fn should_go_back(&self, movement_x: f64) -> bool {
        movement_x > self.config.trigger_distance && self.last_direction > 0
    }
}

impl<F> SwipeBackController<F> {
    /// Current horizontal offset for rendering.
    pub fn offset_x(&self) -> f64 {
        self.offset.value()
    }

    /// Last non-zero direction seen in the current or latest drag.
    pub fn last_direction(&self) -> i8 {
        self.last_direction
    }

    /// Current phase.
    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Whether [`teardown`](SwipeBackController::teardown) was called.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Controller thresholds.
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }
}

impl<F> fmt::Debug for SwipeBackController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeBackController")
            .field("config", &self.config)
            .field("offset_x", &self.offset.value())
            .field("last_direction", &self.last_direction)
            .field("phase", &self.phase)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
