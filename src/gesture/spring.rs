//! Damped spring used for settle and page transition animations.

use std::time::Duration;

/// Integration step for the spring simulation.
const STEP_SECS: f64 = 0.001;

/// Frames longer than this are treated as this long.
const MAX_FRAME_SECS: f64 = 1.0;

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Stiffness constant. Higher values = faster animation.
    pub stiffness: f64,
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f64,
    /// Position threshold to stop animation.
    pub position_threshold: f64,
    /// Velocity threshold to stop animation.
    pub velocity_threshold: f64,
}

impl SpringSpec {
    /// Spring used to settle a dragged page back to rest (tension 170, friction 26).
    pub fn default_spring() -> Self {
        Self::from_tension_friction(170.0, 26.0)
    }

    /// Spring for full-page enter transitions, in screen-width fractions.
    pub fn page_transition() -> Self {
        Self {
            position_threshold: 0.0005,
            velocity_threshold: 0.001,
            ..Self::from_tension_friction(300.0, 30.0)
        }
    }

    /// Build a spec from a unit-mass tension/friction pair.
    pub fn from_tension_friction(tension: f64, friction: f64) -> Self {
        Self {
            stiffness: tension,
            damping_ratio: friction / (2.0 * tension.sqrt()),
            position_threshold: 0.01,
            velocity_threshold: 0.05,
        }
    }

    fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// A scalar driven towards a target by a damped spring.
///
/// The spring is advanced explicitly with [`Spring::step`]; it never runs on
/// its own. [`Spring::snap_to`] interrupts any running animation.
#[derive(Debug, Clone)]
pub struct Spring {
    spec: SpringSpec,
    value: f64,
    velocity: f64,
    target: f64,
    running: bool,
}

impl Spring {
    /// Create a spring at rest at `value`.
    pub fn new(value: f64, spec: SpringSpec) -> Self {
        Self {
            spec,
            value,
            velocity: 0.0,
            target: value,
            running: false,
        }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current target.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring is still moving.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.running = false;
    }

    /// Start animating from the current value and velocity towards `target`.
    pub fn animate_to(&mut self, target: f64) {
        self.target = target;
        self.running = !self.at_rest();
        if !self.running {
            self.value = target;
            self.velocity = 0.0;
        }
    }

    /// Advance the simulation by `dt`. Returns whether the spring is still running.
    pub fn step(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        let stiffness = self.spec.stiffness;
        let damping = self.spec.damping();
        let mut remaining = dt.as_secs_f64().min(MAX_FRAME_SECS);

        while remaining > 0.0 {
            let h = remaining.min(STEP_SECS);
            let force = -stiffness * (self.value - self.target) - damping * self.velocity;
            self.velocity += force * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if self.at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            self.running = false;
        }

        self.running
    }

    fn at_rest(&self) -> bool {
        (self.value - self.target).abs() < self.spec.position_threshold
            && self.velocity.abs() < self.spec.velocity_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_default_spring_is_near_critical() {
        let spec = SpringSpec::default_spring();
        assert_eq!(spec.stiffness, 170.0);
        assert!((spec.damping_ratio - 0.997).abs() < 0.001);
    }

    #[test]
    fn test_spring_converges_to_target() {
        let mut spring = Spring::new(150.0, SpringSpec::default_spring());
        spring.animate_to(0.0);
        assert!(spring.is_running());

        let mut frames = 0;
        while spring.step(FRAME) {
            frames += 1;
            assert!(frames < 1_000, "spring never settled");
        }

        assert_eq!(spring.value(), 0.0);
        assert!(!spring.is_running());
    }

    #[test]
    fn test_spring_moves_monotonically_towards_rest_at_first() {
        let mut spring = Spring::new(100.0, SpringSpec::default_spring());
        spring.animate_to(0.0);
        spring.step(FRAME);
        let first = spring.value();
        spring.step(FRAME);
        assert!(first < 100.0);
        assert!(spring.value() < first);
    }

    #[test]
    fn test_animate_to_current_value_is_noop() {
        let mut spring = Spring::new(0.0, SpringSpec::default_spring());
        spring.animate_to(0.0);
        assert!(!spring.is_running());
        assert!(!spring.step(FRAME));
    }

    #[test]
    fn test_snap_interrupts_animation() {
        let mut spring = Spring::new(80.0, SpringSpec::default_spring());
        spring.animate_to(0.0);
        spring.step(FRAME);
        spring.snap_to(42.0);
        assert!(!spring.is_running());
        assert!(!spring.step(FRAME));
        assert_eq!(spring.value(), 42.0);
    }

    #[test]
    fn test_page_transition_settles() {
        let mut spring = Spring::new(1.0, SpringSpec::page_transition());
        spring.animate_to(0.0);
        let mut elapsed = 0;
        while spring.step(FRAME) {
            elapsed += 16;
            assert!(elapsed < 10_000);
        }
        assert_eq!(spring.value(), 0.0);
    }
}
