//! Drag observations fed to gesture controllers.

/// One observation of a horizontal drag.
///
/// `movement_x` is cumulative since the gesture started, in device-independent
/// pixels, positive to the right. `direction_x` is the sign of the latest
/// incremental movement and is always one of `-1`, `0`, `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Whether the pointer is still down.
    pub is_pressed: bool,
    /// Cumulative horizontal displacement.
    pub movement_x: f64,
    /// Sign of the most recent horizontal step.
    pub direction_x: i8,
}

impl GestureSample {
    /// A sample taken while the pointer is down.
    pub fn pressed(movement_x: f64, direction_x: i8) -> Self {
        Self {
            is_pressed: true,
            movement_x,
            direction_x: direction_x.signum(),
        }
    }

    /// The sample emitted when the pointer is released.
    pub fn released(movement_x: f64) -> Self {
        Self {
            is_pressed: false,
            movement_x,
            direction_x: 0,
        }
    }
}
