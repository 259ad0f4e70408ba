//! Converts terminal mouse events into gesture samples.

use super::GestureSample;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Tracks an ongoing left-button drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    start_column: u16,
    last_column: u16,
    movement_x: f64,
}

/// Turns left-button mouse drags into [`GestureSample`]s.
///
/// Terminal columns are scaled by `cell_width` so thresholds can be expressed
/// in the same device-independent pixels as a touch screen.
#[derive(Debug, Clone)]
pub struct DragTracker {
    cell_width: f64,
    drag: Option<Drag>,
}

impl DragTracker {
    /// Create a tracker where one terminal column is `cell_width` pixels.
    pub fn new(cell_width: f64) -> Self {
        Self {
            cell_width,
            drag: None,
        }
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Forget the current drag without emitting a release.
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Process a mouse event, returning a sample if it belongs to a drag.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Option<GestureSample> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = Some(Drag {
                    start_column: event.column,
                    last_column: event.column,
                    movement_x: 0.0,
                });
                Some(GestureSample::pressed(0.0, 0))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let cell_width = self.cell_width;
                let drag = self.drag.as_mut()?;
                let step = i32::from(event.column) - i32::from(drag.last_column);
                drag.last_column = event.column;
                drag.movement_x =
                    (i32::from(event.column) - i32::from(drag.start_column)) as f64 * cell_width;
                Some(GestureSample::pressed(drag.movement_x, step.signum() as i8))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let drag = self.drag.take()?;
                let movement_x =
                    (i32::from(event.column) - i32::from(drag.start_column)) as f64 * self.cell_width;
                Some(GestureSample::released(movement_x))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_sequence() {
        let mut tracker = DragTracker::new(8.0);

        let down = tracker.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 10));
        assert_eq!(down, Some(GestureSample::pressed(0.0, 0)));

        let right = tracker.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 25));
        assert_eq!(right, Some(GestureSample::pressed(120.0, 1)));

        let left = tracker.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 23));
        assert_eq!(left, Some(GestureSample::pressed(104.0, -1)));

        let still = tracker.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 23));
        assert_eq!(still, Some(GestureSample::pressed(104.0, 0)));

        let up = tracker.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 23));
        assert_eq!(up, Some(GestureSample::released(104.0)));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_leftward_drag_is_negative() {
        let mut tracker = DragTracker::new(8.0);
        tracker.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 40));
        let sample = tracker
            .handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 20))
            .unwrap();
        assert_eq!(sample.movement_x, -160.0);
        assert_eq!(sample.direction_x, -1);
    }

    #[test]
    fn test_events_outside_drag_are_ignored() {
        let mut tracker = DragTracker::new(8.0);
        assert_eq!(
            tracker.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 3)),
            None
        );
        assert_eq!(
            tracker.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 3)),
            None
        );
        assert_eq!(
            tracker.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Right), 3)),
            None
        );
        assert_eq!(tracker.handle_mouse(&mouse(MouseEventKind::ScrollUp, 3)), None);
    }

    #[test]
    fn test_cancel_drops_release() {
        let mut tracker = DragTracker::new(8.0);
        tracker.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 1));
        tracker.cancel();
        assert_eq!(
            tracker.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 30)),
            None
        );
    }
}
