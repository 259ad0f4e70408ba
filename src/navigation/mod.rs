//! Full-screen page navigation.
//!
//! The [`Navigator`] animates page changes and owns the back gesture of the
//! page on screen. Each non-menu page gets a fresh controller when it is
//! entered; the old one is torn down on leave, so a settle still running on
//! the old page cannot fire into the new one. The subscription page is
//! dismissed by a fast rightward flick, every other page by a drag past the
//! trigger distance.

use crate::config::GestureConfig;
use crate::error::Result;
use crate::gesture::{
    DragTracker, FlickBackController, FlickConfig, Spring, SpringSpec, SwipeBackController,
    SwipeConfig, SwipePhase,
};
use crate::state::{Action, View};
use crossterm::event::MouseEvent;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Back callback handed to a page's controller.
pub type BackCallback = Box<dyn FnMut() + Send>;

/// Back gesture of the page on screen.
#[derive(Debug)]
enum BackGesture {
    Swipe(SwipeBackController<BackCallback>),
    Flick(FlickBackController<BackCallback>),
}

impl BackGesture {
    fn teardown(&mut self) {
        match self {
            Self::Swipe(swipe) => swipe.teardown(),
            Self::Flick(flick) => flick.teardown(),
        }
    }
}

/// Page transitions and the back gesture of the current page.
pub struct Navigator {
    swipe_config: SwipeConfig,
    flick_config: FlickConfig,
    cell_width: f64,
    tracker: DragTracker,
    /// Horizontal position of the entering page in screen widths.
    transition: Spring,
    gesture: Option<BackGesture>,
    view: View,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Navigator {
    /// Create a navigator showing the menu.
    pub fn new(config: &GestureConfig, action_tx: mpsc::UnboundedSender<Action>) -> Result<Self> {
        let swipe_config = config.swipe_config();
        swipe_config.validate()?;
        let flick_config = config.flick_config();
        flick_config.validate()?;

        Ok(Self {
            swipe_config,
            flick_config,
            cell_width: config.cell_width,
            tracker: DragTracker::new(config.cell_width),
            transition: Spring::new(0.0, SpringSpec::page_transition()),
            gesture: None,
            view: View::Menu,
            action_tx,
        })
    }

    /// Page on screen.
    pub fn view(&self) -> View {
        self.view
    }

    /// Show `view`, sliding in from the right for a positive direction and
    /// from the left otherwise.
    pub fn enter(&mut self, view: View, direction: i32) -> Result<()> {
        if let Some(mut previous) = self.gesture.take() {
            previous.teardown();
        }
        self.tracker.cancel();

        self.transition.snap_to(if direction > 0 { 1.0 } else { -1.0 });
        self.transition.animate_to(0.0);
        self.view = view;

        self.gesture = match view {
            View::Menu => None,
            View::Subscription => Some(BackGesture::Flick(FlickBackController::new(
                self.flick_config,
                self.back_callback(),
            )?)),
            _ => Some(BackGesture::Swipe(SwipeBackController::new(
                self.swipe_config,
                self.back_callback(),
            )?)),
        };

        info!(?view, direction, "Entered page");
        Ok(())
    }

    fn back_callback(&self) -> BackCallback {
        let action_tx = self.action_tx.clone();
        Box::new(move || {
            if action_tx.send(Action::NavigateBack).is_err() {
                warn!("Action channel closed, dropping back gesture");
            }
        })
    }

    /// Feed a mouse event to the back gesture.
    ///
    /// With `accept_presses` false, new drags are ignored while a release
    /// still reaches the controller so an ongoing drag can settle.
    pub fn handle_mouse(&mut self, event: &MouseEvent, accept_presses: bool) {
        self.handle_mouse_at(event, accept_presses, Instant::now());
    }

    /// [`handle_mouse`](Navigator::handle_mouse) for an event observed at `at`.
    pub fn handle_mouse_at(&mut self, event: &MouseEvent, accept_presses: bool, at: Instant) {
        let Some(sample) = self.tracker.handle_mouse(event) else {
            return;
        };
        if sample.is_pressed && !accept_presses {
            return;
        }
        match self.gesture.as_mut() {
            Some(BackGesture::Swipe(swipe)) => swipe.on_gesture_sample(sample),
            Some(BackGesture::Flick(flick)) => flick.on_gesture_sample(sample, at),
            None => {}
        }
    }

    /// Advance both animations. Returns whether either is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let transition = self.transition.step(dt);
        let swipe = self.swipe_mut().is_some_and(|s| s.tick(dt));
        transition || swipe
    }

    /// Whether anything is moving.
    pub fn is_animating(&self) -> bool {
        self.transition.is_running() || self.swipe_phase() != SwipePhase::Idle
    }

    /// Entering page position in screen widths, 0 at rest.
    pub fn transition_offset(&self) -> f64 {
        self.transition.value()
    }

    /// Swipe offset of the current page in pixels.
    pub fn swipe_offset(&self) -> f64 {
        self.swipe().map_or(0.0, |s| s.offset_x())
    }

    /// Phase of the current page's swipe gesture.
    pub fn swipe_phase(&self) -> SwipePhase {
        self.swipe().map_or(SwipePhase::Idle, |s| s.phase())
    }

    /// Whether the current page follows the pointer while dragged.
    pub fn has_swipe(&self) -> bool {
        self.swipe().is_some()
    }

    /// Whether the current page goes back on a fast flick.
    pub fn has_flick(&self) -> bool {
        matches!(self.gesture, Some(BackGesture::Flick(_)))
    }

    /// Total horizontal shift of the page in columns for a screen `width`.
    pub fn shift_columns(&self, width: u16) -> i32 {
        let transition = self.transition.value() * f64::from(width);
        let swipe = self.swipe_offset() / self.cell_width;
        (transition + swipe).round() as i32
    }

    fn swipe(&self) -> Option<&SwipeBackController<BackCallback>> {
        match &self.gesture {
            Some(BackGesture::Swipe(swipe)) => Some(swipe),
            _ => None,
        }
    }

    fn swipe_mut(&mut self) -> Option<&mut SwipeBackController<BackCallback>> {
        match &mut self.gesture {
            Some(BackGesture::Swipe(swipe)) => Some(swipe),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("view", &self.view)
            .field("transition", &self.transition.value())
            .field("gesture", &self.gesture)
            .finish()
    }
}
