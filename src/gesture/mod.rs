//! Gesture handling: drag samples, springs, and the back-gesture controllers.

mod flick_back;
mod sample;
mod spring;
mod swipe_back;
mod tracker;
mod velocity;

pub use flick_back::{FlickBackController, FlickConfig};
pub use sample::GestureSample;
pub use spring::{Spring, SpringSpec};
pub use swipe_back::{SwipeBackController, SwipeConfig, SwipePhase};
pub use tracker::DragTracker;
pub use velocity::VelocityTracker;
