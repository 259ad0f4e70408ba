//! # PerpX - Strategy alert client
//!
//! A terminal client for the PerpX service: users define alert strategies
//! on perpetual-futures pairs, buy a subscription, and manage their
//! profile. Every page except the menu can be dismissed with a rightward
//! swipe, driven by a spring-animated gesture controller.
//!
//! ## Architecture
//!
//! - **App**: Core application state and lifecycle management
//! - **Gesture**: Swipe-back controller, spring and drag tracking
//! - **Navigation**: Page transitions and per-page back gestures
//! - **UI**: Layout and rendering logic
//! - **API**: PerpX RPC client, HTTP transport and demo backend
//! - **Session**: Token storage and sign-in
//! - **State**: Centralized state management
//! - **Strategy**: Strategy model, backend records and the edit form
//! - **Events**: Input handling and event processing
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod gesture;
pub mod navigation;
pub mod session;
pub mod state;
pub mod strategy;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use gesture::{SwipeBackController, SwipeConfig};
