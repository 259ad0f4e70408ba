//! PerpX backend integration.
//!
//! This module provides a high-level interface to the PerpX service,
//! handling transport, message encoding, and rate limiting.

mod client;
mod demo;
mod messages;
mod rpc;

pub use client::{PerpxClient, PerpxClientBuilder, SERVICE};
pub use demo::{DEMO_TOKEN, DemoRpc};
pub use rpc::{HttpRpc, Rpc};

#[cfg(test)]
pub use rpc::MockRpc;
