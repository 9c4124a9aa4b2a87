//! Core logic for the minedock control panel
//!
//! This crate provides:
//! - The container registry (snapshot of the backend's container list)
//! - Start/stop dispatch with delayed re-synchronization
//! - The create-server workflow
//! - Live log sessions over the backend's duplex stream
//! - A notice channel for user-visible feedback

mod console;
mod create;
mod dispatcher;
mod error;
mod notice;
mod panel;
mod registry;

pub use console::*;
pub use create::*;
pub use dispatcher::*;
pub use error::*;
pub use notice::*;
pub use panel::*;
pub use registry::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
