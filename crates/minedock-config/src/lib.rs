//! Configuration for minedock
//!
//! Handles the client configuration file (`~/.config/minedock/config.toml`):
//! which backend to talk to and the timing knobs of the control panel.

mod client;
mod error;

pub use client::*;
pub use error::*;
