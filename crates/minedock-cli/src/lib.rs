//! Command implementations behind the `minedock` binary

pub mod commands;
pub mod selector;
