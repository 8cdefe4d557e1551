//! CLI command handlers
//!
//! Each handler receives an already authenticated client.

pub mod auth;
pub mod campaign;
pub mod export;
pub mod program;
pub mod throttle;
