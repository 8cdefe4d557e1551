//! Domain layer for rsys
//!
//! Responsys resources (auth sessions, campaigns, programs, paged listings),
//! configuration models and the ports the services depend on.

pub mod models;
pub mod ports;

pub use ports::MarketingApi;
