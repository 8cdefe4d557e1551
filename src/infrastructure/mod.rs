//! Infrastructure layer module
//!
//! Adapters for everything outside the domain:
//! - Responsys REST client (auth, retries, rate limiting, pagination)
//! - Configuration management
//! - Logging infrastructure
//!
//! `responsys::ResponsysClient` satisfies the `MarketingApi` port defined in
//! the domain layer.

pub mod config;
pub mod logging;
pub mod responsys;
