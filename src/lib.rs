//! rsys - Oracle Responsys REST API client
//!
//! An async client for the Responsys REST API with a small CLI on top. It
//! logs in with a user name and password, keeps the returned token and
//! endpoint, and fetches throttle limits, campaigns and programs, following
//! `next` links to merge paginated listings.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): API records, session state and the `MarketingApi` port
//! - **Service Layer** (`services`): JSON export built on the port
//! - **Infrastructure Layer** (`infrastructure`): Responsys HTTP client, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use rsys::{CampaignType, ResponsysClient, ResponsysClientConfig};
//!
//! # async fn example() -> Result<(), rsys::RsysApiError> {
//! let client = ResponsysClient::new(ResponsysClientConfig::default())?;
//! client.password_login("user", "secret").await?;
//!
//! let campaigns = client.fetch_all_campaigns(CampaignType::Email).await?;
//! for campaign in &campaigns.campaigns {
//!     println!("{}", campaign.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AuthSession, Campaign, CampaignPage, CampaignType, Config, Link, LoginResponse, Page, Program,
    ProgramPage,
};
pub use domain::ports::MarketingApi;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::responsys::{
    CampaignQuery, ProgramQuery, ResponsysClient, ResponsysClientConfig, RsysApiError,
};
pub use services::{ExportOptions, ExportService, ExportSummary};
