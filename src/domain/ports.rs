use anyhow::Result;
use async_trait::async_trait;

use super::models::{CampaignPage, CampaignType, ProgramPage};

/// Marketing platform interface the services depend on.
///
/// Implemented by the Responsys client; tests substitute in-memory fakes.
#[async_trait]
pub trait MarketingApi: Send + Sync {
    /// API throttling limits for the account
    async fn throttle_limits(&self) -> Result<serde_json::Value>;

    /// Every campaign of the given channel, all pages merged
    async fn all_campaigns(&self, campaign_type: CampaignType) -> Result<CampaignPage>;

    /// Every program, optionally filtered by status, all pages merged
    async fn all_programs(&self, status: Option<&str>) -> Result<ProgramPage>;
}
