//! Export service writing account listings to JSON files.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::models::{CampaignType, Page};
use crate::domain::ports::MarketingApi;

pub const THROTTLE_LIMITS_FILE: &str = "throttle_limits.json";
pub const CAMPAIGNS_FILE: &str = "all_fetched_campaigns.json";
pub const PROGRAMS_FILE: &str = "all_fetched_programs.json";

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Channel of the exported campaigns
    pub campaign_type: CampaignType,
    /// Only export programs with this status
    pub program_status: Option<String>,
}

/// Result of an export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub campaigns: usize,
    pub programs: usize,
    pub files: Vec<PathBuf>,
}

pub struct ExportService<A: MarketingApi> {
    api: Arc<A>,
}

impl<A: MarketingApi> ExportService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Fetch throttle limits, every campaign and every program and write
    /// each to its own file inside `dir`, creating `dir` if needed.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn export_all(&self, dir: &Path, options: &ExportOptions) -> Result<ExportSummary> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

        let limits = self
            .api
            .throttle_limits()
            .await
            .context("Failed to fetch throttle limits")?;
        let limits_path = write_json(dir, THROTTLE_LIMITS_FILE, &limits).await?;

        let campaigns = self
            .api
            .all_campaigns(options.campaign_type)
            .await
            .context("Failed to fetch campaigns")?;
        let campaigns_path = write_json(dir, CAMPAIGNS_FILE, &campaigns).await?;

        let programs = self
            .api
            .all_programs(options.program_status.as_deref())
            .await
            .context("Failed to fetch programs")?;
        let programs_path = write_json(dir, PROGRAMS_FILE, &programs).await?;

        let summary = ExportSummary {
            campaigns: campaigns.len(),
            programs: programs.len(),
            files: vec![limits_path, campaigns_path, programs_path],
        };
        info!(
            campaigns = summary.campaigns,
            programs = summary.programs,
            "export complete"
        );
        Ok(summary)
    }
}

/// Serialize with four-space indentation and write to `dir/file_name`.
async fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to serialize {file_name}"))?;
    buf.push(b'\n');

    let path = dir.join(file_name);
    tokio::fs::write(&path, buf)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
