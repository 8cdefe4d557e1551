use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::output::progress::spinner_for;
use crate::cli::output::{output, CommandOutput, ProgressBarExt};
use crate::domain::models::CampaignType;
use crate::infrastructure::responsys::ResponsysClient;
use crate::services::{ExportOptions, ExportService, ExportSummary};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory the JSON files are written to (created if missing)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Channel of the exported campaigns
    #[arg(long, default_value_t = CampaignType::Email)]
    pub campaign_type: CampaignType,

    /// Only export programs with this status (e.g. RUNNING)
    #[arg(long)]
    pub program_status: Option<String>,
}

impl CommandOutput for ExportSummary {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Exported {} campaigns and {} programs:",
            self.campaigns, self.programs
        )];
        lines.extend(self.files.iter().map(|f| format!("  {}", f.display())));
        lines.join("\n")
    }
}

pub async fn execute(args: ExportArgs, client: Arc<ResponsysClient>, json_mode: bool) -> Result<()> {
    let service = ExportService::new(client);
    let options = ExportOptions {
        campaign_type: args.campaign_type,
        program_status: args.program_status,
    };

    let spinner = spinner_for(json_mode, format!("Exporting to {}...", args.dir.display()));
    let summary = match service.export_all(&args.dir, &options).await {
        Ok(summary) => {
            spinner.finish_success("Export complete");
            summary
        }
        Err(err) => {
            spinner.finish_error("Export failed");
            return Err(err);
        }
    };

    output(&summary, json_mode);
    Ok(())
}
