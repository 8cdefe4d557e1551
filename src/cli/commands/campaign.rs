//! Campaign CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use futures::TryStreamExt;
use serde::Serialize;

use crate::cli::output::progress::spinner_for;
use crate::cli::output::{output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{Campaign, CampaignPage, CampaignType, Config, Page};
use crate::infrastructure::responsys::{CampaignQuery, ResponsysClient};

#[derive(Args, Debug)]
pub struct CampaignArgs {
    #[command(subcommand)]
    pub command: CampaignCommands,
}

#[derive(Subcommand, Debug)]
pub enum CampaignCommands {
    /// Show one campaign and its properties
    Show {
        /// Campaign name
        name: String,
    },
    /// List campaigns, sorted by id
    List {
        /// Records per page (1-200, defaults to pagination.page_size)
        #[arg(short, long)]
        limit: Option<u32>,
        /// Index of the first record
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
        /// Campaign channel (email, push, message_center, sms, mms)
        #[arg(short = 't', long = "type", default_value_t = CampaignType::Email)]
        campaign_type: CampaignType,
        /// Follow `next` links and list every page
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct CampaignDetailOutput {
    #[serde(flatten)]
    pub campaign: Campaign,
}

impl CommandOutput for CampaignDetailOutput {
    fn to_human(&self) -> String {
        let c = &self.campaign;
        let field = |label: &str, value: Option<&str>| {
            format!("{label:<13}{}", value.unwrap_or("-"))
        };

        let mut lines = vec![
            format!("Campaign: {}", c.name),
            "─────────────────────────────────────────".to_string(),
            format!("{:<13}{}", "ID:", c.id.map_or_else(|| "-".to_string(), |id| id.to_string())),
            field("Type:", c.campaign_type.as_deref()),
            field("Folder:", c.folder_name.as_deref()),
            field("Subject:", c.subject.as_deref()),
            field("Purpose:", c.purpose.as_deref()),
            field("Created:", c.created_date.as_deref()),
            field("Modified:", c.modified_date.as_deref()),
        ];

        if !c.extra.is_empty() {
            lines.push("\nOther properties:".to_string());
            lines.push(serde_json::to_string_pretty(&c.extra).unwrap_or_default());
        }

        if !c.links.is_empty() {
            lines.push("\nLinks:".to_string());
            for link in &c.links {
                lines.push(format!(
                    "  {:<24} {} {}",
                    link.rel,
                    link.method.as_deref().unwrap_or("GET"),
                    link.href
                ));
            }
        }

        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignListOutput {
    #[serde(flatten)]
    pub page: CampaignPage,
    #[serde(skip)]
    pub offset: u32,
}

impl CommandOutput for CampaignListOutput {
    fn to_human(&self) -> String {
        if self.page.is_empty() {
            return "No campaigns found.".to_string();
        }

        let count = self.page.len();
        let mut out = format!(
            "{count} campaign{}:\n{}",
            if count == 1 { "" } else { "s" },
            TableFormatter::new().format_campaigns(&self.page.campaigns)
        );
        if self.page.next_href().is_some() {
            let next_offset = usize::try_from(self.offset).unwrap_or(usize::MAX).saturating_add(count);
            out.push_str(&format!(
                "\nMore campaigns available: use --offset {next_offset} or --all"
            ));
        }
        out
    }
}

pub async fn execute(
    args: CampaignArgs,
    client: &ResponsysClient,
    config: &Config,
    json_mode: bool,
) -> Result<()> {
    match args.command {
        CampaignCommands::Show { name } => {
            let campaign = client
                .fetch_campaign(&name)
                .await
                .with_context(|| format!("Failed to fetch campaign '{name}'"))?;
            output(&CampaignDetailOutput { campaign }, json_mode);
        }

        CampaignCommands::List {
            limit,
            offset,
            campaign_type,
            all,
        } => {
            let query = CampaignQuery {
                limit: limit.unwrap_or(config.pagination.page_size),
                offset,
                campaign_type,
            };

            let page = if all {
                fetch_every_page(client, query, json_mode).await?
            } else {
                client
                    .fetch_campaigns(&query)
                    .await
                    .context("Failed to list campaigns")?
            };
            output(&CampaignListOutput { page, offset }, json_mode);
        }
    }

    Ok(())
}

async fn fetch_every_page(
    client: &ResponsysClient,
    query: CampaignQuery,
    json_mode: bool,
) -> Result<CampaignPage> {
    let spinner = spinner_for(json_mode, format!("Fetching {} campaigns...", query.campaign_type));
    let mut pages = std::pin::pin!(client.campaign_pages(query));
    let mut merged: Option<CampaignPage> = None;
    let mut fetched_pages = 0_usize;

    loop {
        let page = match pages.try_next().await {
            Ok(Some(page)) => page,
            Ok(None) => break,
            Err(err) => {
                spinner.finish_error("Failed to list campaigns");
                return Err(err).context("Failed to list campaigns");
            }
        };

        fetched_pages += 1;
        match merged.as_mut() {
            Some(acc) => acc.absorb(page),
            None => merged = Some(page),
        }
        let records = merged.as_ref().map_or(0, Page::len);
        spinner.set_message(format!("{fetched_pages} page(s), {records} campaigns"));
    }

    let merged = merged.unwrap_or_default();
    spinner.finish_success(format!(
        "{} campaigns in {fetched_pages} page(s)",
        merged.len()
    ));
    Ok(merged)
}
