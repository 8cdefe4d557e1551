//! Program CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use futures::TryStreamExt;
use serde::Serialize;

use crate::cli::output::progress::spinner_for;
use crate::cli::output::{output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{Config, Page, ProgramPage};
use crate::infrastructure::responsys::{ProgramQuery, ResponsysClient};

#[derive(Args, Debug)]
pub struct ProgramArgs {
    #[command(subcommand)]
    pub command: ProgramCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProgramCommands {
    /// List programs, sorted by id
    List {
        /// Records per page (1-200, defaults to pagination.page_size)
        #[arg(short, long)]
        limit: Option<u32>,
        /// Index of the first record
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
        /// Only programs with this status (e.g. RUNNING)
        #[arg(short, long)]
        status: Option<String>,
        /// Follow `next` links and list every page
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct ProgramListOutput {
    #[serde(flatten)]
    pub page: ProgramPage,
    #[serde(skip)]
    pub offset: u32,
}

impl CommandOutput for ProgramListOutput {
    fn to_human(&self) -> String {
        if self.page.is_empty() {
            return "No programs found.".to_string();
        }

        let count = self.page.len();
        let mut lines = vec![
            format!("{count} program{}:", if count == 1 { "" } else { "s" }),
            TableFormatter::new().format_programs(&self.page.programs),
        ];
        if self.page.next_href().is_some() {
            let next_offset = usize::try_from(self.offset)
                .unwrap_or(usize::MAX)
                .saturating_add(count);
            lines.push(format!(
                "More programs available: use --offset {next_offset} or --all"
            ));
        }
        lines.join("\n")
    }
}

pub async fn execute(
    args: ProgramArgs,
    client: &ResponsysClient,
    config: &Config,
    json_mode: bool,
) -> Result<()> {
    match args.command {
        ProgramCommands::List {
            limit,
            offset,
            status,
            all,
        } => {
            let query = ProgramQuery {
                limit: limit.unwrap_or(config.pagination.page_size),
                offset,
                status,
            };

            let page = if all {
                let spinner = spinner_for(json_mode, "Fetching programs...");
                let result = client
                    .program_pages(query)
                    .try_fold(ProgramPage::default(), |mut merged, page| {
                        merged.absorb(page);
                        spinner.set_message(format!("{} programs", merged.len()));
                        async move { Ok(merged) }
                    })
                    .await;

                match result {
                    Ok(merged) => {
                        spinner.finish_success(format!("{} programs", merged.len()));
                        merged
                    }
                    Err(err) => {
                        spinner.finish_error("Failed to list programs");
                        return Err(err).context("Failed to list programs");
                    }
                }
            } else {
                client
                    .fetch_programs(&query)
                    .await
                    .context("Failed to list programs")?
            };

            output(&ProgramListOutput { page, offset }, json_mode);
        }
    }

    Ok(())
}
