//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::auth::AuthArgs;
use super::commands::campaign::CampaignArgs;
use super::commands::export::ExportArgs;
use super::commands::program::ProgramArgs;

#[derive(Parser)]
#[command(name = "rsys")]
#[command(about = "rsys - Oracle Responsys REST API client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (default: .rsys/config.yaml and .rsys/local.yaml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Responsys account user name
    #[arg(long, global = true, env = "RSYS_USER_NAME")]
    pub user_name: Option<String>,

    /// Responsys account password
    #[arg(long, global = true, env = "RSYS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication commands
    Auth(AuthArgs),

    /// Show the API throttle limits of the account
    ThrottleLimits,

    /// Campaign commands
    Campaign(CampaignArgs),

    /// Program commands
    Program(ProgramArgs),

    /// Write throttle limits, all campaigns and all programs to JSON files
    Export(ExportArgs),
}
