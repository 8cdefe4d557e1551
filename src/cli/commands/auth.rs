//! Auth CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::AuthSession;
use crate::infrastructure::logging::redact_token;
use crate::infrastructure::responsys::ResponsysClient;

#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with user name and password and show the session
    Login,
    /// Log in, then exchange the token for a fresh one
    Refresh,
}

#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub action: &'static str,
    pub endpoint: String,
    pub token: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl SessionOutput {
    fn new(action: &'static str, session: &AuthSession) -> Self {
        Self {
            action,
            endpoint: session.endpoint.to_string(),
            token: redact_token(session.auth_token()),
            issued_at: session.login.issued_at_utc(),
            expires_at: session.expires_at(),
        }
    }
}

impl CommandOutput for SessionOutput {
    fn to_human(&self) -> String {
        let issued = self.issued_at.map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        [
            self.action.to_string(),
            format!("Endpoint:    {}", self.endpoint),
            format!("Token:       {}", self.token),
            format!("Issued at:   {issued}"),
            format!(
                "Expires at:  {}",
                self.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ]
        .join("\n")
    }
}

pub async fn execute(args: AuthArgs, client: &ResponsysClient, json_mode: bool) -> Result<()> {
    let action = match args.command {
        AuthCommands::Login => "Logged in",
        AuthCommands::Refresh => {
            client
                .refresh_token()
                .await
                .context("Failed to refresh auth token")?;
            "Token refreshed"
        }
    };

    let session = client
        .session()
        .await
        .context("No active session after login")?;
    output(&SessionOutput::new(action, &session), json_mode);
    Ok(())
}
