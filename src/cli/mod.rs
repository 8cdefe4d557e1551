//! Command-line interface for rsys.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::responsys::{ResponsysClient, ResponsysClientConfig};

/// Pick the login credentials: flags and `RSYS_USER_NAME`/`RSYS_PASSWORD`
/// win over `responsys.user_name`/`responsys.password` from the config.
pub fn resolve_credentials(
    user_name: Option<&str>,
    password: Option<&str>,
    config: &Config,
) -> Result<(String, String)> {
    let pick = |flag: Option<&str>, configured: Option<&String>| {
        flag.map(str::to_string)
            .or_else(|| configured.cloned())
            .filter(|v| !v.trim().is_empty())
    };

    let user_name = pick(user_name, config.responsys.user_name.as_ref()).context(
        "Missing Responsys user name: pass --user-name, set RSYS_USER_NAME or responsys.user_name",
    )?;
    let password = pick(password, config.responsys.password.as_ref()).context(
        "Missing Responsys password: pass --password, set RSYS_PASSWORD or responsys.password",
    )?;

    Ok((user_name, password))
}

/// Build a client from the configuration and log in
pub async fn connect(
    config: &Config,
    user_name: Option<&str>,
    password: Option<&str>,
) -> Result<ResponsysClient> {
    let (user_name, password) = resolve_credentials(user_name, password, config)?;

    let client = ResponsysClient::new(ResponsysClientConfig::from(config))
        .context("Failed to create Responsys client")?;
    client
        .password_login(&user_name, &password)
        .await
        .context("Failed to log in to Responsys")?;

    Ok(client)
}

/// Print an error with its cause chain and exit with status 1
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
    }

    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(user_name: Option<&str>, password: Option<&str>) -> Config {
        let mut config = Config::default();
        config.responsys.user_name = user_name.map(str::to_string);
        config.responsys.password = password.map(str::to_string);
        config
    }

    #[test]
    fn test_flags_win_over_config() {
        let config = config_with(Some("from-config"), Some("config-secret"));
        let (user, pass) =
            resolve_credentials(Some("from-flag"), None, &config).unwrap();
        assert_eq!(user, "from-flag");
        assert_eq!(pass, "config-secret");
    }

    #[test]
    fn test_missing_credentials() {
        let config = config_with(None, Some("secret"));
        let err = resolve_credentials(None, None, &config).unwrap_err();
        assert!(err.to_string().contains("Missing Responsys user name"));

        let config = config_with(Some("jdoe"), None);
        let err = resolve_credentials(None, Some("  "), &config).unwrap_err();
        assert!(err.to_string().contains("Missing Responsys password"));
    }
}
