use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::infrastructure::responsys::ResponsysClient;

/// Throttle limits exactly as returned by the API
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ThrottleLimitsOutput(pub Value);

impl CommandOutput for ThrottleLimitsOutput {
    fn to_human(&self) -> String {
        let rows = match &self.0 {
            Value::Object(map) if map.len() == 1 => map.values().next().unwrap_or(&self.0),
            other => other,
        };

        TableFormatter::new()
            .format_json_rows(rows)
            .unwrap_or_else(|| serde_json::to_string_pretty(&self.0).unwrap_or_default())
    }
}

/// Handle the throttle-limits command
pub async fn execute(client: &ResponsysClient, json_mode: bool) -> Result<()> {
    let limits = client
        .get_throttle_limits()
        .await
        .context("Failed to fetch throttle limits")?;

    output(&ThrottleLimitsOutput(limits), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_limits_render_as_table() {
        let out = ThrottleLimitsOutput(json!({
            "rateLimits": [{"resourceName": "retrieveProfileExtensionRecords", "limit": 500}]
        }));

        let human = out.to_human();
        assert!(human.contains("resourceName"));
        assert!(human.contains("retrieveProfileExtensionRecords"));
        assert_eq!(out.to_json()["rateLimits"][0]["limit"], 500);
    }

    #[test]
    fn test_unknown_shape_falls_back_to_json() {
        let out = ThrottleLimitsOutput(json!({"limit": 10, "window": 60}));
        let human = out.to_human();
        assert!(human.contains("\"window\": 60"));
    }
}
