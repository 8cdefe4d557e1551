//! Table output formatting for CLI commands
//!
//! Campaign, program and throttle-limit listings rendered with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;
use std::env;

use super::truncate;
use crate::domain::models::{Campaign, Program};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format a list of campaigns as a table
    pub fn format_campaigns(&self, campaigns: &[Campaign]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Name", "Type", "Folder", "Modified"]));

        for campaign in campaigns {
            table.add_row(vec![
                Cell::new(display_id(campaign.id)),
                Cell::new(truncate(&campaign.name, 40)),
                Cell::new(campaign.campaign_type.as_deref().unwrap_or("-")),
                Cell::new(campaign.folder_name.as_deref().unwrap_or("-")),
                Cell::new(campaign.modified_date.as_deref().unwrap_or("-")),
            ]);
        }

        table.to_string()
    }

    /// Format a list of programs as a table
    pub fn format_programs(&self, programs: &[Program]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Name", "Status", "Modified"]));

        for program in programs {
            let status = program.status.as_deref().unwrap_or("-");
            let status_cell = if self.use_colors {
                Cell::new(status).fg(program_status_color(status))
            } else {
                Cell::new(status)
            };

            table.add_row(vec![
                Cell::new(display_id(program.id)),
                Cell::new(truncate(&program.name, 40)),
                status_cell,
                Cell::new(program.modified_date.as_deref().unwrap_or("-")),
            ]);
        }

        table.to_string()
    }

    /// Format an array of JSON objects, one row per object
    ///
    /// Columns are the union of the object keys in order of first appearance.
    /// Returns `None` when `rows` is not an array of objects.
    pub fn format_json_rows(&self, rows: &Value) -> Option<String> {
        let objects = rows
            .as_array()?
            .iter()
            .map(Value::as_object)
            .collect::<Option<Vec<_>>>()?;

        let mut columns: Vec<&str> = Vec::new();
        for key in objects.iter().flat_map(|o| o.keys()) {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }

        let mut table = self.create_base_table();
        table.set_header(header(&columns));
        for object in &objects {
            table.add_row(columns.iter().map(|column| {
                Cell::new(match object.get(*column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => "-".to_string(),
                    Some(other) => other.to_string(),
                })
            }));
        }

        Some(table.to_string())
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn program_status_color(status: &str) -> Color {
    match status.to_ascii_uppercase().as_str() {
        "RUNNING" | "PUBLISHED" => Color::Green,
        "SCHEDULED" | "DRAFT" => Color::Yellow,
        "STOPPED" | "CLOSED" | "ERROR" => Color::Red,
        _ => Color::Reset,
    }
}
