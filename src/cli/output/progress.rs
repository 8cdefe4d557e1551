//! Progress spinners using indicatif
//!
//! Listing commands that walk every page show a spinner on stderr with the
//! number of pages and records fetched so far.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for indeterminate operations
///
/// # Example
/// ```
/// use rsys::cli::output::progress::create_spinner;
///
/// let spinner = create_spinner();
/// spinner.set_message("Fetching campaigns...");
/// spinner.finish_with_message("Done");
/// ```
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        spinner.set_style(style.tick_chars(SPINNER_CHARS));
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Create a spinner with a custom message
pub fn create_spinner_with_message(message: impl Into<String>) -> ProgressBar {
    let spinner = create_spinner();
    spinner.set_message(message.into());
    spinner
}

/// A spinner, or a hidden bar when output must stay machine-readable
pub fn spinner_for(json_mode: bool, message: impl Into<String>) -> ProgressBar {
    if json_mode {
        ProgressBar::hidden()
    } else {
        create_spinner_with_message(message)
    }
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with an error message
    fn finish_error(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✓ {}", message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✗ {}", message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let spinner = create_spinner();
        spinner.set_message("Testing");
        spinner.finish();
        assert!(spinner.is_finished());
    }

    #[test]
    fn test_create_spinner_with_message() {
        let spinner = create_spinner_with_message("Fetching programs");
        assert_eq!(spinner.message(), "Fetching programs");
        spinner.finish_success("2 pages");
        assert_eq!(spinner.message(), "✓ 2 pages");
    }

    #[test]
    fn test_spinner_hidden_in_json_mode() {
        let spinner = spinner_for(true, "Fetching campaigns");
        assert!(spinner.is_hidden());
        spinner.finish_error("failed");
    }
}
