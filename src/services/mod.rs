pub mod export;

pub use export::{ExportOptions, ExportService, ExportSummary};
