use serde::{Deserialize, Serialize};

/// Options that control generation and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterOptions {
    /// Hoist a class-level `main` method into a standalone function with a
    /// `__main__` guard (default: true).
    #[serde(default = "default_true")]
    pub hoist_entry_point: bool,

    /// Append the efficiency/parse-rate report as a trailing comment block
    /// (default: true).
    #[serde(default = "default_true")]
    pub append_report: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            hoist_entry_point: true,
            append_report: true,
        }
    }
}
