use crate::data::aggregate::{DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_ROLES};

/// Where the salary records are fetched from at startup.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/rabinatti/imersao-alura-dados-2026/refs/heads/main/dados-imersao-final.csv";

/// Fixed dashboard settings. There are no flags or config files; logging is
/// controlled through `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: String,
    /// Countries selected when the dashboard opens.
    pub default_countries: Vec<String>,
    pub histogram_bins: usize,
    pub top_roles: usize,
    pub window_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            default_countries: vec!["BRA".to_string(), "USA".to_string()],
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            top_roles: DEFAULT_TOP_ROLES,
            window_title: "Salary Lens – IT Salary Dashboard".to_string(),
        }
    }
}
