use core_types::{CompareMode, TimeRange};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing file yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

/// Defaults for building a dashboard report. CLI flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// The reporting window, one of `7d`, `30d`, `90d` or `all`.
    pub time_range: TimeRange,
    /// `off` or `rolling_avg`.
    pub compare_mode: CompareMode,
    /// When set, events belonging to any other account are dropped on ingest.
    pub account_id: Option<String>,
}

/// Parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    /// If set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
