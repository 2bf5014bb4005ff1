use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{DashboardSettings, LoggingSettings, Settings};

/// The file read by `load_config`, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Loads the application configuration from `dashboard.toml`.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration from `path`, layered under `FUNNEL__`-prefixed
/// environment variables (e.g. `FUNNEL__DASHBOARD__TIME_RANGE=90d`).
///
/// A missing file is not an error; every setting has a default.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("FUNNEL")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    tracing::debug!(path = %path.display(), ?settings, "Configuration loaded.");
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let level = settings.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "logging.level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            settings.logging.level
        )));
    }

    if let Some(account_id) = &settings.dashboard.account_id {
        if account_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "dashboard.account_id must not be blank".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CompareMode, TimeRange};
    use std::fs;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(settings.dashboard.time_range, TimeRange::Last30Days);
        assert_eq!(settings.dashboard.compare_mode, CompareMode::Off);
        assert_eq!(settings.dashboard.account_id, None);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn reads_dashboard_and_logging_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(
            &path,
            r#"
[dashboard]
time_range = "90d"
compare_mode = "rolling_avg"
account_id = "acct-42"

[logging]
level = "debug"
directory = "logs"
"#,
        )
        .unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.dashboard.time_range, TimeRange::Last90Days);
        assert_eq!(settings.dashboard.compare_mode, CompareMode::RollingAvg);
        assert_eq!(settings.dashboard.account_id.as_deref(), Some("acct-42"));
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.directory, Some("logs".into()));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_unknown_time_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "[dashboard]\ntime_range = \"14d\"\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::LoadError(_))));
    }
}
