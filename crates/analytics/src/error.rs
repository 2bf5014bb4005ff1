use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Unknown baseline metric: '{0}'")]
    UnknownMetric(String),
}
