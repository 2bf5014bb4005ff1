use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to read event export '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Event export is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Event export must be a JSON array of events, found {0}")]
    NotAnArray(&'static str),
}
