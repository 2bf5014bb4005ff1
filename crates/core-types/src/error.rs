use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown event type: '{0}'")]
    UnknownEventType(String),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
