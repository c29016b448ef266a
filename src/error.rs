use thiserror::Error;

/// Message stored when a source fails without saying why.
pub const DEFAULT_LOAD_ERROR: &str = "Failed to fetch tasks";

/// Failure of a [`TaskSource`](crate::loader::TaskSource) fetch.
///
/// The display string is what the store records in `load_error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("{0}")]
    Unavailable(String),
    #[error("invalid task data: {0}")]
    InvalidData(String),
}

impl LoadError {
    pub fn unavailable<M: Into<String>>(message: M) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
