//! Search state error types.

use thiserror::Error;

/// Errors that can occur while editing or persisting search state.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A filter value outside the field's option set.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidOption { field: &'static str, value: String },

    /// Session storage could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Session storage contents could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for SearchError {
    fn from(e: std::io::Error) -> Self {
        SearchError::Storage(e.to_string())
    }
}
