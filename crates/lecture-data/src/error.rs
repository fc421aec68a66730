//! Listing fetch error types.

use thiserror::Error;

/// Errors that can occur while fetching a listing page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Failed to reach the server.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not the expected listing shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Superseded by a newer fetch.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing in place of the listing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status, .. } if (400..500).contains(status) => {
                let reason = http::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Bad request");
                format!(
                    "The search could not be processed ({} {}). Check the filters and try again.",
                    status, reason
                )
            }
            Self::Http { status, .. } => format!(
                "The lecture service is having trouble (HTTP {}). Please try again later.",
                status
            ),
            Self::Timeout => "The lecture service took too long to respond.".to_string(),
            Self::Transport(_) => {
                "Could not reach the lecture service. Check your connection.".to_string()
            }
            Self::MalformedResponse(_) => {
                "The lecture service returned an unexpected response.".to_string()
            }
            Self::InvalidUrl(url) => format!("The listing URL is invalid: {}", url),
            Self::Cancelled => "The search was replaced by a newer one.".to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_client_vs_server() {
        let client = FetchError::Http {
            status: 404,
            message: String::new(),
        };
        let server = FetchError::Http {
            status: 503,
            message: String::new(),
        };
        assert!(client.user_message().contains("404 Not Found"));
        assert!(server.user_message().contains("try again later"));
        assert_ne!(client.user_message(), server.user_message());
    }

    #[test]
    fn test_status_and_cancelled() {
        assert_eq!(
            FetchError::Http {
                status: 500,
                message: "boom".into()
            }
            .status(),
            Some(500)
        );
        assert_eq!(FetchError::Timeout.status(), None);
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Timeout.is_cancelled());
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: FetchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }
}
