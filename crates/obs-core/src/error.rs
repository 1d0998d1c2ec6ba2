//! Unified error types for the observer panel

use thiserror::Error;

/// Text shown in the error area when a list fetch fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error while fetching data";

/// Unified error type for all panel operations
#[derive(Error, Debug)]
pub enum ObsError {
    /// Listing metrics or observers failed. The detail is for logs only.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// An add or delete request was rejected or never reached the server.
    #[error("{}", mutation_message(.status_text, .status, .detail))]
    Mutation {
        /// HTTP status code, absent when the request failed in transport
        status: Option<u16>,
        /// Canonical reason phrase, or "error" for transport failures
        status_text: String,
        /// Response body or transport error
        detail: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObsError {
    /// Build a mutation error from a transport failure (no HTTP status).
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Mutation {
            status: None,
            status_text: "error".to_string(),
            detail: detail.into(),
        }
    }

    /// The string displayed in the panel's error area.
    ///
    /// Fetch failures stay generic; everything else is shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(_) => FETCH_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status code carried by a mutation failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Mutation { status, .. } => *status,
            _ => None,
        }
    }
}

fn mutation_message(status_text: &str, status: &Option<u16>, detail: &str) -> String {
    let code = status.map(|s| s.to_string()).unwrap_or_else(|| "0".to_string());
    if detail.is_empty() {
        format!("{} {}", status_text, code)
    } else {
        format!("{} {} {}", status_text, code, detail)
    }
}

/// Result type alias using ObsError
pub type Result<T> = std::result::Result<T, ObsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_generic() {
        let err = ObsError::Fetch("connection refused (os error 111)".to_string());
        assert_eq!(err.user_message(), FETCH_ERROR_MESSAGE);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_mutation_message_contains_status() {
        let err = ObsError::Mutation {
            status: Some(404),
            status_text: "Not Found".to_string(),
            detail: "no such metric".to_string(),
        };
        assert_eq!(err.user_message(), "Not Found 404 no such metric");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_mutation_message_without_detail() {
        let err = ObsError::Mutation {
            status: Some(500),
            status_text: "Internal Server Error".to_string(),
            detail: String::new(),
        };
        assert_eq!(err.user_message(), "Internal Server Error 500");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = ObsError::transport("dns failure");
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message(), "error 0 dns failure");
    }
}
