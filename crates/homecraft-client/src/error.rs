//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Network      │  │    Backend      │  │       Local             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Transport      │  │  Api{status,    │  │  NotAuthenticated       │ │
//! │  │  (no response)  │  │      message}   │  │  Validation             │ │
//! │  │                 │  │  Decode         │  │  Config / Storage       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Lands in a Store
//! A failed operation stores the backend's `message` when it sent one and
//! a fixed per-operation fallback otherwise. Authorization failures take
//! the same path; [`ClientError::is_unauthorized`] is there for callers
//! that want to react, but nothing signs the user out automatically.

use homecraft_core::{CoreError, ValidationError};
use homecraft_storage::StorageError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Network Errors
    // =========================================================================
    /// The request never produced a response (DNS, refused, timeout, TLS).
    #[error("Request failed: {0}")]
    Transport(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-2xx response, with the `message` field of the body if present.
    #[error(
        "Backend returned {status}{}",
        .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default()
    )]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose body doesn't have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// The operation needs a session and there is none.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Input rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// The backend's own explanation, if it gave one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// HTTP 401 or 403.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403, .. })
    }

    /// Message to store for a failed operation: the server's message or
    /// `fallback`.
    pub fn rejection_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(CoreError::Validation(err))
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_prefers_server() {
        let err = ClientError::Api {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.rejection_message("Login failed"), "Invalid credentials");
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Backend returned 401: Invalid credentials");
    }

    #[test]
    fn test_rejection_message_falls_back() {
        let err = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(
            err.rejection_message("Failed to fetch products"),
            "Failed to fetch products"
        );
        assert_eq!(err.to_string(), "Backend returned 500");

        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.rejection_message("Order failed"), "Order failed");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_validation_conversion() {
        let err: ClientError = ValidationError::Required {
            field: "address".into(),
        }
        .into();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
