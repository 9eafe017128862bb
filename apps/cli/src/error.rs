//! # Command Error Type
//!
//! What a failed command reports: a machine-readable `code` and a message
//! fit for the terminal.
//!
//! ```json
//! { "code": "BACKEND_ERROR", "message": "Failed to fetch products" }
//! ```
//!
//! Store failures report the message the store recorded (the backend's
//! own message or the operation's fallback), so the terminal shows exactly
//! what a storefront page would.

use serde::Serialize;
use std::fmt;

use homecraft_client::ClientError;
use homecraft_core::{GuardDecision, Redirect};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before dispatch
    ValidationError,
    /// No session
    NotAuthenticated,
    /// Route guard refused, or backend answered 401/403
    Forbidden,
    /// Backend answered 404
    NotFound,
    /// Any other backend failure
    BackendError,
    /// Backend unreachable
    NetworkError,
    ConfigError,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BackendError => "BACKEND_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
        }
    }
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ValidationError, message)
    }

    /// A client error whose operation left a message in its store.
    pub fn rejected(err: ClientError, stored: Option<String>) -> Self {
        let mut command_error = CommandError::from(err);
        if let Some(message) = stored {
            command_error.message = message;
        }
        command_error
    }

    /// The route guard sent us elsewhere.
    pub fn redirected(redirect: &Redirect) -> Self {
        match redirect.to {
            homecraft_core::LOGIN_PATH => CommandError::new(
                ErrorCode::NotAuthenticated,
                "Sign in first: homecraft login --email <email>",
            ),
            _ => CommandError::new(ErrorCode::Forbidden, "Admin access required"),
        }
    }

    /// `Ok` when the guard allows, the redirect as an error otherwise.
    pub fn guard(decision: GuardDecision) -> CommandResult<()> {
        match decision {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect(redirect) => Err(CommandError::redirected(&redirect)),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CommandError {}

/// Converts client errors to command errors.
impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Transport(_) => ErrorCode::NetworkError,
            ClientError::Api { status: 401 | 403, .. } => ErrorCode::Forbidden,
            ClientError::Api { status: 404, .. } => ErrorCode::NotFound,
            ClientError::Api { .. } | ClientError::Decode(_) => ErrorCode::BackendError,
            ClientError::NotAuthenticated => ErrorCode::NotAuthenticated,
            ClientError::Validation(_) => ErrorCode::ValidationError,
            ClientError::Config(_) => ErrorCode::ConfigError,
            ClientError::Storage(_) => ErrorCode::StorageError,
        };
        let message = match &err {
            ClientError::NotAuthenticated => {
                "Sign in first: homecraft login --email <email>".to_string()
            }
            other => other
                .server_message()
                .map(String::from)
                .unwrap_or_else(|| other.to_string()),
        };
        CommandError { code, message }
    }
}

/// Result type for commands.
pub type CommandResult<T> = Result<T, CommandError>;
