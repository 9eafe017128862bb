//! # Session
//!
//! Authentication state: who is signed in and the bearer token that proves
//! it.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐   begin(Login|Register)   ┌───────────┐                │
//! │   │ Anonymous │ ────────────────────────► │  Loading  │                │
//! │   └───────────┘                           └─────┬─────┘                │
//! │         ▲  ▲                          reject    │    fulfil            │
//! │         │  └──── (error attached) ◄─────────────┤                      │
//! │         │                                       ▼                      │
//! │         │        logout()              ┌───────────────┐               │
//! │         └───────────────────────────── │ Authenticated │               │
//! │                                        └───────────────┘               │
//! │                                                                         │
//! │   authenticated ⇔ token present (derived, never stored)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence of the token and user record is the caller's job; this type
//! only models the transitions.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::types::{AuthResponse, UserRecord};

// =============================================================================
// Bearer Token
// =============================================================================

/// Opaque credential attached to authorized requests.
///
/// Wrapped in a `SecretString` so it never shows up in logs or `Debug`
/// output.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        BearerToken(SecretString::from(token.into()))
    }

    /// Raw token, for the `Authorization` header and durable storage only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

// =============================================================================
// Auth Attempts
// =============================================================================

/// Which form started the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

impl AuthKind {
    /// Message stored when the backend gives no reason.
    pub fn fallback_message(self) -> &'static str {
        match self {
            AuthKind::Login => "Login failed",
            AuthKind::Register => "Registration failed",
        }
    }

    /// Backend path below the API base.
    pub fn path(self) -> &'static str {
        match self {
            AuthKind::Login => "auth/login",
            AuthKind::Register => "auth/register",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKind::Login => f.write_str("login"),
            AuthKind::Register => f.write_str("register"),
        }
    }
}

/// Receipt for a pending login/register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTicket {
    seq: u64,
    kind: AuthKind,
}

impl AuthTicket {
    pub fn kind(&self) -> AuthKind {
        self.kind
    }
}

// =============================================================================
// Session
// =============================================================================

/// Current authentication state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<UserRecord>,
    token: Option<BearerToken>,
    loading: bool,
    error: Option<String>,
    seq: u64,
}

impl Session {
    /// Anonymous session.
    pub fn new() -> Self {
        Session::default()
    }

    /// Session restored from durable storage.
    ///
    /// A stored token is trusted as-is; nothing checks it against the
    /// backend until a request is rejected. An empty token counts as none.
    pub fn rehydrated(user: Option<UserRecord>, token: Option<String>) -> Self {
        Session {
            user,
            token: token.filter(|t| !t.is_empty()).map(BearerToken::new),
            ..Session::default()
        }
    }

    /// Pending transition: loading on, error cleared.
    pub fn begin(&mut self, kind: AuthKind) -> AuthTicket {
        self.seq += 1;
        self.loading = true;
        self.error = None;
        AuthTicket {
            seq: self.seq,
            kind,
        }
    }

    /// Success: user and token installed. Returns `false` for a stale ticket.
    pub fn fulfil(&mut self, ticket: AuthTicket, response: AuthResponse) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.token = Some(BearerToken::new(response.token));
        self.user = Some(response.user);
        true
    }

    /// Failure: error attached, authentication left as it was.
    pub fn reject(&mut self, ticket: AuthTicket, message: impl Into<String>) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    /// Drops everything, including a pending attempt and any error.
    pub fn logout(&mut self) {
        self.seq += 1;
        self.user = None;
        self.token = None;
        self.loading = false;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Admin flag of the signed-in user; `false` when no user is known.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
