//! # Route Guard
//!
//! Navigation decisions derived from the session. Evaluated fresh on every
//! navigation; nothing here is cached.
//!
//! ```text
//!   not authenticated        ──► /login   (remember requested path)
//!   authenticated, not admin ──► /
//!   authenticated admin      ──► allow
//! ```

use crate::session::Session;
use crate::{ADMIN_DASHBOARD_PATH, HOME_PATH, LOGIN_PATH};

/// Where the view layer should go instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    /// Destination to return to after signing in.
    pub from: Option<String>,
    /// Replace the current history entry rather than push.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Gate for admin-only views.
///
/// A token without a user record counts as a non-admin.
pub fn admin_route(session: &Session, requested: &str) -> GuardDecision {
    if !session.is_authenticated() {
        return GuardDecision::Redirect(Redirect {
            to: LOGIN_PATH,
            from: Some(requested.to_string()),
            replace: true,
        });
    }

    if !session.is_admin() {
        return GuardDecision::Redirect(Redirect {
            to: HOME_PATH,
            from: None,
            replace: true,
        });
    }

    GuardDecision::Allow
}

/// Landing page after a successful sign-in, or `None` while anonymous.
///
/// Admins always land on the dashboard; everyone else returns to the page
/// that sent them to the login form, or home.
pub fn post_login_destination(session: &Session, from: Option<&str>) -> Option<String> {
    if !session.is_authenticated() {
        return None;
    }
    if session.is_admin() {
        return Some(ADMIN_DASHBOARD_PATH.to_string());
    }
    Some(from.unwrap_or(HOME_PATH).to_string())
}
