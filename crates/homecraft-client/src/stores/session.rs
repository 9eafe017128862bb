//! # Session Store
//!
//! Login, registration and logout, with the token and user record kept in
//! durable storage under `token` and `user`.
//!
//! ```text
//!   login/register ──► pending ──► fulfilled ──► token + user persisted
//!                                │
//!                                └► rejected ──► error = server message
//!                                               or "Login failed" /
//!                                               "Registration failed"
//!   logout ──────────► memory cleared, both keys removed
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use homecraft_core::{
    guard, AuthKind, AuthResponse, BearerToken, Credentials, GuardDecision, Registration, Session,
    UserRecord, TOKEN_KEY, USER_KEY,
};
use homecraft_storage::{KeyValueStore, KeyValueStoreExt};

use crate::error::{ClientError, ClientResult};
use crate::transport::{decode, ApiRequest, Transport};

/// Durable authentication state.
pub struct SessionStore {
    session: Mutex<Session>,
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Restores the session from durable storage. A stored token counts as
    /// signed in without asking the backend.
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let token = storage.get(TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable token");
            None
        });
        let user = storage.get_json::<UserRecord>(USER_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable user record");
            None
        });

        let session = Session::rehydrated(user, token);
        debug!(
            authenticated = session.is_authenticated(),
            admin = session.is_admin(),
            "Session rehydrated"
        );

        SessionStore {
            session: Mutex::new(session),
            storage,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Async Operations
    // -------------------------------------------------------------------------

    pub async fn login(
        &self,
        transport: &impl Transport,
        credentials: &Credentials,
    ) -> ClientResult<()> {
        credentials.validate()?;
        let body = serde_json::to_value(credentials)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.authenticate(transport, AuthKind::Login, body).await
    }

    pub async fn register(
        &self,
        transport: &impl Transport,
        registration: &Registration,
    ) -> ClientResult<()> {
        registration.validate()?;
        let body = serde_json::to_value(registration)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.authenticate(transport, AuthKind::Register, body).await
    }

    async fn authenticate(
        &self,
        transport: &impl Transport,
        kind: AuthKind,
        body: Value,
    ) -> ClientResult<()> {
        let ticket = self.lock().begin(kind);
        debug!(%kind, "Authentication pending");

        let result = transport
            .execute(ApiRequest::post(kind.path(), body))
            .await
            .and_then(decode::<AuthResponse>);

        match result {
            Ok(response) => {
                let token = response.token.clone();
                let user = response.user.clone();

                let mut session = self.lock();
                if !session.fulfil(ticket, response) {
                    debug!(%kind, "Discarding stale authentication result");
                    return Ok(());
                }
                if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
                    warn!(error = %e, "Failed to persist token");
                }
                if let Err(e) = self.storage.set_json(USER_KEY, &user) {
                    warn!(error = %e, "Failed to persist user record");
                }
                info!(user = user.display_name(), admin = user.is_admin, "Signed in");
                Ok(())
            }
            Err(err) => {
                let message = err.rejection_message(kind.fallback_message());
                if self.lock().reject(ticket, message.as_str()) {
                    warn!(%kind, error = %message, "Authentication failed");
                } else {
                    debug!(%kind, "Discarding stale authentication failure");
                }
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sync Operations
    // -------------------------------------------------------------------------

    /// Signs out. Memory and both durable keys are cleared unconditionally.
    pub fn logout(&self) {
        self.lock().logout();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove session key");
            }
        }
        info!("Signed out");
    }

    pub fn clear_error(&self) {
        self.lock().clear_error();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.lock().is_admin()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.lock().user().cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error().map(String::from)
    }

    pub fn token(&self) -> Option<BearerToken> {
        self.lock().token().cloned()
    }

    /// Token for an authorized call, or [`ClientError::NotAuthenticated`].
    pub fn require_token(&self) -> ClientResult<BearerToken> {
        self.token().ok_or(ClientError::NotAuthenticated)
    }

    /// Admin route guard against the current session.
    pub fn admin_route(&self, requested: &str) -> GuardDecision {
        guard::admin_route(&self.lock(), requested)
    }

    /// Where to go after signing in.
    pub fn post_login_destination(&self, from: Option<&str>) -> Option<String> {
        guard::post_login_destination(&self.lock(), from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use homecraft_storage::MemoryStore;
    use serde_json::json;

    fn store() -> (SessionStore, MemoryStore) {
        let memory = MemoryStore::new();
        (SessionStore::rehydrate(Arc::new(memory.clone())), memory)
    }

    fn creds() -> Credentials {
        Credentials::new("asha@example.com", "secret")
    }

    #[tokio::test]
    async fn test_login_success_persists_token_and_user() {
        let (session, memory) = store();
        let transport = ScriptedTransport::new().reply(json!({
            "_id": "u1", "name": "Asha", "isAdmin": false, "token": "jwt-abc"
        }));

        assert!(!session.is_authenticated());
        session.login(&transport, &creds()).await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(memory.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt-abc"));
        let user: UserRecord = memory.get_json(USER_KEY).unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Asha"));

        let sent = transport.requests();
        assert_eq!(sent[0].path, "auth/login");
        assert_eq!(sent[0].body.as_ref().unwrap()["email"], "asha@example.com");
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn test_login_failure_stores_server_message() {
        let (session, memory) = store();
        let transport = ScriptedTransport::new().fail(401, Some("Invalid credentials"));

        let err = session.login(&transport, &creds()).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!session.is_authenticated());
        assert_eq!(session.error().as_deref(), Some("Invalid credentials"));
        assert!(!memory.contains(TOKEN_KEY));
    }

    #[tokio::test]
    async fn test_register_failure_without_message_uses_fallback() {
        let (session, _) = store();
        let transport = ScriptedTransport::new().fail(500, None);
        let registration = Registration {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            password: "longenough".into(),
        };

        session.register(&transport, &registration).await.unwrap_err();
        assert_eq!(session.error().as_deref(), Some("Registration failed"));
        assert_eq!(transport.requests()[0].path, "auth/register");
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let (session, _) = store();
        let transport = ScriptedTransport::new();
        let short = Registration {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            password: "abc".into(),
        };

        let err = session.register(&transport, &short).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
        assert!(!session.snapshot().is_loading());
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let (session, memory) = store();
        let transport = ScriptedTransport::new()
            .reply(json!({"name": "Asha", "token": "jwt-abc"}))
            .fail(401, Some("Invalid credentials"));

        session.login(&transport, &creds()).await.unwrap();
        session.login(&transport, &creds()).await.unwrap_err();
        // A failed re-login leaves the existing session in place.
        assert!(session.is_authenticated());
        assert!(session.error().is_some());

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.error().is_none());
        assert!(!memory.contains(TOKEN_KEY));
        assert!(!memory.contains(USER_KEY));
    }

    #[test]
    fn test_rehydration_is_optimistic() {
        let memory = MemoryStore::with_values([
            (TOKEN_KEY, "stored-token"),
            (USER_KEY, r#"{"name":"Asha","isAdmin":true}"#),
        ]);
        let session = SessionStore::rehydrate(Arc::new(memory));

        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert!(session.admin_route("/admin/dashboard").is_allowed());
        assert_eq!(
            session.require_token().unwrap().expose(),
            "stored-token"
        );
    }

    #[test]
    fn test_corrupt_user_record_is_dropped() {
        let memory = MemoryStore::with_values([(TOKEN_KEY, "t"), (USER_KEY, "{broken")]);
        let session = SessionStore::rehydrate(Arc::new(memory));
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_require_token_when_anonymous() {
        let (session, _) = store();
        assert!(matches!(
            session.require_token(),
            Err(ClientError::NotAuthenticated)
        ));
    }
}
