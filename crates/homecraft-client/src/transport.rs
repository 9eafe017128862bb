//! # Transport
//!
//! The seam between the stores and the storefront backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Store ── ApiRequest { method, path, body, bearer } ──► Transport      │
//! │                                                             │           │
//! │                      ┌──────────────────────────────────────┤           │
//! │                      │                                      │           │
//! │              ApiClient (reqwest)                 test doubles           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │     2xx ─────────► body as JSON (empty body → null)                    │
//! │     non-2xx ─────► ClientError::Api { status, message: body.message }  │
//! │     no response ─► ClientError::Transport                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Paths are relative to the configured base URL (`products`,
//! `products/p1`, `auth/login`). Nothing is retried.

use std::fmt;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use homecraft_core::BearerToken;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One backend call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<BearerToken>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            body,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, None)
    }

    /// Attaches `Authorization: Bearer <token>`.
    pub fn with_bearer(mut self, token: &BearerToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Executes backend calls. Implemented by [`ApiClient`] and by test doubles.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends `request` and returns the decoded JSON body of a 2xx response.
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        (**self).execute(request).await
    }
}

/// Decodes a response body into a typed value.
pub fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

// =============================================================================
// ApiClient
// =============================================================================

/// Error body shape the backend uses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {}", e)))?;

        Ok(ApiClient {
            client,
            base: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

impl Transport for ApiClient {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        let url = self.url(&request.path)?;

        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty());
            warn!(status = status.as_u16(), ?message, "Backend rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = bytes.len(), "Backend responded");

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

// =============================================================================
// Unit Tests (against an in-process axum backend)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_backend() -> ClientConfig {
        let app = Router::new()
            .route(
                "/api/products",
                get(|| async {
                    Json(json!([{"id": "p1", "name": "Steel Gate", "price": 12000}]))
                }),
            )
            .route(
                "/api/products/{id}",
                get(|Path(id): Path<String>| async move {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"message": format!("Product {} not found", id)})),
                    )
                })
                .delete(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some("Bearer jwt-abc") => StatusCode::NO_CONTENT,
                        _ => StatusCode::UNAUTHORIZED,
                    }
                }),
            )
            .route(
                "/api/auth/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        (StatusCode::OK, Json(json!({"name": "Asha", "token": "jwt-abc"})))
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"message": "Invalid credentials"})),
                        )
                    }
                }),
            )
            .route(
                "/api/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}/api", addr);
        config
    }

    #[tokio::test]
    async fn test_get_decodes_json() {
        let client = ApiClient::new(&spawn_backend().await).unwrap();
        let body = client.execute(ApiRequest::get("products")).await.unwrap();
        assert_eq!(body[0]["name"], "Steel Gate");
    }

    #[tokio::test]
    async fn test_error_body_message_is_mapped() {
        let client = ApiClient::new(&spawn_backend().await).unwrap();

        let err = client
            .execute(ApiRequest::post(
                "auth/login",
                json!({"email": "a@b.co", "password": "wrong"}),
            ))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Invalid credentials"));

        let err = client.execute(ApiRequest::get("products/p9")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_non_json_error_has_no_message() {
        let client = ApiClient::new(&spawn_backend().await).unwrap();
        let err = client.execute(ApiRequest::get("broken")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, message: None }));
        assert_eq!(err.rejection_message("Failed"), "Failed");
    }

    #[tokio::test]
    async fn test_bearer_header_and_empty_body() {
        let client = ApiClient::new(&spawn_backend().await).unwrap();
        let token = BearerToken::new("jwt-abc");

        let body = client
            .execute(ApiRequest::delete("products/p1").with_bearer(&token))
            .await
            .unwrap();
        assert_eq!(body, Value::Null);

        let err = client
            .execute(ApiRequest::delete("products/p1"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let mut config = ClientConfig::default();
        // Port 9 (discard) on localhost is almost never listening.
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        let client = ApiClient::new(&config).unwrap();

        let err = client.execute(ApiRequest::get("products")).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
