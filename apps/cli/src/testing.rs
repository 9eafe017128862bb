//! Offline storefront for command tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use homecraft_client::{ApiRequest, ClientConfig, ClientError, ClientResult, Storefront, Transport};
use homecraft_core::{TOKEN_KEY, USER_KEY};
use homecraft_storage::MemoryStore;
use serde_json::{json, Value};

/// Replays canned responses and counts what was sent.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<ClientResult<Value>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, status: u16, message: Option<&str>) -> Self {
        self.responses.lock().unwrap().push_back(Err(ClientError::Api {
            status,
            message: message.map(String::from),
        }));
        self
    }

    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.sent.lock().unwrap().last().and_then(|r| r.body.clone())
    }
}

impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        self.sent.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".into())))
    }
}

/// `admin`: `None` for anonymous, otherwise a stored session with that role.
pub fn storefront(transport: RecordingTransport, admin: Option<bool>) -> Storefront<RecordingTransport> {
    let memory = match admin {
        None => MemoryStore::new(),
        Some(is_admin) => MemoryStore::with_values([
            (TOKEN_KEY.to_string(), "jwt-abc".to_string()),
            (
                USER_KEY.to_string(),
                json!({"name": "Asha", "email": "asha@example.com", "isAdmin": is_admin})
                    .to_string(),
            ),
        ]),
    };
    Storefront::new(ClientConfig::default(), transport, Arc::new(memory))
}
