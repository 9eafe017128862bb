//! Test doubles for [`Transport`].

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{ClientError, ClientResult};
use crate::transport::{ApiRequest, HttpMethod, Transport};

/// What a test double saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl From<&ApiRequest> for Recorded {
    fn from(request: &ApiRequest) -> Self {
        Recorded {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            bearer: request.bearer.as_ref().map(|t| t.expose().to_string()),
        }
    }
}

/// Answers requests from a queue of canned responses, in order.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ClientResult<Value>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
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

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        self.requests.lock().unwrap().push(Recorded::from(&request));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".into())))
    }
}

/// Each request waits for its own channel, so a test decides the order in
/// which responses arrive.
pub struct GatedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<ClientResult<Value>>>>,
}

impl GatedTransport {
    /// Returns the transport and one sender per expected request.
    pub fn new(count: usize) -> (Self, Vec<oneshot::Sender<ClientResult<Value>>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..count).map(|_| oneshot::channel()).unzip();
        (
            GatedTransport {
                gates: Mutex::new(receivers),
            },
            senders,
        )
    }
}

impl Transport for GatedTransport {
    async fn execute(&self, _request: ApiRequest) -> ClientResult<Value> {
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Transport("gate dropped".into()))),
            None => Err(ClientError::Transport("no gate".into())),
        }
    }
}
