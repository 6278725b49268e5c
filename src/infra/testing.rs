use crate::infra::{ApiRequest, RawResponse, Transport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory transport: replays queued replies in order and records every
/// request it was handed.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    replies: VecDeque<Result<RawResponse, String>>,
    requests: Vec<ApiRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, body: Value) {
        self.push_status(200, body);
    }

    pub fn push_status(&self, status: u16, body: Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.lock().replies.push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_transport_error(&self, message: &str) {
        self.lock().replies.push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.inner.lock().expect("scripted transport lock")
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        match state.replies.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError(message)),
            None => Err(TransportError("no scripted reply".to_string())),
        }
    }
}
