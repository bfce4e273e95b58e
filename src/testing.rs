//! Test doubles for the transport and notifier seams

use crate::api::{LoadingFlag, RawResponse, Transport, TransportError};
use crate::flow::Notifier;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request as received by [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub body: serde_json::Value,
}

/// Transport answering from a queue of canned responses
///
/// Calls beyond the queue fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    loading: Mutex<Option<LoadingFlag>>,
    loading_seen: Mutex<Vec<bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with a JSON body
    ///
    /// Object keys come out sorted; use [`push_text`](Self::push_text) when
    /// the order of keys matters.
    pub fn push_json(&self, body: serde_json::Value) {
        self.push_status(200, &body.to_string());
    }

    /// Queue a 200 response with the body exactly as written
    pub fn push_text(&self, body: &str) {
        self.push_status(200, body);
    }

    /// Queue a response with an arbitrary status and body
    pub fn push_status(&self, status: u16, body: &str) {
        self.push(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Queue a network-level failure
    pub fn push_failure(&self, message: &str) {
        self.push(Err(TransportError(message.to_string())));
    }

    fn push(&self, response: Result<RawResponse, TransportError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Record the flag's visibility each time a request arrives
    pub fn observe_loading(&self, flag: LoadingFlag) {
        if let Ok(mut loading) = self.loading.lock() {
            *loading = Some(flag);
        }
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, path: &str, body: String) -> Result<RawResponse, TransportError> {
        let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                path: path.to_string(),
                body,
            });
        }

        let flag = self.loading.lock().ok().and_then(|flag| flag.clone());
        if let (Some(flag), Ok(mut seen)) = (flag, self.loading_seen.lock()) {
            seen.push(flag.is_visible());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(TransportError("no scripted response left".to_string())))
    }
}

/// Notifier that keeps every message it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
