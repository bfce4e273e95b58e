//! API client for the game backend
//!
//! Every call is a single JSON `POST`: the payload is merged with the current
//! language and session id, a loading indicator is shown for the duration of
//! the call, and non-success statuses become [`ApiError::Status`] carrying the
//! response body verbatim. There is no retry.

pub mod http;

use crate::types::language::Language;
use crate::types::payload::Envelope;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use http::HttpTransport;

/// Backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    NewGame,
    Choice,
    End,
}

impl Endpoint {
    /// Path relative to the API base
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::NewGame => "new",
            Endpoint::Choice => "choice",
            Endpoint::End => "end",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Raw HTTP response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to get any response at all
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Carries a JSON body to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: String) -> Result<RawResponse, TransportError>;
}

/// API errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    /// No response was received
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },

    /// A success response whose body was not the expected JSON
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: Endpoint, message: String },

    /// The request body could not be encoded
    #[error("failed to encode request for {endpoint}: {message}")]
    Encode { endpoint: Endpoint, message: String },
}

impl ApiError {
    /// Text to show the user: the backend's own message when it sent one
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Something that shows a "loading" state while a call is in flight
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Loading indicator backed by a shared flag
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for LoadingFlag {
    fn show(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Hides the indicator when dropped, whichever way the call ends
struct LoadingGuard<'a>(&'a dyn LoadingIndicator);

impl<'a> LoadingGuard<'a> {
    fn show(indicator: &'a dyn LoadingIndicator) -> Self {
        indicator.show();
        Self(indicator)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.hide();
    }
}

/// Language and session merged into every request
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub lang: Language,
    pub sid: Option<&'a str>,
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    loading: Arc<dyn LoadingIndicator>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, loading: Arc<dyn LoadingIndicator>) -> Self {
        Self { transport, loading }
    }

    /// POST `payload` to `endpoint` and decode the JSON response
    pub async fn call<P, R>(
        &self,
        endpoint: Endpoint,
        payload: &P,
        ctx: RequestContext<'_>,
    ) -> Result<R, ApiError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let envelope = Envelope {
            payload,
            lang: ctx.lang,
            sid: ctx.sid,
        };
        let body = serde_json::to_string(&envelope).map_err(|e| ApiError::Encode {
            endpoint,
            message: e.to_string(),
        })?;

        log::debug!("POST {endpoint} ({} bytes)", body.len());
        let response = {
            let _loading = LoadingGuard::show(self.loading.as_ref());
            self.transport.post_json(endpoint.path(), body).await
        };

        let response = response.map_err(|source| {
            log::warn!("POST {endpoint} failed: {source}");
            ApiError::Network { endpoint, source }
        })?;

        if !response.is_success() {
            log::warn!("POST {endpoint} returned HTTP {}", response.status);
            return Err(ApiError::Status {
                endpoint,
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::types::payload::{ChoiceRequest, ChoiceResponse, EndRequest, EndResponse};
    use serde_json::json;

    fn client(transport: &Arc<ScriptedTransport>, flag: &LoadingFlag) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(flag.clone()))
    }

    #[tokio::test]
    async fn merges_language_and_session_into_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({ "title": "T", "ending": "E" }));
        let flag = LoadingFlag::new();

        let ctx = RequestContext {
            lang: Language::En,
            sid: Some("s1"),
        };
        let _: EndResponse = client(&transport, &flag)
            .call(Endpoint::End, &EndRequest::default(), ctx)
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "end");
        assert_eq!(sent[0].body, json!({ "lang": "en", "sid": "s1" }));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body_verbatim() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(400, "请先 /new 开局");
        let flag = LoadingFlag::new();

        let ctx = RequestContext {
            lang: Language::Zh,
            sid: None,
        };
        let err = client(&transport, &flag)
            .call::<_, ChoiceResponse>(Endpoint::Choice, &ChoiceRequest::option(1), ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert_eq!(err.user_message(), "请先 /new 开局");
        assert!(!flag.is_visible());
    }

    #[tokio::test]
    async fn network_failure_clears_loading() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_failure("connection refused");
        let flag = LoadingFlag::new();

        let ctx = RequestContext {
            lang: Language::Zh,
            sid: None,
        };
        let err = client(&transport, &flag)
            .call::<_, EndResponse>(Endpoint::End, &EndRequest::default(), ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network { .. }));
        assert!(err.user_message().contains("connection refused"));
        assert!(!flag.is_visible());
    }

    #[tokio::test]
    async fn loading_is_visible_while_in_flight() {
        let transport = Arc::new(ScriptedTransport::new());
        let flag = LoadingFlag::new();
        transport.observe_loading(flag.clone());
        transport.push_json(json!({ "title": "T", "ending": "E" }));

        let ctx = RequestContext {
            lang: Language::Zh,
            sid: None,
        };
        let _: EndResponse = client(&transport, &flag)
            .call(Endpoint::End, &EndRequest::default(), ctx)
            .await
            .unwrap();

        assert_eq!(transport.loading_seen(), vec![true]);
        assert!(!flag.is_visible());
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(200, "<html>oops</html>");
        let flag = LoadingFlag::new();

        let ctx = RequestContext {
            lang: Language::Zh,
            sid: None,
        };
        let err = client(&transport, &flag)
            .call::<_, EndResponse>(Endpoint::End, &EndRequest::default(), ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { endpoint: Endpoint::End, .. }));
    }
}
