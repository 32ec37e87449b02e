//! API request and response types.

use std::fmt;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session id header set by the hosting runtime, when there is one.
pub(crate) const SESSION_ID_HEADER: &str = "x-amzn-bedrock-agentcore-runtime-session-id";

/// Result of one agent invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    /// Final response text from the agent
    pub result: String,
}

/// Health probe response.
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    /// Runtime status
    pub status: String,
}

impl PingResponse {
    pub fn healthy() -> Self {
        Self {
            status: "Healthy".to_string(),
        }
    }
}

/// Per-request context derived from transport metadata.
///
/// Opaque to the handler: it is logged, never interpreted.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub session_id: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let session_id = headers
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            request_id: Uuid::new_v4(),
            session_id,
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.session_id {
            Some(session) => write!(f, "request_id={} session_id={}", self.request_id, session),
            None => write!(f, "request_id={}", self.request_id),
        }
    }
}
