//! Invocation entrypoint handlers.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::Value;
use tracing::info;

use crate::llm::ChatMessage;

use super::types::{InvocationResult, PingResponse, RequestContext};
use super::{ApiError, AppState};

/// Guidance substituted when the payload carries no usable prompt.
pub(crate) const MISSING_PROMPT_GUIDANCE: &str =
    "No prompt found in input, please guide customer to create a json payload with prompt key";

/// `POST /invocations` - run the agent over the payload's prompt.
///
/// Builds a fresh single-message conversation per call; agent failures
/// propagate to the runtime error body untouched.
pub(crate) async fn invoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<InvocationResult>, ApiError> {
    let context = RequestContext::from_headers(&headers);

    let prompt = payload
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_PROMPT_GUIDANCE.to_string());

    let conversation = state.agent.run(vec![ChatMessage::user(prompt)]).await?;

    let result = conversation
        .last()
        .and_then(|message| message.text())
        .ok_or_else(|| anyhow::anyhow!("Agent reply carries no text"))?
        .to_string();

    info!("context: {}", context);
    info!("result: {}", result);

    Ok(Json(InvocationResult { result }))
}

/// `GET /ping` - health probe.
pub(crate) async fn ping() -> Json<PingResponse> {
    Json(PingResponse::healthy())
}
