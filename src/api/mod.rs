//! HTTP runtime surface.
//!
//! Implements the invocation contract the agent is hosted behind:
//! `POST /invocations` runs the request handler, `GET /ping` reports
//! health. Errors escaping the handler surface here as the runtime's
//! standard 500 error body.

mod invocations;
pub mod types;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::agent::Agent;
use crate::config::Config;

/// Shared state for request handlers.
pub struct AppState {
    pub agent: Agent,
}

/// Error escaping a handler; rendered as the runtime's 500 body.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("invocation failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Build the runtime router around a shared agent.
pub fn router(agent: Agent) -> Router {
    let state = Arc::new(AppState { agent });

    Router::new()
        .route("/invocations", post(invocations::invoke))
        .route("/ping", get(invocations::ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the runtime until ctrl-c.
pub async fn serve(config: &Config, agent: Agent) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, router(agent))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
