//! Proxy endpoint
//!
//! `POST /ai-proxy` (also mounted at `/`). The body is read once, parsed
//! into a [`ProxyRequest`] and handed to the dispatcher.

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State};

use crate::error::ProxyError;
use crate::schemas::ProxyRequest;
use crate::server::state::AppState;
use crate::services::UpstreamResponse;

pub async fn proxy(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<UpstreamResponse, ProxyError> {
    let body = body.map_err(|e| ProxyError::InvalidBody(e.body_text()))?;
    let request: ProxyRequest = serde_json::from_slice(&body)?;

    state.dispatcher.dispatch(&request).await
}
