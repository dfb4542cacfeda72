//! Upstream response handling shared by every adapter

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::ProxyError;

/// Longest upstream body excerpt written to the log on a parse failure
const LOGGED_BODY_CHARS: usize = 512;

/// An upstream reply relayed to the caller as-is
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamResponse {
    /// Read a reqwest response into a status and JSON body
    ///
    /// The upstream status is kept, including non-2xx replies, so callers see
    /// provider errors with their original code. A body that is not JSON is
    /// reported as [`ProxyError::UpstreamBody`].
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self, ProxyError> {
        // reqwest 0.11 is on http 0.2, axum on http 1
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let text = response.text().await?;

        let body = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                status = %status.as_u16(),
                error = %e,
                body = %excerpt(&text),
                "Upstream returned a non-JSON body"
            );
            ProxyError::UpstreamBody(e.to_string())
        })?;

        if !status.is_success() {
            tracing::warn!(status = %status.as_u16(), "Upstream returned an error status");
        }

        Ok(Self { status, body })
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn excerpt(s: &str) -> &str {
    match s.char_indices().nth(LOGGED_BODY_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let long = "é".repeat(LOGGED_BODY_CHARS + 10);
        assert_eq!(excerpt(&long).chars().count(), LOGGED_BODY_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[tokio::test]
    async fn test_into_response_keeps_status() {
        let response = UpstreamResponse {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: serde_json::json!({"error": {"type": "rate_limit_error"}}),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["type"], "rate_limit_error");
    }
}
