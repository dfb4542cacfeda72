//! Proxy error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Everything that can stop a request from being forwarded
#[derive(Error, Debug)]
pub enum ProxyError {
    /// A provider was selected whose credential is not configured
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    #[error("Invalid provider. Use \"claude\", \"openai\", or \"openai-transcription\"")]
    InvalidProvider,

    /// The inbound body could not be read or parsed
    #[error("{0}")]
    InvalidBody(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid audio data: {0}")]
    AudioDecode(#[from] base64::DecodeError),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Failed to parse upstream response: {0}")]
    UpstreamBody(String),

    /// The relay itself failed while building an upstream request
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidProvider => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::InvalidBody(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %message, "Error in ai-proxy");
        } else {
            tracing::warn!(status = %status.as_u16(), error = %message, "Rejected proxy request");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// JSON error envelope returned for every local failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
