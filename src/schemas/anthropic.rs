//! Anthropic Messages API request schema

use serde::Serialize;
use serde_json::Value;

/// Body of `POST /v1/messages`
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: Value,
    pub max_tokens: Value,
    /// Client messages, borrowed from the inbound request as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<&'a Value>,
}
