//! Inbound proxy request schema
//!
//! The request body clients send to the relay. Field names are camelCase on
//! the wire.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ProxyError;

/// Upstream adapter selected by the `provider` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic Messages API
    Claude,
    /// OpenAI Chat Completions API
    OpenAI,
    /// OpenAI audio transcription (Whisper)
    OpenAITranscription,
}

impl Provider {
    pub const ALL: [Provider; 3] = [
        Provider::Claude,
        Provider::OpenAI,
        Provider::OpenAITranscription,
    ];

    /// Canonical discriminator value
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::OpenAI => "openai",
            Provider::OpenAITranscription => "openai-transcription",
        }
    }

    /// Provider-agnostic alias accepted alongside the canonical name
    pub fn alias(&self) -> &'static str {
        match self {
            Provider::Claude => "chat-a",
            Provider::OpenAI => "chat-b",
            Provider::OpenAITranscription => "transcription-b",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.alias() == s)
            .ok_or(ProxyError::InvalidProvider)
    }
}

/// JavaScript truthiness, used to decide when a client value falls back to a default
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Body of `POST /ai-proxy`
///
/// Everything except the audio fields is kept as raw JSON: upstream APIs
/// own the shape of `messages`, `model` and `maxTokens`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// Any JSON value; only known strings select a provider
    #[serde(default)]
    pub provider: Option<Value>,

    /// Forwarded upstream untouched
    #[serde(default)]
    pub messages: Option<Value>,

    #[serde(default)]
    pub model: Option<Value>,

    #[serde(default)]
    pub max_tokens: Option<Value>,

    /// Base64 encoded audio, only used for transcription
    #[serde(default)]
    pub audio_data: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

impl ProxyRequest {
    /// Resolve the discriminator into a known provider
    pub fn provider(&self) -> Result<Provider, ProxyError> {
        self.provider
            .as_ref()
            .and_then(Value::as_str)
            .ok_or(ProxyError::InvalidProvider)?
            .parse()
    }

    /// Requested model, or `default` when absent or falsy
    pub fn model_or(&self, default: &str) -> Value {
        Self::truthy_or(&self.model, || Value::from(default))
    }

    /// Requested token budget, or `default` when absent or falsy
    pub fn max_tokens_or(&self, default: u32) -> Value {
        Self::truthy_or(&self.max_tokens, || Value::from(default))
    }

    fn truthy_or(value: &Option<Value>, default: impl FnOnce() -> Value) -> Value {
        match value {
            Some(v) if is_truthy(v) => v.clone(),
            _ => default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Claude);
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!(
            "openai-transcription".parse::<Provider>().unwrap(),
            Provider::OpenAITranscription
        );
        assert_eq!("chat-a".parse::<Provider>().unwrap(), Provider::Claude);
        assert_eq!("chat-b".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!(
            "transcription-b".parse::<Provider>().unwrap(),
            Provider::OpenAITranscription
        );
    }

    #[test]
    fn test_unknown_provider_is_invalid() {
        assert!(matches!("gemini".parse::<Provider>(), Err(ProxyError::InvalidProvider)));
        assert!(matches!("Claude".parse::<Provider>(), Err(ProxyError::InvalidProvider)));
        assert!(matches!(
            ProxyRequest::default().provider(),
            Err(ProxyError::InvalidProvider)
        ));
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: ProxyRequest = serde_json::from_value(json!({
            "provider": "openai-transcription",
            "maxTokens": 256,
            "audioData": "AAEC",
            "filename": "clip.webm"
        }))
        .unwrap();

        assert_eq!(request.max_tokens, Some(json!(256)));
        assert_eq!(request.audio_data.as_deref(), Some("AAEC"));
        assert_eq!(request.filename.as_deref(), Some("clip.webm"));
        assert!(request.messages.is_none());
    }

    #[test]
    fn test_non_string_provider_is_invalid() {
        for provider in [json!(7), json!(true), json!(["claude"]), json!({"name": "claude"})] {
            let request: ProxyRequest =
                serde_json::from_value(json!({ "provider": provider })).unwrap();
            assert!(matches!(request.provider(), Err(ProxyError::InvalidProvider)));
        }
    }

    #[test]
    fn test_defaults_follow_truthiness() {
        let request = ProxyRequest {
            model: Some(json!("")),
            max_tokens: Some(json!(0)),
            ..Default::default()
        };
        assert_eq!(request.model_or("gpt-4"), json!("gpt-4"));
        assert_eq!(request.max_tokens_or(1024), json!(1024));

        let request = ProxyRequest {
            max_tokens: Some(Value::Null),
            ..Default::default()
        };
        assert_eq!(request.max_tokens_or(1024), json!(1024));

        let request = ProxyRequest {
            model: Some(json!("gpt-4o")),
            max_tokens: Some(json!(64)),
            ..Default::default()
        };
        assert_eq!(request.model_or("gpt-4"), json!("gpt-4o"));
        assert_eq!(request.max_tokens_or(1024), json!(64));
    }

    #[test]
    fn test_truthy_numbers_are_forwarded_unchanged() {
        let request: ProxyRequest =
            serde_json::from_value(json!({"provider": "openai", "maxTokens": 256.0})).unwrap();
        assert_eq!(request.max_tokens_or(1024), json!(256.0));

        let request: ProxyRequest =
            serde_json::from_value(json!({"provider": "openai", "maxTokens": -5})).unwrap();
        assert_eq!(request.max_tokens_or(1024), json!(-5));

        let request: ProxyRequest =
            serde_json::from_value(json!({"provider": "openai", "maxTokens": 0.0})).unwrap();
        assert_eq!(request.max_tokens_or(1024), json!(1024));
    }

    #[test]
    fn test_messages_are_kept_verbatim() {
        let messages = json!([
            {"role": "user", "content": "What is 6 * 7?"},
            {"role": "assistant", "tool_calls": [
                {"id": "call_1", "type": "function",
                 "function": {"name": "calc", "arguments": "{\"expr\":\"6*7\"}"}}
            ]},
            {"role": "tool", "tool_call_id": "call_1", "content": "42"}
        ]);
        let request: ProxyRequest =
            serde_json::from_value(json!({"provider": "openai", "messages": messages.clone()}))
                .unwrap();

        assert_eq!(request.messages, Some(messages));
    }
}
