//! OpenAI request schemas

use serde::Serialize;
use serde_json::Value;

/// Model used for every transcription request
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Filename sent when the client does not provide one
pub const DEFAULT_AUDIO_FILENAME: &str = "audio.webm";

/// Content type of the uploaded audio part
pub const AUDIO_MIME_TYPE: &str = "audio/webm";

/// Body of `POST /v1/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: Value,
    pub max_tokens: Value,
    /// Client messages, borrowed from the inbound request as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<&'a Value>,
}

/// Decoded audio ready to be sent to `POST /v1/audio/transcriptions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub filename: String,
}
