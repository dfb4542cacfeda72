//! OpenAI adapter
//!
//! Chat completions and Whisper transcription share one credential and
//! one base URL.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use reqwest::{
    multipart::{Form, Part},
    Client,
};

use crate::config::{Settings, OPENAI_API_KEY_VAR};
use crate::error::ProxyError;
use crate::schemas::openai::{
    ChatCompletionRequest, TranscriptionRequest, AUDIO_MIME_TYPE, DEFAULT_AUDIO_FILENAME,
    TRANSCRIPTION_MODEL,
};
use crate::schemas::ProxyRequest;
use crate::services::upstream::UpstreamResponse;

/// Standard alphabet, padding optional (browser `btoa` output and trimmed copies both decode)
const AUDIO_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 audio payload into raw bytes
///
/// Accepts bare base64 as well as a `data:<mime>;base64,` URL, and ignores
/// ASCII whitespace such as line wrapping.
pub fn decode_audio(data: &str) -> Result<Vec<u8>, ProxyError> {
    let data = data.trim();
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, b64)| b64)
            .ok_or_else(|| ProxyError::InvalidBody("audioData data URL is not base64".into()))?,
        None => data,
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    Ok(AUDIO_ENGINE.decode(compact)?)
}

/// Multipart file part for the decoded audio
fn audio_part(transcription: TranscriptionRequest, mime: &str) -> Result<Part, ProxyError> {
    Part::bytes(transcription.audio)
        .file_name(transcription.filename)
        .mime_str(mime)
        .map_err(|e| ProxyError::Internal(format!("invalid audio content type {mime:?}: {e}")))
}

/// Client for the OpenAI chat and transcription endpoints
#[derive(Clone)]
pub struct OpenAIService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    default_max_tokens: u32,
}

impl OpenAIService {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_key: settings.openai_api_key.clone(),
            base_url: settings.openai_base_url.trim_end_matches('/').to_string(),
            default_model: settings.openai_default_model.clone(),
            default_max_tokens: settings.default_max_tokens,
        }
    }

    /// Whether a credential is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, ProxyError> {
        self.api_key
            .as_deref()
            .ok_or(ProxyError::MissingCredential(OPENAI_API_KEY_VAR))
    }

    /// `POST /v1/chat/completions`
    pub async fn chat_completion(
        &self,
        request: &ProxyRequest,
    ) -> Result<UpstreamResponse, ProxyError> {
        let api_key = self.api_key()?;

        let body = ChatCompletionRequest {
            model: request.model_or(&self.default_model),
            max_tokens: request.max_tokens_or(self.default_max_tokens),
            messages: request.messages.as_ref(),
        };
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            url = %url,
            model = %body.model,
            max_tokens = %body.max_tokens,
            "Calling OpenAI chat completions API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        UpstreamResponse::from_reqwest(response).await
    }

    /// `POST /v1/audio/transcriptions`
    pub async fn transcribe(&self, request: &ProxyRequest) -> Result<UpstreamResponse, ProxyError> {
        let api_key = self.api_key()?;
        let transcription = Self::build_transcription(request)?;
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        tracing::debug!(
            url = %url,
            filename = %transcription.filename,
            audio_bytes = transcription.audio.len(),
            "Calling OpenAI transcription API"
        );

        let file = audio_part(transcription, AUDIO_MIME_TYPE)?;
        let form = Form::new()
            .part("file", file)
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        UpstreamResponse::from_reqwest(response).await
    }

    fn build_transcription(request: &ProxyRequest) -> Result<TranscriptionRequest, ProxyError> {
        let audio_data = request
            .audio_data
            .as_deref()
            .ok_or(ProxyError::MissingField("audioData"))?;

        let filename = request
            .filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_AUDIO_FILENAME)
            .to_string();

        Ok(TranscriptionRequest {
            audio: decode_audio(audio_data)?,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base_url: &str, api_key: Option<&str>) -> OpenAIService {
        let settings = Settings {
            openai_api_key: api_key.map(str::to_string),
            openai_base_url: base_url.to_string(),
            ..Settings::default()
        };
        OpenAIService::new(Client::new(), &settings)
    }

    fn request(body: serde_json::Value) -> ProxyRequest {
        serde_json::from_value(body).unwrap()
    }

    /// Bytes covering every value, including ones that are not valid UTF-8
    fn sample_audio() -> Vec<u8> {
        (0..=255u8).cycle().take(1000).collect()
    }

    #[test]
    fn test_decode_audio_round_trip() {
        let audio = sample_audio();
        let encoded = STANDARD.encode(&audio);
        assert_eq!(decode_audio(&encoded).unwrap(), audio);
    }

    #[test]
    fn test_decode_audio_lenient_input() {
        // "hello" without padding, wrapped across lines
        assert_eq!(decode_audio("aGVs\nbG8").unwrap(), b"hello");
        assert_eq!(decode_audio("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_audio("data:audio/webm;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_decode_audio_rejects_garbage() {
        assert!(matches!(
            decode_audio("not*base64!"),
            Err(ProxyError::AudioDecode(_))
        ));
        assert!(matches!(
            decode_audio("data:audio/webm,plain"),
            Err(ProxyError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_build_transcription_defaults_filename() {
        let transcription = OpenAIService::build_transcription(&request(json!({
            "provider": "openai-transcription",
            "audioData": "aGVsbG8="
        })))
        .unwrap();

        assert_eq!(transcription.filename, "audio.webm");
        assert_eq!(transcription.audio, b"hello");
    }

    #[test]
    fn test_build_transcription_requires_audio() {
        let err = OpenAIService::build_transcription(&request(json!({
            "provider": "openai-transcription"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "audioData is required");
    }

    #[test]
    fn test_audio_part_content_type() {
        let transcription = TranscriptionRequest {
            audio: b"hello".to_vec(),
            filename: "memo.webm".to_string(),
        };
        assert!(audio_part(transcription.clone(), AUDIO_MIME_TYPE).is_ok());

        let err = audio_part(transcription, "not a mime").unwrap_err();
        assert!(matches!(err, ProxyError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().starts_with("Upstream request failed"));
    }

    #[tokio::test]
    async fn test_chat_completion_uses_bearer_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = service(&mock_server.uri(), Some("sk-test"))
            .chat_completion(&request(json!({
                "provider": "openai",
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["choices"][0]["message"]["content"], "Hi");
    }

    #[tokio::test]
    async fn test_transcribe_sends_decoded_audio_as_multipart() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello world"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let audio = sample_audio();
        let response = service(&mock_server.uri(), Some("sk-test"))
            .transcribe(&request(json!({
                "provider": "openai-transcription",
                "audioData": STANDARD.encode(&audio),
                "filename": "memo.webm"
            })))
            .await
            .unwrap();

        assert_eq!(response.body["text"], "hello world");

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let upstream = &received[0];

        let content_type = upstream
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = &upstream.body;
        assert!(body.windows(audio.len()).any(|w| w == audio.as_slice()));

        let text = String::from_utf8_lossy(body);
        assert!(text.contains("name=\"file\"; filename=\"memo.webm\""));
        assert!(text.contains("Content-Type: audio/webm"));
        assert!(text.contains("name=\"model\""));
        assert!(text.contains("whisper-1"));
    }

    #[tokio::test]
    async fn test_missing_key_applies_to_both_endpoints() {
        let svc = service("http://127.0.0.1:9", None);
        assert!(!svc.is_configured());

        let chat_err = svc
            .chat_completion(&request(json!({"provider": "openai"})))
            .await
            .unwrap_err();
        assert_eq!(chat_err.to_string(), "OPENAI_API_KEY not configured");

        let stt_err = svc
            .transcribe(&request(json!({"provider": "openai-transcription", "audioData": "aGk="})))
            .await
            .unwrap_err();
        assert_eq!(stt_err.to_string(), "OPENAI_API_KEY not configured");
    }

    #[tokio::test]
    async fn test_non_json_upstream_body_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let err = service(&mock_server.uri(), Some("sk-test"))
            .chat_completion(&request(json!({"provider": "openai", "messages": []})))
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::UpstreamBody(_)));
    }
}
