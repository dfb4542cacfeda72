//! Anthropic adapter
//!
//! Forwards chat requests to the Messages API with the server-held key.

use reqwest::Client;

use crate::config::{Settings, CLAUDE_API_KEY_VAR};
use crate::error::ProxyError;
use crate::schemas::anthropic::MessagesRequest;
use crate::schemas::ProxyRequest;
use crate::services::upstream::UpstreamResponse;

/// Client for `POST /v1/messages`
#[derive(Clone)]
pub struct AnthropicService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    version: String,
    default_model: String,
    default_max_tokens: u32,
}

impl AnthropicService {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_key: settings.claude_api_key.clone(),
            base_url: settings.anthropic_base_url.trim_end_matches('/').to_string(),
            version: settings.anthropic_version.clone(),
            default_model: settings.claude_default_model.clone(),
            default_max_tokens: settings.default_max_tokens,
        }
    }

    /// Whether a credential is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    pub async fn create_message(
        &self,
        request: &ProxyRequest,
    ) -> Result<UpstreamResponse, ProxyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingCredential(CLAUDE_API_KEY_VAR))?;

        let body = MessagesRequest {
            model: request.model_or(&self.default_model),
            max_tokens: request.max_tokens_or(self.default_max_tokens),
            messages: request.messages.as_ref(),
        };
        let url = self.messages_url();

        tracing::debug!(
            url = %url,
            model = %body.model,
            max_tokens = %body.max_tokens,
            "Calling Anthropic messages API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.version)
            .json(&body)
            .send()
            .await?;

        UpstreamResponse::from_reqwest(response).await
    }
}
