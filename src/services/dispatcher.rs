//! Provider dispatcher
//!
//! Routes a parsed [`ProxyRequest`] to exactly one upstream adapter.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::Settings;
use crate::error::ProxyError;
use crate::schemas::{Provider, ProxyRequest};
use crate::services::anthropic::AnthropicService;
use crate::services::openai::OpenAIService;
use crate::services::upstream::UpstreamResponse;

/// Which provider credentials are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub claude: bool,
    pub openai: bool,
}

#[derive(Clone)]
pub struct ProviderDispatcher {
    anthropic: AnthropicService,
    openai: OpenAIService,
}

impl ProviderDispatcher {
    /// Build the adapters around a shared HTTP client
    pub fn new(settings: &Settings, client: Client) -> Self {
        Self {
            anthropic: AnthropicService::new(client.clone(), settings),
            openai: OpenAIService::new(client, settings),
        }
    }

    /// Build the adapters with a client configured from `settings`
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = settings.upstream_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::new(settings, builder.build()?))
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            claude: self.anthropic.is_configured(),
            openai: self.openai.is_configured(),
        }
    }

    /// Forward `request` to the adapter named by its discriminator
    pub async fn dispatch(&self, request: &ProxyRequest) -> Result<UpstreamResponse, ProxyError> {
        let provider = request.provider()?;

        tracing::debug!(provider = %provider, "Dispatching proxy request");

        let response = match provider {
            Provider::Claude => self.anthropic.create_message(request).await?,
            Provider::OpenAI => self.openai.chat_completion(request).await?,
            Provider::OpenAITranscription => self.openai.transcribe(request).await?,
        };

        tracing::info!(
            provider = %provider,
            upstream_status = %response.status.as_u16(),
            "Upstream call completed"
        );

        Ok(response)
    }
}
