//! Application settings
//!
//! Settings are read once at startup from the process environment (and an
//! optional `.env` file) and then passed explicitly to everything that needs
//! them. Provider credentials live here and nowhere else.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the Anthropic credential
pub const CLAUDE_API_KEY_VAR: &str = "CLAUDE_API_KEY";

/// Environment variable holding the OpenAI credential
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// 32 MiB: a 25 MB audio upload grows by a third when base64 encoded
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!(
                "Invalid environment: {}. Expected: development, staging, or production",
                s
            ),
        }
    }
}

/// Main application settings
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,

    // Provider credentials
    #[serde(skip_serializing)]
    pub claude_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    // Upstream endpoints
    pub anthropic_base_url: String,
    pub openai_base_url: String,
    pub anthropic_version: String,

    // Request defaults
    pub claude_default_model: String,
    pub openai_default_model: String,
    pub default_max_tokens: u32,

    /// Client-level timeout for upstream calls. Unset means no deadline.
    pub upstream_timeout_seconds: Option<u64>,
}

impl Settings {
    /// Load settings from environment variables with defaults
    ///
    /// Values are parsed but not validated; call [`Settings::validate`] once
    /// command-line overrides have been applied.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = Self::default();

        Ok(Self {
            app_name: get("APP_NAME", &defaults.app_name),
            app_version: defaults.app_version,
            environment: lookup("ENVIRONMENT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            log_level: get("LOG_LEVEL", &defaults.log_level),

            host: get("HOST", &defaults.host),
            port: get("PORT", "8000").parse().context("Invalid PORT value")?,
            max_body_bytes: match lookup("MAX_BODY_BYTES") {
                Some(v) => v.parse().context("Invalid MAX_BODY_BYTES value")?,
                None => DEFAULT_MAX_BODY_BYTES,
            },

            // Empty strings count as unset
            claude_api_key: lookup(CLAUDE_API_KEY_VAR).filter(|k| !k.is_empty()),
            openai_api_key: lookup(OPENAI_API_KEY_VAR).filter(|k| !k.is_empty()),

            anthropic_base_url: get("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
            openai_base_url: get("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            anthropic_version: get("ANTHROPIC_VERSION", DEFAULT_ANTHROPIC_VERSION),

            claude_default_model: get("CLAUDE_DEFAULT_MODEL", DEFAULT_CLAUDE_MODEL),
            openai_default_model: get("OPENAI_DEFAULT_MODEL", DEFAULT_OPENAI_MODEL),
            default_max_tokens: match lookup("DEFAULT_MAX_TOKENS") {
                Some(v) => v.parse().context("Invalid DEFAULT_MAX_TOKENS value")?,
                None => DEFAULT_MAX_TOKENS,
            },

            upstream_timeout_seconds: match lookup("UPSTREAM_TIMEOUT_SECONDS") {
                Some(v) => Some(v.parse().context("Invalid UPSTREAM_TIMEOUT_SECONDS value")?),
                None => None,
            },
        })
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }
        if self.default_max_tokens == 0 {
            anyhow::bail!("DEFAULT_MAX_TOKENS must be > 0");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        if self.upstream_timeout_seconds == Some(0) {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be > 0 when set");
        }

        if self.claude_api_key.is_none() {
            tracing::warn!("{} is not set; claude requests will fail", CLAUDE_API_KEY_VAR);
        }
        if self.openai_api_key.is_none() {
            tracing::warn!(
                "{} is not set; openai and openai-transcription requests will fail",
                OPENAI_API_KEY_VAR
            );
        }

        Ok(())
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "ai-proxy".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            claude_api_key: None,
            openai_api_key: None,
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            claude_default_model: DEFAULT_CLAUDE_MODEL.to_string(),
            openai_default_model: DEFAULT_OPENAI_MODEL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            upstream_timeout_seconds: None,
        }
    }
}

// Credentials must never reach a log line, so Debug is written by hand.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("claude_api_key", &mask(&self.claude_api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_version", &self.anthropic_version)
            .field("claude_default_model", &self.claude_default_model)
            .field("openai_default_model", &self.openai_default_model)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("upstream_timeout_seconds", &self.upstream_timeout_seconds)
            .finish()
    }
}

fn mask(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}
