//! Credential-injecting relay for Anthropic and OpenAI APIs

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use error::ProxyError;
pub use schemas::{Provider, ProxyRequest};
pub use server::App;
pub use services::ProviderDispatcher;
