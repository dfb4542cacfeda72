//! Upstream provider services
//!
//! One adapter per upstream API plus the dispatcher that picks between them.

pub mod anthropic;
pub mod dispatcher;
pub mod openai;
pub mod upstream;

pub use anthropic::AnthropicService;
pub use dispatcher::{ProviderDispatcher, ProviderStatus};
pub use openai::{decode_audio, OpenAIService};
pub use upstream::UpstreamResponse;
