//! Request schemas
//!
//! The inbound proxy body and the outbound bodies of each upstream API.

pub mod anthropic;
pub mod openai;
pub mod proxy;

pub use proxy::{Provider, ProxyRequest};
