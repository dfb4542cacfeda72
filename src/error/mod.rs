mod types;

pub use types::{ErrorResponse, ProxyError};
