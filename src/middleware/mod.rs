//! Middleware module
//!
//! Request logging and cross-origin handling.

pub mod cors;
pub mod logging;

pub use cors::{preflight, with_cors};
pub use logging::{log_request, TraceId, REQUEST_ID_HEADER, TRACE_ID_HEADER};
