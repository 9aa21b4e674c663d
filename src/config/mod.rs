//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (redirect bound, default ports, user agent)
//! - HTTP header name constants used when ordering response headers
//! - CLI option types and their conversion into an immutable [`Config`]

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel, Opt, OutputTarget};
