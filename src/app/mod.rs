//! Main application modules.
//!
//! This module provides target URL normalization used before a transaction starts.

pub mod url;

// Re-export public API
pub use url::parse_target;
