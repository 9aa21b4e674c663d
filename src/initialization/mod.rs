//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the resources one invocation
//! needs:
//! - Logger
//! - DNS resolver
//! - Crypto provider and TLS client configuration
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod resolver;
mod tls;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;
pub use tls::init_tls_config;

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called before
/// any TLS connections are established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
