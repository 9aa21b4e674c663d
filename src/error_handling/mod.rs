//! Error handling.
//!
//! Errors fall into two fatal classes that are kept apart for diagnostics:
//! - **Configuration** errors: the invocation itself is wrong (bad scheme,
//!   missing POST body, malformed header, redirect bound exceeded)
//! - **Transport** errors: something failed on the network or while moving
//!   bytes (resolution, connect, TLS, request write, response or body read)
//!
//! Neither is retried. [`HttpstatError`] wraps both plus initialization failures.

mod types;

// Re-export public API
pub use types::{ConfigError, HttpstatError, InitializationError, TransportError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let config: HttpstatError = ConfigError::MissingBody.into();
        assert!(config.is_config());
        assert!(!config.is_transport());

        let transport: HttpstatError = TransportError::NoAddresses {
            host: "example.invalid".to_string(),
        }
        .into();
        assert!(transport.is_transport());
        assert!(!transport.is_config());
    }

    #[test]
    fn test_redirect_bound_is_config_class() {
        let err: HttpstatError = ConfigError::TooManyRedirects(10).into();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "configuration error: maximum number of redirects (10) followed"
        );
    }
}
