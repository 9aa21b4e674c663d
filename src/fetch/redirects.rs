//! HTTP redirect policy.
//!
//! Redirects are followed manually, one hop at a time, so every hop gets its
//! own connection and its own timing trace.

use http::header::LOCATION;
use http::{HeaderMap, StatusCode};
use log::{debug, warn};
use url::Url;

use crate::error_handling::{ConfigError, TransportError};

/// Bounded count of redirects followed during one invocation.
#[derive(Debug, Clone)]
pub struct RedirectState {
    followed: usize,
    max: usize,
}

impl RedirectState {
    /// Allows up to `max` followed redirects.
    pub fn new(max: usize) -> Self {
        Self { followed: 0, max }
    }

    /// Number of redirects followed so far.
    pub fn followed(&self) -> usize {
        self.followed
    }

    /// Counts one more redirect.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManyRedirects` once the count would exceed the bound.
    pub fn record(&mut self) -> Result<(), ConfigError> {
        self.followed += 1;
        if self.followed > self.max {
            return Err(ConfigError::TooManyRedirects(self.max));
        }
        Ok(())
    }
}

/// True for any 3xx status.
pub fn is_redirect(status: StatusCode) -> bool {
    status.is_redirection()
}

/// Resolves the `Location` header against the current URL.
///
/// Returns `Ok(None)` when there is no (or an empty) `Location`: the chain
/// simply ends there.
///
/// # Errors
///
/// Returns `TransportError::InvalidLocation` when a `Location` is present but
/// cannot be turned into an absolute URL.
pub fn redirect_target(current: &Url, headers: &HeaderMap) -> Result<Option<Url>, TransportError> {
    let Some(value) = headers.get(LOCATION) else {
        warn!("Redirect from {current} without a Location header, stopping");
        return Ok(None);
    };

    let location = value.to_str().map_err(|e| TransportError::InvalidLocation {
        location: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        reason: e.to_string(),
    })?;
    let location = location.trim();
    if location.is_empty() {
        warn!("Redirect from {current} with an empty Location header, stopping");
        return Ok(None);
    }

    let next = current
        .join(location)
        .map_err(|e| TransportError::InvalidLocation {
            location: location.to_string(),
            reason: e.to_string(),
        })?;
    debug!("Redirect {current} -> {next}");
    Ok(Some(next))
}
