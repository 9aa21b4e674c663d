//! Configuration constants.
//!
//! Limits and defaults used by the transaction engine.

/// Maximum number of redirects followed for one invocation.
/// Following one more than this is a fatal configuration error.
pub const MAX_REDIRECTS: usize = 10;

/// Default port for `http://` targets.
pub const HTTP_DEFAULT_PORT: u16 = 80;
/// Default port for `https://` targets.
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Hostname used when the target authority is a bare `:port`.
pub const DEFAULT_HOST: &str = "localhost";

/// User-Agent sent when the user supplies none with `-H`.
pub const DEFAULT_USER_AGENT: &str = concat!("httpstat/", env!("CARGO_PKG_VERSION"));

/// ALPN protocol offered during the TLS handshake.
/// Only HTTP/1.1 is spoken on the wire.
pub const ALPN_HTTP1: &[u8] = b"http/1.1";

/// Value of `-o` that selects printing the body instead of saving it.
pub const STDOUT_OUTPUT: &str = "-";
