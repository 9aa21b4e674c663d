//! HTTP header name constants.
//!
//! Used when building requests and when ordering response headers for display.

/// Server header, always displayed first
pub const HEADER_SERVER: &str = "Server";
/// Content-Disposition header, consulted by `-O`
pub const HEADER_CONTENT_DISPOSITION: &str = "Content-Disposition";

// Hop-by-hop headers (RFC 2616 section 13.5.1)
// These sort after all end-to-end headers
/// Connection header
pub const HEADER_CONNECTION: &str = "Connection";
/// Keep-Alive header
pub const HEADER_KEEP_ALIVE: &str = "Keep-Alive";
/// Proxy-Authenticate header
pub const HEADER_PROXY_AUTHENTICATE: &str = "Proxy-Authenticate";
/// Proxy-Authorization header
pub const HEADER_PROXY_AUTHORIZATION: &str = "Proxy-Authorization";
/// TE header
pub const HEADER_TE: &str = "TE";
/// Trailers header
pub const HEADER_TRAILERS: &str = "Trailers";
/// Transfer-Encoding header
pub const HEADER_TRANSFER_ENCODING: &str = "Transfer-Encoding";
/// Upgrade header
pub const HEADER_UPGRADE: &str = "Upgrade";

/// Headers that are meaningful only for a single transport-level connection.
/// Compared case-insensitively.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    HEADER_CONNECTION,
    HEADER_KEEP_ALIVE,
    HEADER_PROXY_AUTHENTICATE,
    HEADER_PROXY_AUTHORIZATION,
    HEADER_TE,
    HEADER_TRAILERS,
    HEADER_TRANSFER_ENCODING,
    HEADER_UPGRADE,
];
