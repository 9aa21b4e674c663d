//! Per-hop results handed to the caller.

use std::net::SocketAddr;

use http::response::Parts;
use http::{HeaderMap, StatusCode, Version};
use url::Url;

use crate::trace::TimingTrace;

/// Status line and headers of one response.
#[derive(Debug, Clone)]
pub struct ResponseSummary {
    /// Protocol version of the status line
    pub version: Version,
    /// Status code
    pub status: StatusCode,
    /// Reason phrase as sent by the server, or the canonical one
    pub reason: String,
    /// Response headers
    pub headers: HeaderMap,
}

impl ResponseSummary {
    pub(crate) fn from_parts(parts: &Parts) -> Self {
        let reason = parts
            .extensions
            .get::<hyper::ext::ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned())
            .or_else(|| parts.status.canonical_reason().map(str::to_string))
            .unwrap_or_default();

        Self {
            version: parts.version,
            status: parts.status,
            reason,
            headers: parts.headers.clone(),
        }
    }

    /// `major.minor` protocol version, e.g. `1.1`.
    pub fn protocol(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_11 => "1.1",
            Version::HTTP_2 => "2.0",
            Version::HTTP_3 => "3.0",
            _ => "?",
        }
    }

    /// `200 OK`
    pub fn status_text(&self) -> String {
        if self.reason.is_empty() {
            self.status.as_str().to_string()
        } else {
            format!("{} {}", self.status.as_str(), self.reason)
        }
    }
}

/// Everything reported for one hop.
#[derive(Debug, Clone)]
pub struct HopReport {
    /// URL visited on this hop
    pub url: Url,
    /// Address the connection was made to
    pub remote_addr: SocketAddr,
    /// Status line and headers
    pub response: ResponseSummary,
    /// Body-disposition message, `None` when no body was read
    pub body_message: Option<String>,
    /// Lifecycle timestamps of this hop
    pub trace: TimingTrace,
}

impl HopReport {
    /// True for https hops.
    pub fn is_tls(&self) -> bool {
        self.url.scheme() == "https"
    }
}
