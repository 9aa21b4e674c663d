//! HTTP request specification and wire request building.

use std::path::PathBuf;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HOST, USER_AGENT};
use http::{HeaderName, HeaderValue, Method, Request, Uri};
use http_body_util::Full;
use url::Url;

use crate::config::DEFAULT_USER_AGENT;
use crate::error_handling::ConfigError;

/// Where the request body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// `-d payload`
    Literal(Bytes),
    /// `-d @file`: the file's verbatim contents
    File(PathBuf),
}

impl BodySource {
    /// Interprets a `-d` value. An empty value means no body.
    pub fn parse(data: &str) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(match data.strip_prefix('@') {
            Some(path) => BodySource::File(PathBuf::from(path)),
            None => BodySource::Literal(Bytes::copy_from_slice(data.as_bytes())),
        })
    }

    /// Loads the body bytes. Files are read once per invocation, before any
    /// network activity, and the same bytes are sent on every hop.
    pub async fn load(&self) -> Result<Bytes, ConfigError> {
        match self {
            BodySource::Literal(bytes) => Ok(bytes.clone()),
            BodySource::File(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|source| ConfigError::DataFile {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Method, headers and body for every hop of one invocation.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// Method sent on the wire
    pub method: Method,
    /// User headers in the order given; duplicates are kept
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// `Host` override; replaces the host taken from the URL
    pub host: Option<HeaderValue>,
    /// Optional request body
    pub body: Option<BodySource>,
}

impl RequestSpec {
    /// Builds the request from the `-X`, `-I`, `-H` and `-d` flags.
    ///
    /// `head_only` wins over any user method.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an invalid method token or a malformed header.
    pub fn from_flags(
        method: &str,
        head_only: bool,
        raw_headers: &[String],
        data: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let method = if head_only {
            Method::HEAD
        } else {
            Method::from_bytes(method.as_bytes())
                .map_err(|_| ConfigError::InvalidMethod(method.to_string()))?
        };

        let mut spec = RequestSpec {
            method,
            body: data.and_then(BodySource::parse),
            ..Default::default()
        };
        for raw in raw_headers {
            let (name, value) = parse_header(raw)?;
            if name == HOST {
                spec.host = Some(value);
            } else {
                spec.headers.push((name, value));
            }
        }
        Ok(spec)
    }

    /// True for methods that must carry a body.
    pub fn requires_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }

    /// Checks that POST and PUT carry a body.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requires_body() && self.body.is_none() {
            return Err(ConfigError::MissingBody);
        }
        Ok(())
    }

    fn has_header(&self, name: &HeaderName) -> bool {
        self.headers.iter().any(|(n, _)| n == name)
    }
}

/// Splits a `-H` value of the form `Name: value`.
///
/// Spaces before the colon and spaces or colons after it are trimmed.
///
/// # Errors
///
/// Returns `ConfigError::MalformedHeader` when there is no `:` and
/// `ConfigError::InvalidHeader` when the HTTP layer rejects the name or value.
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::MalformedHeader(raw.to_string()))?;
    let name = name.trim_end_matches(' ');
    let value = value.trim_start_matches([' ', ':']);

    let invalid = |reason: String| ConfigError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}

/// `host[:port]` as it belongs in the `Host` header; default ports are omitted.
fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Builds the origin-form request for one hop.
pub(crate) fn build_request(
    spec: &RequestSpec,
    url: &Url,
    body: Bytes,
) -> Result<Request<Full<Bytes>>, ConfigError> {
    let target = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let uri: Uri = target
        .parse()
        .map_err(|e: http::uri::InvalidUri| ConfigError::InvalidRequestTarget {
            target: target.clone(),
            reason: e.to_string(),
        })?;

    let host = match &spec.host {
        Some(host) => host.clone(),
        None => {
            let authority = authority(url);
            HeaderValue::from_str(&authority).map_err(|e| ConfigError::InvalidHeader {
                name: HOST.to_string(),
                reason: e.to_string(),
            })?
        }
    };

    let body_len = body.len();
    let mut request = Request::new(Full::new(body));
    *request.method_mut() = spec.method.clone();
    *request.uri_mut() = uri;

    let headers = request.headers_mut();
    headers.insert(HOST, host);
    for (name, value) in &spec.headers {
        headers.append(name.clone(), value.clone());
    }
    if !spec.has_header(&USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    if body_len > 0 && !spec.has_header(&CONTENT_LENGTH) {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body_len));
    }

    Ok(request)
}
