//! Target URL validation and normalization.

use std::borrow::Cow;

use log::debug;
use url::Url;

use crate::config::{DEFAULT_HOST, HTTP_DEFAULT_PORT};
use crate::error_handling::ConfigError;

/// Parses the positional URL argument into an absolute `http`/`https` URL.
///
/// Accepts:
/// - absolute URLs (`https://example.com/path`)
/// - scheme-relative URLs (`//localhost:8080/test`)
/// - bare authorities (`localhost:8080/test`, `example.com`)
///
/// When no scheme is given it is inferred from the port: `http` for port 80,
/// `https` for anything else (including no port at all). An authority that is
/// only `:port` targets `localhost`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` if the result does not parse and
/// `ConfigError::UnsupportedScheme` for schemes other than http/https.
pub fn parse_target(raw: &str) -> Result<Url, ConfigError> {
    let normalized = match raw.split_once("://") {
        Some((scheme, rest)) => format!("{scheme}://{}", with_default_host(rest)),
        None => {
            let rest = with_default_host(raw.strip_prefix("//").unwrap_or(raw));
            let scheme = if authority_port(&rest) == Some(HTTP_DEFAULT_PORT) {
                "http"
            } else {
                "https"
            };
            format!("{scheme}://{rest}")
        }
    };

    let url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => {
            debug!("Normalized target {raw:?} to {url}");
            Ok(url)
        }
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn with_default_host(rest: &str) -> Cow<'_, str> {
    if rest.starts_with(':') {
        Cow::Owned(format!("{DEFAULT_HOST}{rest}"))
    } else {
        Cow::Borrowed(rest)
    }
}

/// Extracts an explicit numeric port from the authority part of `rest`.
fn authority_port(rest: &str) -> Option<u16> {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    // a closing bracket last means an IPv6 literal without a port
    if host_port.ends_with(']') {
        return None;
    }
    host_port.rsplit_once(':')?.1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_target(input: &str, scheme: &str, host: &str, port: u16, path: &str) {
        let url = parse_target(input).unwrap_or_else(|e| panic!("{input}: {e}"));
        assert_eq!(url.scheme(), scheme, "scheme for {input}");
        assert_eq!(url.host_str(), Some(host), "host for {input}");
        assert_eq!(url.port_or_known_default(), Some(port), "port for {input}");
        assert_eq!(url.path(), path, "path for {input}");
    }

    #[test]
    fn test_absolute_urls_preserved() {
        assert_target("https://golang.org", "https", "golang.org", 443, "/");
        assert_target("https://golang.org:443/test", "https", "golang.org", 443, "/test");
        assert_target("http://example.com:8080/a?b=c", "http", "example.com", 8080, "/a");
    }

    #[test]
    fn test_bare_host_port_infers_scheme() {
        assert_eq!(
            parse_target("localhost:8080/test").unwrap().as_str(),
            "https://localhost:8080/test"
        );
        assert_target("localhost:80/test", "http", "localhost", 80, "/test");
    }

    #[test]
    fn test_scheme_relative_infers_scheme() {
        assert_eq!(
            parse_target("//localhost:8080/test").unwrap().as_str(),
            "https://localhost:8080/test"
        );
        assert_target("//localhost:80/test", "http", "localhost", 80, "/test");
    }

    #[test]
    fn test_bare_host_without_port_is_https() {
        assert_target("example.com", "https", "example.com", 443, "/");
    }

    #[test]
    fn test_bare_port_implies_localhost() {
        assert_target(":8080/x", "https", "localhost", 8080, "/x");
        assert_target("http://:9000/", "http", "localhost", 9000, "/");
    }

    #[test]
    fn test_ipv6_literal() {
        assert_target("[::1]:80/", "http", "[::1]", 80, "/");
        assert_target("[::1]/", "https", "[::1]", 443, "/");
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = parse_target("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_unparseable_url() {
        let err = parse_target("http://exa mple.com/").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
