//! Hop report rendering.
//!
//! Each hop renders as: connected address, status line, sorted headers,
//! optional body-disposition message, a blank line, then the phase timeline.

mod headers;
mod style;
mod timeline;

use log::warn;

use crate::fetch::HopReport;

// Re-export public API
pub use headers::{canonical_header_name, compare_header_names, is_hop_by_hop, sorted_headers};
pub use style::Style;
pub use timeline::render_timeline;

/// Renders one hop for the terminal.
pub fn render_hop(hop: &HopReport, style: Style) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&style.green("Connected to "));
    out.push_str(&style.cyan(&hop.remote_addr.to_string()));
    out.push('\n');

    out.push('\n');
    out.push_str(&style.green("HTTP"));
    out.push_str(&style.gray(14, "/"));
    out.push_str(&style.cyan(&format!(
        "{} {}",
        hop.response.protocol(),
        hop.response.status_text()
    )));
    out.push('\n');

    for (name, value) in sorted_headers(&hop.response.headers) {
        out.push_str(&style.gray(14, &format!("{name}:")));
        out.push(' ');
        out.push_str(&style.cyan(&value));
        out.push('\n');
    }

    if let Some(message) = hop.body_message.as_deref().filter(|m| !m.is_empty()) {
        out.push('\n');
        out.push_str(&style.cyan(message));
        out.push('\n');
    }

    out.push('\n');
    match render_timeline(&hop.trace, style) {
        Some(timeline) => out.push_str(&timeline),
        None => warn!("Incomplete timing trace for {}", hop.url),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ResponseSummary;
    use crate::trace::TimingTrace;
    use http::header::{CONNECTION, CONTENT_TYPE, SERVER};
    use http::{HeaderMap, HeaderValue, StatusCode, Version};
    use std::time::{Duration, Instant};
    use url::Url;

    fn hop(body_message: Option<&str>) -> HopReport {
        let base = Instant::now();
        let at = |ms: u64| Some(base + Duration::from_millis(ms));
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(SERVER, HeaderValue::from_static("nginx"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        HopReport {
            url: Url::parse("http://127.0.0.1:8080/").unwrap(),
            remote_addr: "127.0.0.1:8080".parse().unwrap(),
            response: ResponseSummary {
                version: Version::HTTP_11,
                status: StatusCode::OK,
                reason: "OK".to_string(),
                headers,
            },
            body_message: body_message.map(str::to_string),
            trace: TimingTrace {
                dns_start: at(0),
                dns_done: at(0),
                connect_done: at(1),
                tls_done: None,
                request_written: at(1),
                first_response_byte: at(3),
                body_done: at(4),
            },
        }
    }

    #[test]
    fn test_render_hop_layout() {
        let rendered = render_hop(&hop(Some("Body discarded")), Style::plain());
        let head: Vec<&str> = rendered.lines().take(10).collect();
        assert_eq!(
            head,
            vec![
                "",
                "Connected to 127.0.0.1:8080",
                "",
                "HTTP/1.1 200 OK",
                "Server: nginx",
                "Content-Type: text/plain",
                "Connection: keep-alive",
                "",
                "Body discarded",
                "",
            ]
        );
        assert!(rendered.contains("starttransfer:3ms"));
        assert!(!rendered.contains("pretransfer"));
    }

    #[test]
    fn test_render_hop_without_body_message() {
        let rendered = render_hop(&hop(None), Style::plain());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[6], "Connection: keep-alive");
        assert_eq!(lines[7], "");
        assert!(lines[8].contains("DNS Lookup"));
    }
}
