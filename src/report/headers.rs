//! Response header ordering for display.

use std::cmp::Ordering;

use http::HeaderMap;

use crate::config::{HEADER_SERVER, HOP_BY_HOP_HEADERS};

/// Canonical `Title-Case` form of a header name (`content-type` → `Content-Type`).
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// True for the fixed set of hop-by-hop headers, compared case-insensitively.
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Display order: `Server` first, then end-to-end headers, then hop-by-hop
/// headers, each partition sorted by name.
pub fn compare_header_names(a: &str, b: &str) -> Ordering {
    let is_server = |n: &str| n.eq_ignore_ascii_case(HEADER_SERVER);
    match (is_server(a), is_server(b)) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    is_hop_by_hop(a)
        .cmp(&is_hop_by_hop(b))
        .then_with(|| a.cmp(b))
}

/// Header names in display order, each paired with its values joined by `,`.
pub fn sorted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            (canonical_header_name(name.as_str()), values)
        })
        .collect();

    entries.sort_by(|(a, _), (b, _)| compare_header_names(a, b));
    entries
}
