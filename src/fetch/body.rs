//! Response body disposition.
//!
//! Decides once per response whether the body is discarded, displayed or
//! saved, then consumes it accordingly.

use std::path::{Path, PathBuf};

use http::HeaderMap;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use log::debug;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::config::{OutputTarget, HEADER_CONTENT_DISPOSITION};
use crate::error_handling::{ConfigError, TransportError};

/// What happens to one response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// Read and throw away
    Discard,
    /// Keep in memory and show after the headers
    Display,
    /// Write to a file
    SaveToFile(PathBuf),
}

impl ResponseDisposition {
    /// Resolves the configured output policy against one response.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoRemoteFilename` for `-O` when neither
    /// `Content-Disposition` nor the URL path yields a filename.
    pub fn resolve(output: &OutputTarget, headers: &HeaderMap, url: &Url) -> Result<Self, ConfigError> {
        Ok(match output {
            OutputTarget::Discard => ResponseDisposition::Discard,
            OutputTarget::Stdout => ResponseDisposition::Display,
            OutputTarget::File(path) => ResponseDisposition::SaveToFile(path.clone()),
            OutputTarget::RemoteName => {
                let name = headers
                    .get(HEADER_CONTENT_DISPOSITION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(filename_from_content_disposition)
                    .or_else(|| filename_from_url(url))
                    .ok_or(ConfigError::NoRemoteFilename)?;
                ResponseDisposition::SaveToFile(PathBuf::from(name))
            }
        })
    }
}

/// Extracts `filename` from an `attachment` Content-Disposition value.
///
/// Directory components are stripped so a server cannot choose where the
/// file lands.
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    let mut parts = value.split(';');
    let disposition = parts.next()?.trim();
    if !disposition.eq_ignore_ascii_case("attachment") {
        return None;
    }

    parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, raw)| unquote(raw.trim()))
        .and_then(|name| base_name(&name))
}

/// Last non-empty segment of the URL path, or `None` for `/`.
pub fn filename_from_url(url: &Url) -> Option<String> {
    base_name(url.path())
}

fn base_name(path: &str) -> Option<String> {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .filter(|segment| *segment != "." && *segment != "..")
        .map(str::to_string)
}

/// Removes surrounding quotes and backslash escapes from a quoted-string.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

enum BodySink {
    Discard,
    Buffer(Vec<u8>),
    File(tokio::fs::File, PathBuf),
}

impl BodySink {
    async fn open(disposition: &ResponseDisposition) -> Result<Self, TransportError> {
        Ok(match disposition {
            ResponseDisposition::Discard => BodySink::Discard,
            ResponseDisposition::Display => BodySink::Buffer(Vec::new()),
            ResponseDisposition::SaveToFile(path) => {
                let file = tokio::fs::File::create(path)
                    .await
                    .map_err(|source| write_error(path, source))?;
                BodySink::File(file, path.clone())
            }
        })
    }

    async fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        match self {
            BodySink::Discard => Ok(()),
            BodySink::Buffer(buf) => {
                buf.extend_from_slice(chunk);
                Ok(())
            }
            BodySink::File(file, path) => file
                .write_all(chunk)
                .await
                .map_err(|source| write_error(path, source)),
        }
    }

    /// Flushes and returns the user-facing message for this disposition.
    async fn finish(self) -> Result<String, TransportError> {
        match self {
            BodySink::Discard => Ok("Body discarded".to_string()),
            BodySink::Buffer(buf) => Ok(String::from_utf8_lossy(&buf).into_owned()),
            BodySink::File(mut file, path) => {
                file.flush().await.map_err(|source| write_error(&path, source))?;
                Ok(format!("Body read into {}", path.display()))
            }
        }
    }
}

fn write_error(path: &Path, source: std::io::Error) -> TransportError {
    TransportError::BodyWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads `body` to the end into the sink chosen by `disposition`.
///
/// Returns the body-disposition message shown after the headers. Any open
/// file is closed on every return path.
pub(crate) async fn consume(
    mut body: Incoming,
    disposition: &ResponseDisposition,
) -> Result<String, TransportError> {
    let mut sink = BodySink::open(disposition).await?;
    let mut total = 0usize;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(TransportError::BodyRead)?;
        if let Some(chunk) = frame.data_ref() {
            total += chunk.len();
            sink.write(chunk).await?;
        }
    }
    debug!("Consumed {total} body bytes ({disposition:?})");

    sink.finish().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_content_disposition_attachment() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename=\"report.pdf\""),
            Some("report.pdf".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("Attachment;filename=data.csv"),
            Some("data.csv".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=\"a \\\"quoted\\\" name.txt\""),
            Some("a \"quoted\" name.txt".to_string())
        );
    }

    #[test]
    fn test_content_disposition_ignored_unless_attachment() {
        assert_eq!(filename_from_content_disposition("inline; filename=page.html"), None);
        assert_eq!(filename_from_content_disposition("attachment"), None);
    }

    #[test]
    fn test_content_disposition_strips_directories() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename=\"../../etc/passwd\""),
            Some("passwd".to_string())
        );
        assert_eq!(filename_from_content_disposition("attachment; filename=\"..\""), None);
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url(&url("http://x/dir/file.tar.gz?v=1")), Some("file.tar.gz".to_string()));
        assert_eq!(filename_from_url(&url("http://x/dir/")), Some("dir".to_string()));
        assert_eq!(filename_from_url(&url("http://x/")), None);
    }

    #[test]
    fn test_resolve_remote_name_prefers_content_disposition() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-disposition",
            HeaderValue::from_static("attachment; filename=\"served.bin\""),
        );
        let disposition =
            ResponseDisposition::resolve(&OutputTarget::RemoteName, &headers, &url("http://x/path/file.bin")).unwrap();
        assert_eq!(disposition, ResponseDisposition::SaveToFile(PathBuf::from("served.bin")));

        let disposition =
            ResponseDisposition::resolve(&OutputTarget::RemoteName, &HeaderMap::new(), &url("http://x/path/file.bin"))
                .unwrap();
        assert_eq!(disposition, ResponseDisposition::SaveToFile(PathBuf::from("file.bin")));
    }

    #[test]
    fn test_resolve_remote_name_without_filename() {
        let err = ResponseDisposition::resolve(&OutputTarget::RemoteName, &HeaderMap::new(), &url("http://x/"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoRemoteFilename));
    }

    #[test]
    fn test_resolve_simple_targets() {
        let headers = HeaderMap::new();
        let u = url("http://x/");
        assert_eq!(
            ResponseDisposition::resolve(&OutputTarget::Discard, &headers, &u).unwrap(),
            ResponseDisposition::Discard
        );
        assert_eq!(
            ResponseDisposition::resolve(&OutputTarget::Stdout, &headers, &u).unwrap(),
            ResponseDisposition::Display
        );
        assert_eq!(
            ResponseDisposition::resolve(&OutputTarget::File("out".into()), &headers, &u).unwrap(),
            ResponseDisposition::SaveToFile(PathBuf::from("out"))
        );
    }
}
