//! Name resolution, TCP connect and the conditional TLS handshake.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::task::{Context, Poll};

use hickory_resolver::TokioAsyncResolver;
use log::debug;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::config::{DEFAULT_HOST, HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};
use crate::error_handling::{ConfigError, TransportError};
use crate::trace::PhaseObserver;

/// Where one hop connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP literal (no brackets), used for DNS and SNI
    pub host: String,
    /// Explicit port, or the scheme default
    pub port: u16,
    /// Whether a TLS handshake follows the TCP connect
    pub tls: bool,
}

impl Endpoint {
    /// Splits scheme, host and port out of `url`, applying default ports.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedScheme` for anything but http/https.
    pub fn from_url(url: &Url) -> Result<Self, ConfigError> {
        let tls = match url.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };
        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            _ => DEFAULT_HOST.to_string(),
        };
        // http and https always have a known default
        let port = url.port_or_known_default().unwrap_or(if tls {
            HTTPS_DEFAULT_PORT
        } else {
            HTTP_DEFAULT_PORT
        });
        Ok(Self { host, port, tls })
    }
}

/// A connected stream, TLS-wrapped for https.
pub enum MaybeTlsStream {
    /// http
    Plain(TcpStream),
    /// https, handshake already complete
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_write_vectored(cx, bufs),
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_write_vectored(cx, bufs),
        }
    }

    fn is_write_vectored(&self) -> bool {
        match self {
            MaybeTlsStream::Plain(s) => s.is_write_vectored(),
            MaybeTlsStream::Tls(s) => s.is_write_vectored(),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_flush(cx),
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Resolves, dials and (for https) handshakes, firing the connection-setup
/// hooks on `observer` at each boundary.
///
/// Returns the stream and the address it is connected to.
pub(crate) async fn connect(
    resolver: &TokioAsyncResolver,
    connector: &TlsConnector,
    endpoint: &Endpoint,
    observer: &dyn PhaseObserver,
) -> Result<(MaybeTlsStream, SocketAddr), TransportError> {
    observer.on_resolve_start();
    let addrs = resolve(resolver, endpoint).await?;
    observer.on_resolve_done();
    debug!("Resolved {} to {:?}", endpoint.host, addrs);

    let (tcp, remote_addr) = match dial(&addrs).await {
        Ok(connected) => {
            observer.on_connect_done(Ok(()));
            connected
        }
        Err((addr, source)) => {
            observer.on_connect_done(Err(&source));
            return Err(TransportError::Connect {
                addr: addr.to_string(),
                source,
            });
        }
    };
    debug!("Connected to {remote_addr}");

    if !endpoint.tls {
        return Ok((MaybeTlsStream::Plain(tcp), remote_addr));
    }

    let server_name =
        ServerName::try_from(endpoint.host.clone()).map_err(|_| TransportError::InvalidServerName {
            host: endpoint.host.clone(),
        })?;
    match connector.connect(server_name, tcp).await {
        Ok(stream) => {
            observer.on_tls_handshake_done(Ok(()));
            let (_, session) = stream.get_ref();
            debug!(
                "TLS handshake with {} complete: {:?} {:?}",
                endpoint.host,
                session.protocol_version(),
                session.negotiated_cipher_suite().map(|cs| cs.suite())
            );
            Ok((MaybeTlsStream::Tls(Box::new(stream)), remote_addr))
        }
        Err(source) => {
            observer.on_tls_handshake_done(Err(&source));
            Err(TransportError::TlsHandshake {
                host: endpoint.host.clone(),
                source,
            })
        }
    }
}

async fn resolve(
    resolver: &TokioAsyncResolver,
    endpoint: &Endpoint,
) -> Result<Vec<SocketAddr>, TransportError> {
    if let Ok(ip) = endpoint.host.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, endpoint.port)]);
    }

    let lookup = resolver
        .lookup_ip(endpoint.host.as_str())
        .await
        .map_err(|source| TransportError::Resolve {
            host: endpoint.host.clone(),
            source,
        })?;
    let addrs: Vec<SocketAddr> = lookup
        .iter()
        .map(|ip| SocketAddr::new(ip, endpoint.port))
        .collect();
    if addrs.is_empty() {
        return Err(TransportError::NoAddresses {
            host: endpoint.host.clone(),
        });
    }
    Ok(addrs)
}

/// Tries each address in resolver order; the last failure is returned.
async fn dial(addrs: &[SocketAddr]) -> Result<(TcpStream, SocketAddr), (SocketAddr, io::Error)> {
    let mut last_err = None;
    for &addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok((stream, addr)),
            Err(e) => {
                debug!("Connect to {addr} failed: {e}");
                last_err = Some((addr, e));
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        (
            SocketAddr::from(([0, 0, 0, 0], 0)),
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses to dial"),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_default_ports() {
        let https = Endpoint::from_url(&Url::parse("https://example.com/").unwrap()).unwrap();
        assert_eq!(https, Endpoint { host: "example.com".into(), port: 443, tls: true });

        let http = Endpoint::from_url(&Url::parse("http://example.com/").unwrap()).unwrap();
        assert_eq!(http, Endpoint { host: "example.com".into(), port: 80, tls: false });
    }

    #[test]
    fn test_endpoint_explicit_port_and_ipv6() {
        let endpoint = Endpoint::from_url(&Url::parse("http://[::1]:8080/").unwrap()).unwrap();
        assert_eq!(endpoint.host, "::1");
        assert_eq!(endpoint.port, 8080);
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        let err = Endpoint::from_url(&Url::parse("ws://example.com/").unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ws"));
    }

    #[tokio::test]
    async fn test_ip_literal_skips_resolver() {
        let resolver = crate::initialization::init_resolver();
        let endpoint = Endpoint { host: "127.0.0.1".into(), port: 8080, tls: false };
        let addrs = resolve(&resolver, &endpoint).await.unwrap();
        assert_eq!(addrs, vec![SocketAddr::from(([127, 0, 0, 1], 8080))]);
    }

    #[tokio::test]
    async fn test_dial_refused_reports_address() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (failed, err) = dial(&[addr]).await.unwrap_err();
        assert_eq!(failed, addr);
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
    }
}
