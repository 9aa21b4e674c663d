//! TLS client configuration.
//!
//! Builds the `rustls` client configuration shared by every https hop of one
//! invocation: webpki roots for verification, optional client identity, and
//! the `-k` verifier that skips certificate checks while still requiring a
//! valid handshake.

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring::default_provider, CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::config::ALPN_HTTP1;
use crate::error_handling::{ConfigError, HttpstatError, InitializationError};

/// Builds the TLS client configuration.
///
/// # Arguments
///
/// * `insecure` - Skip server certificate verification (`-k`). Handshake
///   signatures are still verified, so the handshake itself must succeed.
/// * `client_cert` - PEM file holding a certificate chain and private key (`-E`)
///
/// # Errors
///
/// Returns `ConfigError::ClientCert` if the client identity cannot be read or
/// used, and `InitializationError::TlsConfigError` if rustls rejects the setup.
pub fn init_tls_config(
    insecure: bool,
    client_cert: Option<&Path>,
) -> Result<Arc<ClientConfig>, HttpstatError> {
    let provider = Arc::new(default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(InitializationError::from)?;

    let builder = if insecure {
        warn!("TLS certificate verification disabled");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoCertificateVerification::new(&provider)))
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder.with_root_certificates(root_store)
    };

    let mut config = match client_cert {
        Some(path) => {
            let (certs, key) = load_client_identity(path)?;
            debug!(
                "Using client certificate chain of {} from {}",
                certs.len(),
                path.display()
            );
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| ConfigError::ClientCert {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
        }
        None => builder.with_no_client_auth(),
    };
    config.alpn_protocols = vec![ALPN_HTTP1.to_vec()];

    Ok(Arc::new(config))
}

/// Reads every certificate and the first private key from a PEM file.
fn load_client_identity(
    path: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), ConfigError> {
    let cert_error = |reason: String| ConfigError::ClientCert {
        path: path.to_path_buf(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| cert_error(e.to_string()))?;

    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| cert_error(e.to_string()))?;
    if certs.is_empty() {
        return Err(cert_error("no certificates found".to_string()));
    }

    let key = rustls_pemfile::private_key(&mut pem.as_slice())
        .map_err(|e| cert_error(e.to_string()))?
        .ok_or_else(|| cert_error("no private key found".to_string()))?;

    Ok((certs, key))
}

/// Accepts any server certificate but still checks handshake signatures.
#[derive(Debug)]
struct NoCertificateVerification {
    algorithms: WebPkiSupportedAlgorithms,
}

impl NoCertificateVerification {
    fn new(provider: &CryptoProvider) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_verifying_config_offers_http1() {
        let config = init_tls_config(false, None).unwrap();
        assert_eq!(config.alpn_protocols, vec![b"http/1.1".to_vec()]);
    }

    #[test]
    fn test_insecure_config_builds() {
        let config = init_tls_config(true, None).unwrap();
        assert_eq!(config.alpn_protocols, vec![b"http/1.1".to_vec()]);
    }

    #[test]
    fn test_missing_client_cert_is_config_error() {
        let err = init_tls_config(false, Some(Path::new("/nonexistent/client.pem"))).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_client_cert_without_certificates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a pem file").unwrap();

        let err = load_client_identity(file.path()).unwrap_err();
        assert!(err.to_string().contains("no certificates found"));
    }

    #[test]
    fn test_client_identity_from_combined_pem() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/localhost.pem"));

        let (certs, _key) = load_client_identity(path).unwrap();
        assert_eq!(certs.len(), 1);
        assert!(init_tls_config(false, Some(path)).is_ok());
    }
}
