//! Error type definitions.

use std::io;
use std::path::PathBuf;

use hickory_resolver::error::ResolveError;
use log::SetLoggerError;
use thiserror::Error;

/// Errors in the invocation itself, raised before or independent of network I/O.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The target could not be parsed as a URL.
    #[error("could not parse url {url:?}: {source}")]
    InvalidUrl {
        /// Target as given
        url: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// Only `http` and `https` are supported.
    #[error("unsupported url scheme {0:?}")]
    UnsupportedScheme(String),

    /// `-X` value is not a valid HTTP method token.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// POST and PUT need a body.
    #[error("must supply post body using -d when POST or PUT is used")]
    MissingBody,

    /// `-H` value without a `:` separator.
    #[error("header '{0}' has invalid format, missing ':'")]
    MalformedHeader(String),

    /// `-H` name or value the HTTP layer rejects.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Header name as given
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The URL path and query cannot be used as a request target.
    #[error("invalid request target {target:?}: {reason}")]
    InvalidRequestTarget {
        /// Path and query
        target: String,
        /// Why it was rejected
        reason: String,
    },

    /// `-d @file` could not be read.
    #[error("failed to open data file {}: {source}", path.display())]
    DataFile {
        /// Path after the `@`
        path: PathBuf,
        /// Read failure
        #[source]
        source: io::Error,
    },

    /// `-E` file could not be read or used.
    #[error("unable to read client certificate {}: {reason}", path.display())]
    ClientCert {
        /// PEM path given to `-E`
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// More redirects than the configured bound.
    #[error("maximum number of redirects ({0}) followed")]
    TooManyRedirects(usize),

    /// `-O` on a URL whose path yields no filename.
    #[error("no remote filename; specify output filename with -o to save response body")]
    NoRemoteFilename,
}

/// Network and I/O failures during a hop.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Name resolution failed.
    #[error("unable to resolve host {host}: {source}")]
    Resolve {
        /// Hostname looked up
        host: String,
        /// Resolver failure
        #[source]
        source: ResolveError,
    },

    /// Resolution succeeded but returned nothing to dial.
    #[error("unable to resolve host {host}: no addresses found")]
    NoAddresses {
        /// Hostname looked up
        host: String,
    },

    /// TCP connect failed (refused, unreachable, timed out).
    #[error("unable to connect to host {addr}: {source}")]
    Connect {
        /// Last address dialled
        addr: String,
        /// Connect failure
        #[source]
        source: io::Error,
    },

    /// Host cannot be used for SNI or certificate validation.
    #[error("invalid TLS server name {host:?}")]
    InvalidServerName {
        /// Rejected host
        host: String,
    },

    /// TLS handshake failed (certificate rejected, protocol mismatch).
    #[error("unable to negotiate TLS handshake with {host}: {source}")]
    TlsHandshake {
        /// Server name sent in SNI
        host: String,
        /// Handshake failure
        #[source]
        source: io::Error,
    },

    /// The request could not be written.
    #[error("failed to write request: {0}")]
    RequestWrite(#[source] hyper::Error),

    /// The response head could not be read.
    #[error("failed to read response: {0}")]
    ResponseRead(#[source] hyper::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] hyper::Error),

    /// The output file could not be created or written.
    #[error("unable to write body to {}: {source}", path.display())]
    BodyWrite {
        /// Output file
        path: PathBuf,
        /// Write failure
        #[source]
        source: io::Error,
    },

    /// `Location` is present but cannot be resolved against the current URL.
    #[error("unable to follow redirect to {location:?}: {reason}")]
    InvalidLocation {
        /// Raw `Location` value
        location: String,
        /// Why it could not be resolved
        reason: String,
    },
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Top-level error for one invocation.
#[derive(Error, Debug)]
pub enum HttpstatError {
    /// The invocation itself is wrong.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A hop failed on the network or while moving bytes.
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    /// Logger or TLS setup failed.
    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

impl HttpstatError {
    /// True for errors in the invocation rather than the network.
    pub fn is_config(&self) -> bool {
        matches!(self, HttpstatError::Config(_))
    }

    /// True for network and I/O failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpstatError::Transport(_))
    }
}
