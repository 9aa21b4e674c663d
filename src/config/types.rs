//! Configuration types and CLI options.
//!
//! This module defines the `clap` option struct and the immutable [`Config`]
//! the transaction engine runs from. The CLI struct is converted exactly once;
//! nothing downstream reads process-global state.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::app::parse_target;
use crate::config::constants::{MAX_REDIRECTS, STDOUT_OUTPUT};
use crate::error_handling::ConfigError;
use crate::fetch::RequestSpec;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Where a response body goes once the head has been read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Read and throw away (default)
    #[default]
    Discard,
    /// Print the body after the response headers (`-o -`)
    Stdout,
    /// Save to an explicit path (`-o FILE`)
    File(PathBuf),
    /// Save under the name the server suggests, or the last URL path segment (`-O`)
    RemoteName,
}

/// Command-line options.
///
/// Flag names mirror curl's so the tool can be dropped into existing habits.
///
/// # Examples
///
/// ```bash
/// # Time a simple GET
/// httpstat https://example.com/
///
/// # POST a file, follow redirects, print debug logs
/// httpstat -X POST -d @payload.json -L --log-level debug https://example.com/api
///
/// # Save the body under the server-suggested filename
/// httpstat -O https://example.com/download
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "httpstat",
    version,
    about = "Visualizes the timing of an HTTP(S) request: DNS, TCP, TLS, server processing and transfer."
)]
pub struct Opt {
    /// HTTP method to use
    #[arg(short = 'X', value_name = "METHOD", default_value = "GET")]
    pub method: String,

    /// The body of a POST or PUT request; use @FILE to read it from a file
    #[arg(short = 'd', value_name = "BODY")]
    pub data: Option<String>,

    /// HTTP header to set, e.g. -H 'Accept: text/html'. Can be used multiple times
    #[arg(short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Follow 30x redirects
    #[arg(short = 'L')]
    pub follow_redirects: bool,

    /// Don't read the body of the response (forces HEAD)
    #[arg(short = 'I')]
    pub head_only: bool,

    /// Allow insecure TLS connections (skip certificate verification)
    #[arg(short = 'k')]
    pub insecure: bool,

    /// Save the body under the remote filename
    #[arg(short = 'O', conflicts_with = "output")]
    pub save_remote_name: bool,

    /// Output file for the body; '-' prints it
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<String>,

    /// Client certificate and private key (PEM) for TLS client authentication
    #[arg(short = 'E', long = "cert", value_name = "CERT")]
    pub client_cert: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Target URL; a bare host[:port] gets http when the port is 80, https otherwise
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Library configuration (no CLI dependencies).
///
/// Built once, then passed by reference into [`crate::execute`]. Can be
/// constructed programmatically with [`Config::new`] and struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use httpstat::{parse_target, Config, RequestSpec};
///
/// let target = parse_target("example.com").unwrap();
/// let config = Config {
///     follow_redirects: true,
///     ..Config::new(target, RequestSpec::default())
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// First URL visited
    pub target: Url,

    /// Method, headers and body sent on every hop
    pub request: RequestSpec,

    /// Follow 3xx responses that carry a `Location`
    pub follow_redirects: bool,

    /// Bound on followed redirects
    pub max_redirects: usize,

    /// Skip server certificate verification
    pub insecure: bool,

    /// Body disposition policy
    pub output: OutputTarget,

    /// PEM file with a client certificate chain and key
    pub client_cert: Option<PathBuf>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a configuration with default policy for the given target and request.
    pub fn new(target: Url, request: RequestSpec) -> Self {
        Self {
            target,
            request,
            follow_redirects: false,
            max_redirects: MAX_REDIRECTS,
            insecure: false,
            output: OutputTarget::Discard,
            client_cert: None,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }

    /// Checks invariants that must hold before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request.validate()
    }
}

impl TryFrom<Opt> for Config {
    type Error = ConfigError;

    fn try_from(opt: Opt) -> Result<Self, Self::Error> {
        let target = parse_target(&opt.url)?;
        let request = RequestSpec::from_flags(
            &opt.method,
            opt.head_only,
            &opt.headers,
            opt.data.as_deref(),
        )?;

        let output = if opt.save_remote_name {
            OutputTarget::RemoteName
        } else {
            match opt.output {
                Some(path) if path == STDOUT_OUTPUT => OutputTarget::Stdout,
                Some(path) => OutputTarget::File(PathBuf::from(path)),
                None => OutputTarget::Discard,
            }
        };

        let config = Config {
            target,
            request,
            follow_redirects: opt.follow_redirects,
            max_redirects: MAX_REDIRECTS,
            insecure: opt.insecure,
            output,
            client_cert: opt.client_cert,
            log_level: opt.log_level,
            log_format: opt.log_format,
        };
        config.validate()?;
        Ok(config)
    }
}
