//! httpstat library: HTTP(S) transaction timing
//!
//! This library performs one HTTP request over a freshly established
//! connection, records the wall-clock boundary of every connection-lifecycle
//! phase (name resolution, TCP connect, TLS handshake, time to first byte and
//! body transfer), and renders the breakdown alongside the response status and
//! headers. Redirects can be followed manually, one fresh connection per hop,
//! up to a fixed bound.
//!
//! # Example
//!
//! ```no_run
//! use httpstat::{execute, parse_target, render_hop, Config, RequestSpec, Style};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! httpstat::initialization::init_crypto_provider();
//!
//! let config = Config {
//!     follow_redirects: true,
//!     ..Config::new(parse_target("example.com")?, RequestSpec::default())
//! };
//!
//! execute(&config, |hop| print!("{}", render_hop(&hop, Style::detect()))).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod report;
mod trace;

// Re-export public API
pub use app::parse_target;
pub use config::{Config, LogFormat, LogLevel, Opt, OutputTarget};
pub use error_handling::{ConfigError, HttpstatError, InitializationError, TransportError};
pub use fetch::{
    execute, filename_from_content_disposition, filename_from_url, is_redirect, parse_header,
    redirect_target, BodySource, Endpoint, HopReport, MaybeTlsStream, RedirectState, RequestSpec,
    ResponseDisposition, ResponseSummary,
};
pub use report::{
    canonical_header_name, compare_header_names, is_hop_by_hop, render_hop, render_timeline,
    sorted_headers, Style,
};
pub use trace::{
    BodyOutcome, HopState, Milestones, Phase, PhaseObserver, PhaseTracer, Phases, TimingTrace,
    TracedIo,
};
