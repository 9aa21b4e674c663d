//! Connection phase tracing.
//!
//! A [`PhaseTracer`] observes one hop (one connection attempt plus its
//! request/response exchange) through the [`PhaseObserver`] hooks and yields a
//! [`TimingTrace`] once the exchange completes. Connection setup hooks are
//! fired by the orchestrator around resolve/connect/handshake; the request-sent
//! and first-byte hooks are fired passively by [`TracedIo`], which the HTTP
//! connection reads and writes through.
//!
//! Hook firing order for one hop:
//!
//! ```text
//! on_resolve_start -> on_resolve_done -> on_connect_done
//!     [-> on_tls_handshake_done]   (https only)
//!     -> on_request_sent -> on_first_response_byte -> on_body_consumed
//! ```

mod io;
mod timing;
mod tracer;

// Re-export public API
pub use io::TracedIo;
pub use timing::{Milestones, Phase, Phases, TimingTrace};
pub use tracer::{BodyOutcome, HopState, PhaseObserver, PhaseTracer};
