//! Lifecycle hooks and the tracer that records them.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::trace;
use strum_macros::Display;

use crate::error_handling::TransportError;
use crate::trace::timing::TimingTrace;

/// Where a hop is in its lifecycle.
///
/// `Failed` is reachable from every state except `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HopState {
    /// Nothing has happened yet
    Start,
    /// DNS lookup in flight
    Resolving,
    /// TCP connect in flight
    Connecting,
    /// TLS handshake in flight
    TlsHandshaking,
    /// Writing the request
    Sending,
    /// Request sent, no response byte yet
    AwaitingHead,
    /// Reading the response body
    ReadingBody,
    /// Body consumed or skipped
    Done,
    /// Aborted by an error
    Failed,
}

/// How the body phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOutcome {
    /// The body was read to the end (discarded, displayed or saved).
    Read,
    /// No body was read (HEAD, or a redirect about to be followed).
    /// Content transfer has zero width.
    Skipped,
}

/// Observer of one hop's connection lifecycle.
///
/// Implementations may be invoked from the task driving the HTTP connection,
/// so they must be thread-safe. Any transport substituted for the current one
/// must keep the firing order documented in [`crate::trace`].
pub trait PhaseObserver: Send + Sync {
    /// Immediately before name resolution begins.
    fn on_resolve_start(&self);

    /// Name resolution complete, before the connect attempt.
    fn on_resolve_done(&self);

    /// TCP connect finished. An error is fatal for the hop.
    fn on_connect_done(&self, result: Result<(), &io::Error>);

    /// TLS handshake finished (https only). An error is fatal for the hop.
    fn on_tls_handshake_done(&self, result: Result<(), &io::Error>);

    /// Bytes of the request reached the connection. Fires once per write;
    /// the last call before the first response byte marks the complete request.
    fn on_request_sent(&self);

    /// The first byte of the response was read.
    fn on_first_response_byte(&self);

    /// The body phase finished.
    fn on_body_consumed(&self, outcome: BodyOutcome);

    /// The hop failed. No further hooks fire.
    fn on_error(&self, _err: &TransportError) {}
}

#[derive(Debug)]
struct TracerState {
    trace: TimingTrace,
    state: HopState,
    tls: bool,
}

/// [`PhaseObserver`] that stamps each hook with [`Instant::now`].
#[derive(Debug)]
pub struct PhaseTracer {
    inner: Mutex<TracerState>,
}

impl PhaseTracer {
    /// Creates a tracer for one hop; `tls` says whether a handshake will follow connect.
    pub fn new(tls: bool) -> Self {
        Self {
            inner: Mutex::new(TracerState {
                trace: TimingTrace::default(),
                state: HopState::Start,
                tls,
            }),
        }
    }

    /// Snapshot of the timestamps recorded so far.
    pub fn trace(&self) -> TimingTrace {
        self.lock().trace
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HopState {
        self.lock().state
    }

    fn lock(&self) -> MutexGuard<'_, TracerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(state: &mut TracerState, next: HopState) {
        if state.state != next {
            trace!("hop state {} -> {}", state.state, next);
            state.state = next;
        }
    }
}

impl PhaseObserver for PhaseTracer {
    fn on_resolve_start(&self) {
        let mut s = self.lock();
        s.trace.dns_start = Some(Instant::now());
        Self::transition(&mut s, HopState::Resolving);
    }

    fn on_resolve_done(&self) {
        let mut s = self.lock();
        s.trace.dns_done = Some(Instant::now());
        Self::transition(&mut s, HopState::Connecting);
    }

    fn on_connect_done(&self, result: Result<(), &io::Error>) {
        let mut s = self.lock();
        match result {
            Ok(()) => {
                s.trace.connect_done = Some(Instant::now());
                let next = if s.tls {
                    HopState::TlsHandshaking
                } else {
                    HopState::Sending
                };
                Self::transition(&mut s, next);
            }
            Err(_) => Self::transition(&mut s, HopState::Failed),
        }
    }

    fn on_tls_handshake_done(&self, result: Result<(), &io::Error>) {
        let mut s = self.lock();
        match result {
            Ok(()) => {
                s.trace.tls_done = Some(Instant::now());
                Self::transition(&mut s, HopState::Sending);
            }
            Err(_) => Self::transition(&mut s, HopState::Failed),
        }
    }

    fn on_request_sent(&self) {
        let mut s = self.lock();
        if s.trace.first_response_byte.is_some() {
            return;
        }
        s.trace.request_written = Some(Instant::now());
        Self::transition(&mut s, HopState::AwaitingHead);
    }

    fn on_first_response_byte(&self) {
        let mut s = self.lock();
        if s.trace.first_response_byte.is_none() {
            s.trace.first_response_byte = Some(Instant::now());
            Self::transition(&mut s, HopState::ReadingBody);
        }
    }

    fn on_body_consumed(&self, outcome: BodyOutcome) {
        let mut s = self.lock();
        s.trace.body_done = match outcome {
            BodyOutcome::Skipped => s.trace.first_response_byte.or_else(|| Some(Instant::now())),
            BodyOutcome::Read => Some(Instant::now()),
        };
        Self::transition(&mut s, HopState::Done);
    }

    fn on_error(&self, _err: &TransportError) {
        let mut s = self.lock();
        Self::transition(&mut s, HopState::Failed);
    }
}
