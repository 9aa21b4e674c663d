//! Phase-boundary timestamps and the durations derived from them.

use std::time::{Duration, Instant};

use strum_macros::EnumIter;

/// Phase-boundary instants captured for one hop.
///
/// Instants are non-decreasing in field order. A boundary that does not apply
/// to the hop (`tls_done` for plaintext) stays `None`; it is never zeroed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingTrace {
    /// Name resolution started; the origin for all milestones
    pub dns_start: Option<Instant>,
    /// Name resolution finished
    pub dns_done: Option<Instant>,
    /// TCP connection established
    pub connect_done: Option<Instant>,
    /// TLS handshake finished (https only)
    pub tls_done: Option<Instant>,
    /// Request fully written to the connection
    pub request_written: Option<Instant>,
    /// First response byte read from the connection
    pub first_response_byte: Option<Instant>,
    /// Body consumed, or equal to `first_response_byte` when no body was read
    pub body_done: Option<Instant>,
}

/// Named interval between two lifecycle timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Phase {
    /// `dns_start` to `dns_done`
    DnsLookup,
    /// `dns_done` to `connect_done`
    TcpConnection,
    /// `connect_done` to `tls_done`, https only
    TlsHandshake,
    /// End of connection setup to the first response byte
    ServerProcessing,
    /// First response byte to `body_done`
    ContentTransfer,
}

impl Phase {
    /// Label used in the timeline header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::DnsLookup => "DNS Lookup",
            Phase::TcpConnection => "TCP Connection",
            Phase::TlsHandshake => "TLS Handshake",
            Phase::ServerProcessing => "Server Processing",
            Phase::ContentTransfer => "Content Transfer",
        }
    }
}

/// Per-phase durations of one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    /// Name resolution
    pub dns_lookup: Duration,
    /// TCP connect
    pub tcp_connection: Duration,
    /// `None` for plaintext hops
    pub tls_handshake: Option<Duration>,
    /// Waiting for the first response byte
    pub server_processing: Duration,
    /// Reading the body
    pub content_transfer: Duration,
}

impl Phases {
    /// Duration of `phase`, or `None` when the phase did not happen.
    pub fn get(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::DnsLookup => Some(self.dns_lookup),
            Phase::TcpConnection => Some(self.tcp_connection),
            Phase::TlsHandshake => self.tls_handshake,
            Phase::ServerProcessing => Some(self.server_processing),
            Phase::ContentTransfer => Some(self.content_transfer),
        }
    }
}

/// Cumulative durations, each measured from `dns_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestones {
    /// DNS done
    pub namelookup: Duration,
    /// TCP connected
    pub connect: Duration,
    /// `None` for plaintext hops
    pub pretransfer: Option<Duration>,
    /// First response byte
    pub starttransfer: Duration,
    /// Body done
    pub total: Duration,
}

impl TimingTrace {
    /// True when a TLS handshake was recorded.
    pub fn is_tls(&self) -> bool {
        self.tls_done.is_some()
    }

    /// True once every mandatory boundary has been stamped.
    pub fn is_complete(&self) -> bool {
        self.dns_start.is_some()
            && self.connect_done.is_some()
            && self.first_response_byte.is_some()
            && self.body_done.is_some()
    }

    /// Per-phase durations, or `None` while the trace is incomplete.
    pub fn phases(&self) -> Option<Phases> {
        let dns_start = self.dns_start?;
        let dns_done = self.dns_done.unwrap_or(dns_start);
        let connect_done = self.connect_done?;
        let first_byte = self.first_response_byte?;
        let body_done = self.body_done?;
        let pretransfer_end = self.tls_done.unwrap_or(connect_done);

        Some(Phases {
            dns_lookup: dns_done.saturating_duration_since(dns_start),
            tcp_connection: connect_done.saturating_duration_since(dns_done),
            tls_handshake: self
                .tls_done
                .map(|tls_done| tls_done.saturating_duration_since(connect_done)),
            server_processing: first_byte.saturating_duration_since(pretransfer_end),
            content_transfer: body_done.saturating_duration_since(first_byte),
        })
    }

    /// Cumulative milestones, or `None` while the trace is incomplete.
    ///
    /// Every milestone is measured from the trace origin (`dns_start`), not
    /// summed from the previous milestone.
    pub fn milestones(&self) -> Option<Milestones> {
        let origin = self.dns_start?;
        let since = |instant: Instant| instant.saturating_duration_since(origin);

        Some(Milestones {
            namelookup: since(self.dns_done.unwrap_or(origin)),
            connect: since(self.connect_done?),
            pretransfer: self.tls_done.map(since),
            starttransfer: since(self.first_response_byte?),
            total: since(self.body_done?),
        })
    }
}
