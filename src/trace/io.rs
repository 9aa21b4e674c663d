//! Instrumented connection I/O.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::trace::tracer::PhaseObserver;

/// Wraps an established (and, for https, already handshaken) stream and fires
/// [`PhaseObserver::on_request_sent`] / [`PhaseObserver::on_first_response_byte`]
/// as the HTTP layer writes and reads through it.
///
/// Every write that lands bytes before the response starts re-stamps
/// `request_written`, so the final stamp is the write that completed the request.
pub struct TracedIo<S> {
    inner: S,
    observer: Arc<dyn PhaseObserver>,
    unflushed: bool,
    response_started: bool,
}

impl<S> TracedIo<S> {
    /// Wraps `inner`, reporting to `observer`.
    pub fn new(inner: S, observer: Arc<dyn PhaseObserver>) -> Self {
        Self {
            inner,
            observer,
            unflushed: false,
            response_started: false,
        }
    }

    fn wrote(&mut self, n: usize) {
        if n > 0 && !self.response_started {
            self.unflushed = true;
            self.observer.on_request_sent();
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for TracedIo<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let filled_before = buf.filled().len();
        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            if !this.response_started && buf.filled().len() > filled_before {
                this.response_started = true;
                this.observer.on_first_response_byte();
            }
        }
        poll
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for TracedIo<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = poll {
            this.wrote(n);
        }
        poll
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_write_vectored(cx, bufs);
        if let Poll::Ready(Ok(n)) = poll {
            this.wrote(n);
        }
        poll
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_flush(cx);
        if let Poll::Ready(Ok(())) = poll {
            // buffered TLS records only hit the socket on flush
            if this.unflushed && !this.response_started {
                this.observer.on_request_sent();
            }
            this.unflushed = false;
        }
        poll
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{HopState, PhaseTracer};
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_write_then_read_stamps_request_and_first_byte() {
        let tracer = Arc::new(PhaseTracer::new(false));
        tracer.on_resolve_start();
        tracer.on_resolve_done();
        tracer.on_connect_done(Ok(()));

        let (client, mut server) = duplex(1024);
        let mut io = TracedIo::new(client, tracer.clone());

        io.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        io.flush().await.unwrap();
        assert!(tracer.trace().request_written.is_some());
        assert!(tracer.trace().first_response_byte.is_none());
        assert_eq!(tracer.state(), HopState::AwaitingHead);

        let mut request = [0u8; 18];
        server.read_exact(&mut request).await.unwrap();
        server.write_all(b"HTTP/1.1 204 No Content\r\n\r\n").await.unwrap();

        let mut buf = [0u8; 8];
        let n = io.read(&mut buf).await.unwrap();
        assert!(n > 0);
        let trace = tracer.trace();
        assert!(trace.first_response_byte.is_some());
        assert!(trace.request_written <= trace.first_response_byte);
        assert_eq!(tracer.state(), HopState::ReadingBody);
    }

    #[tokio::test]
    async fn test_writes_after_response_do_not_restamp() {
        let tracer = Arc::new(PhaseTracer::new(false));
        let (client, mut server) = duplex(1024);
        let mut io = TracedIo::new(client, tracer.clone());

        io.write_all(b"ping").await.unwrap();
        server.write_all(b"pong").await.unwrap();
        let mut buf = [0u8; 4];
        io.read_exact(&mut buf).await.unwrap();
        let stamped = tracer.trace().request_written;

        io.write_all(b"late").await.unwrap();
        io.flush().await.unwrap();
        assert_eq!(tracer.trace().request_written, stamped);
    }
}
