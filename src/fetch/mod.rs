//! Transaction orchestration.
//!
//! Drives one invocation: for each hop, resolve → connect → TLS (https only) →
//! send → read head → body disposition, then applies the redirect policy.
//! Every hop gets a fresh connection and a fresh [`PhaseTracer`]; the only
//! state carried between hops is the bounded [`RedirectState`].

mod body;
mod connect;
mod redirects;
mod request;
mod response;

use std::sync::Arc;

use bytes::Bytes;
use hickory_resolver::TokioAsyncResolver;
use http::Method;
use http_body_util::Full;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use log::{debug, info};
use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tokio_rustls::TlsConnector;
use url::Url;

use crate::config::Config;
use crate::error_handling::{HttpstatError, TransportError};
use crate::initialization::{init_resolver, init_tls_config};
use crate::trace::{BodyOutcome, Phase, PhaseObserver, PhaseTracer, TracedIo};

// Re-export public API
pub use body::{filename_from_content_disposition, filename_from_url, ResponseDisposition};
pub use connect::{Endpoint, MaybeTlsStream};
pub use redirects::{is_redirect, redirect_target, RedirectState};
pub use request::{parse_header, BodySource, RequestSpec};
pub use response::{HopReport, ResponseSummary};

/// Runs the transaction described by `config`, calling `on_hop` once per hop
/// in the order visited.
///
/// Hops already reported stay reported when a later hop fails; the failing
/// hop itself is never reported.
///
/// # Errors
///
/// Configuration errors (checked before any socket is opened, or when the
/// redirect bound is exceeded) and transport errors are both fatal; nothing is
/// retried.
///
/// # Example
///
/// ```no_run
/// use httpstat::{execute, parse_target, Config, RequestSpec};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), httpstat::HttpstatError> {
/// let config = Config::new(parse_target("example.com")?, RequestSpec::default());
/// execute(&config, |hop| println!("{} {}", hop.url, hop.response.status)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn execute<F>(config: &Config, mut on_hop: F) -> Result<(), HttpstatError>
where
    F: FnMut(HopReport),
{
    config.validate()?;
    let body = match &config.request.body {
        Some(source) => source.load().await?,
        None => Bytes::new(),
    };

    let transaction = Transaction {
        config,
        body,
        resolver: init_resolver(),
        connector: TlsConnector::from(init_tls_config(
            config.insecure,
            config.client_cert.as_deref(),
        )?),
    };

    let mut redirects = RedirectState::new(config.max_redirects);
    let mut url = config.target.clone();
    loop {
        let HopOutcome { report, next } = transaction.visit(&url).await?;
        info!(
            "{} {} -> {}",
            config.request.method, report.url, report.response.status
        );
        on_hop(report);

        match next {
            Some(next) => {
                redirects.record()?;
                debug!("Following redirect {} to {next}", redirects.followed());
                url = next;
            }
            None => return Ok(()),
        }
    }
}

struct Transaction<'a> {
    config: &'a Config,
    body: Bytes,
    resolver: TokioAsyncResolver,
    connector: TlsConnector,
}

struct HopOutcome {
    report: HopReport,
    /// Redirect to follow next, if the policy applies
    next: Option<Url>,
}

/// Aborts the task driving the HTTP connection when the hop ends, so the
/// socket is closed on every exit path.
struct ConnectionDriver(JoinHandle<()>);

impl ConnectionDriver {
    fn spawn<T>(connection: http1::Connection<T, Full<Bytes>>) -> Self
    where
        T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
    {
        Self(tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("Connection closed with error: {e}");
            }
        }))
    }
}

impl Drop for ConnectionDriver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Transaction<'_> {
    async fn visit(&self, url: &Url) -> Result<HopOutcome, HttpstatError> {
        let endpoint = Endpoint::from_url(url)?;
        let tracer = Arc::new(PhaseTracer::new(endpoint.tls));

        let result = self.exchange(url, &endpoint, &tracer).await;
        if let Err(HttpstatError::Transport(e)) = &result {
            tracer.on_error(e);
            debug!("Hop to {url} failed in state {}", tracer.state());
        }
        result
    }

    async fn exchange(
        &self,
        url: &Url,
        endpoint: &Endpoint,
        tracer: &Arc<PhaseTracer>,
    ) -> Result<HopOutcome, HttpstatError> {
        let observer: Arc<dyn PhaseObserver> = tracer.clone();
        let request = request::build_request(&self.config.request, url, self.body.clone())?;

        let (stream, remote_addr) =
            connect::connect(&self.resolver, &self.connector, endpoint, observer.as_ref()).await?;

        let io = TokioIo::new(TracedIo::new(stream, observer));
        let (mut sender, connection) = http1::handshake(io)
            .await
            .map_err(TransportError::RequestWrite)?;
        let _driver = ConnectionDriver::spawn(connection);

        let response = sender.send_request(request).await.map_err(|e| {
            if tracer.trace().first_response_byte.is_some() {
                TransportError::ResponseRead(e)
            } else {
                TransportError::RequestWrite(e)
            }
        })?;
        let (parts, body) = response.into_parts();
        let summary = ResponseSummary::from_parts(&parts);

        let next = if self.config.follow_redirects && is_redirect(parts.status) {
            redirect_target(url, &parts.headers)?
        } else {
            None
        };

        let body_message = if next.is_some() || self.config.request.method == Method::HEAD {
            drop(body);
            tracer.on_body_consumed(BodyOutcome::Skipped);
            None
        } else {
            let disposition =
                ResponseDisposition::resolve(&self.config.output, &parts.headers, url)?;
            let message = body::consume(body, &disposition).await?;
            tracer.on_body_consumed(BodyOutcome::Read);
            Some(message)
        };

        let trace = tracer.trace();
        if let Some(phases) = trace.phases() {
            for phase in Phase::iter() {
                if let Some(d) = phases.get(phase) {
                    debug!("{url} {}: {}ms", phase.as_str(), d.as_millis());
                }
            }
        }

        Ok(HopOutcome {
            report: HopReport {
                url: url.clone(),
                remote_addr,
                response: summary,
                body_message,
                trace,
            },
            next,
        })
    }
}
