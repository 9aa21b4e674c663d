//! DNS resolver initialization.

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::debug;

/// Initializes the DNS resolver for hostname lookups.
///
/// Uses the system configuration (`/etc/resolv.conf` and the hosts file) so the
/// timing reflects what other tools on the machine see. Falls back to the
/// default upstream configuration when the system configuration cannot be read.
///
/// Resolver timeouts are left at their defaults; a hung lookup blocks the
/// invocation until the resolver gives up.
pub fn init_resolver() -> TokioAsyncResolver {
    match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            debug!("System resolver configuration unavailable ({e}), using defaults");
            let mut opts = ResolverOpts::default();
            // Set ndots to 0 to prevent search domain appending
            opts.ndots = 0;
            TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
        }
    }
}
