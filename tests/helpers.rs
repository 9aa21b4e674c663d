// Shared test helpers for building configurations and collecting hops.

use httpstat::{execute, Config, HopReport, HttpstatError, RequestSpec};
use url::Url;

/// Configuration for `url` with the given request and default policy.
#[allow(dead_code)] // Used by other test files
pub fn config_for(url: &str, request: RequestSpec) -> Config {
    Config::new(Url::parse(url).expect("test URL should parse"), request)
}

/// Request built the way the CLI builds it.
#[allow(dead_code)] // Used by other test files
pub fn request(method: &str, head_only: bool, headers: &[&str], data: Option<&str>) -> RequestSpec {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    RequestSpec::from_flags(method, head_only, &headers, data).expect("request flags should be valid")
}

/// Runs the transaction, returning every reported hop alongside the outcome.
#[allow(dead_code)] // Used by other test files
pub async fn run(config: &Config) -> (Vec<HopReport>, Result<(), HttpstatError>) {
    let mut hops = Vec::new();
    let result = execute(config, |hop| hops.push(hop)).await;
    (hops, result)
}
