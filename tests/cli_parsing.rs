//! Tests for command-line parsing.

use clap::error::ErrorKind;
use clap::Parser;
use httpstat::{Config, LogFormat, LogLevel, Opt, OutputTarget};
use std::path::PathBuf;

fn parse(args: &[&str]) -> Result<Opt, clap::Error> {
    let mut argv = vec!["httpstat"];
    argv.extend_from_slice(args);
    Opt::try_parse_from(argv)
}

#[test]
fn test_missing_url_is_usage_error() {
    let err = parse(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_extra_positional_is_usage_error() {
    let err = parse(&["http://a.example/", "http://b.example/"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_remote_name_conflicts_with_output() {
    let err = parse(&["-O", "-o", "out.txt", "http://example.com/"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_all_flags_parse() {
    let opt = parse(&[
        "-X", "PUT", "-d", "@body.json", "-H", "Accept: text/html", "-H", "X-One: 1", "-L",
        "-k", "-o", "out.bin", "-E", "client.pem", "--log-level", "debug", "--log-format",
        "json", "example.com:8443/api",
    ])
    .expect("flags should parse");

    assert_eq!(opt.method, "PUT");
    assert_eq!(opt.data.as_deref(), Some("@body.json"));
    assert_eq!(opt.headers, vec!["Accept: text/html", "X-One: 1"]);
    assert!(opt.follow_redirects);
    assert!(opt.insecure);
    assert!(!opt.head_only);
    assert_eq!(opt.client_cert, Some(PathBuf::from("client.pem")));
    assert_eq!(
        log::LevelFilter::from(opt.log_level.clone()),
        log::LevelFilter::Debug
    );
    assert!(matches!(opt.log_format, LogFormat::Json));

    let config = Config::try_from(opt).expect("options should convert");
    assert_eq!(config.target.scheme(), "https");
    assert_eq!(config.target.port(), Some(8443));
    assert_eq!(config.request.headers.len(), 2);
    assert_eq!(config.output, OutputTarget::File(PathBuf::from("out.bin")));
}

#[test]
fn test_defaults() {
    let opt = parse(&["example.com"]).expect("a bare host should parse");
    assert_eq!(opt.method, "GET");
    assert!(opt.headers.is_empty());
    assert_eq!(
        log::LevelFilter::from(opt.log_level.clone()),
        log::LevelFilter::from(LogLevel::Warn)
    );
    assert!(matches!(opt.log_format, LogFormat::Plain));
}
