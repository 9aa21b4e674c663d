//! Logger initialization.
//!
//! Logs go to stderr so they never interleave with the timing report on stdout.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependency modules capped below the requested level. Their debug output
/// describes their own internals, not the phases being timed.
const DEPENDENCY_LEVELS: &[(&str, LevelFilter)] = &[
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
    // hickory logs every malformed or truncated UDP answer at warn
    ("hickory_proto", LevelFilter::Error),
    ("hickory_resolver", LevelFilter::Warn),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and
/// sets the global default.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Trace every phase transition
/// httpstat --log-level trace https://example.com/
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=rustls=debug httpstat https://example.com/
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for (module, cap) in DEPENDENCY_LEVELS {
        builder.filter_module(module, level.min(*cap));
    }
    builder.filter_module("httpstat", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(chrono::Utc::now().timestamp_millis(), record)
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    // try_init() instead of init(): tests may initialize the logger more than once
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::Error => label.red(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

/// One JSON object per record: `ts` (unix millis), `level`, `target`, `msg`.
fn json_line(ts: i64, record: &Record<'_>) -> String {
    serde_json::json!({
        "ts": ts,
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            1_700_000_000_000,
            &Record::builder()
                .level(Level::Debug)
                .target("httpstat::fetch")
                .args(format_args!("GET \"quoted\"\n200"))
                .build(),
        );

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "DEBUG");
        assert_eq!(parsed["target"], "httpstat::fetch");
        assert_eq!(parsed["msg"], "GET \"quoted\"\n200");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_dependency_levels_never_exceed_requested() {
        for (_, cap) in DEPENDENCY_LEVELS {
            assert!(LevelFilter::Trace.min(*cap) <= *cap);
            assert_eq!(LevelFilter::Error.min(*cap), LevelFilter::Error);
        }
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        let _ = env_logger::builder().is_test(true).try_init();

        // A logger is already installed, so this must report an error rather than panic
        let result = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        assert!(result.is_err());
    }
}
