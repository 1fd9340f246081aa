//! Structured logging for steepbook.
//!
//! Two output modes, both on stderr:
//! - Human-readable console lines for interactive use
//! - JSON lines for scripts
//!
//! stdout is reserved for command output (session listings, notifications).
//! Every invocation runs inside a `run` span carrying a run id.
//!
//! ```ignore
//! use sb_core::logging::{generate_run_id, init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let span = tracing::info_span!("run", run_id = %generate_run_id());
//! let _guard = span.enter();
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown.
const LOG_TARGETS: [&str; 4] = ["steepbook", "sb_core", "sb_exchange", "sb_common"];

fn filter_for(level: LogLevel) -> EnvFilter {
    let directives = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}

/// Initialize the global subscriber. Call once, at startup.
///
/// A second call (e.g. from tests) is ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = filter_for(config.level);

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(json_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(json_layer.without_time())
                    .try_init()
            }
        }
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

/// Unique id for one CLI invocation: `run-` plus 12 hex chars.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_short_and_unique() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();
        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn filter_covers_every_crate() {
        let rendered = filter_for(LogLevel::Debug).to_string();
        for target in LOG_TARGETS {
            assert!(rendered.contains(&format!("{target}=debug")), "{rendered}");
        }
    }

    #[test]
    fn double_init_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        init_logging(&config);
        init_logging(&config);
    }
}
