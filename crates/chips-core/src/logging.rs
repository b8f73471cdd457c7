//! Tracing setup for the `chips` tools.
//!
//! Diagnostics (per-date skips, cache hits, query summaries) go to stderr and,
//! when a log directory is configured, to a daily-rolling file. Stdout is left
//! to the tables and JSON the runner prints. `RUST_LOG` overrides the level
//! passed on the command line.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// HTTP client crates that log every archive request at debug level.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Filter directives for `log_level`, with the HTTP stack capped at `warn`.
///
/// A `trace` level leaves the HTTP stack alone.
pub fn default_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.eq_ignore_ascii_case("trace") {
        return level.to_string();
    }
    QUIET_TARGETS.iter().fold(level.to_string(), |acc, target| format!("{acc},{target}=warn"))
}

/// Install the global subscriber. Call once, before the first query.
///
/// `log_level` applies when `RUST_LOG` is unset. Files under `log_dir` are
/// named `{file_prefix}.YYYY-MM-DD` (the prefix is `app.module_name` from the
/// config, `chips` by default).
pub fn init_logging(log_level: &str, log_dir: Option<&str>, file_prefix: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(true).with_ansi(true);

    if let Some(dir) = log_dir {
        let file_layer = fmt::layer()
            .with_writer(tracing_appender::rolling::daily(dir, file_prefix))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(console_layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_stack_capped_below_trace() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("reqwest=warn"));
        assert!(directives.contains("hyper=warn"));
        assert_eq!(default_directives(" trace "), "trace");
    }

    #[test]
    fn directives_parse_as_filter() {
        for level in ["info", "warn", "chips_ledger=debug"] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok(), "{level}");
        }
    }
}
