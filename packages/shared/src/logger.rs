//! Logging setup utilities for the Kokuban canvas server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose logs are enabled at the default level.
const LOGGED_CRATES: [&str; 3] = ["kokuban_server", "kokuban_shared", "tower_http"];

/// Build the default filter directive when `RUST_LOG` is not set.
///
/// Every workspace crate and the binary itself log at `default_log_level`.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    LOGGED_CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "kokuban-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use kokuban_shared::logger::setup_logger;
///
/// setup_logger("kokuban-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_includes_binary_with_underscores() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換されてフィルタに含まれる
        // given (前提条件):
        let binary_name = "kokuban-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert!(filter.contains("kokuban_server=info"));
        assert!(filter.contains("kokuban_shared=info"));
        assert!(filter.contains("tower_http=info"));
        assert!(!filter.contains('-'));
    }
}
