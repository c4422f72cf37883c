// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Environment configuration and logging setup.

use std::io;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable controlling the log filter.
pub const ENV_LOG: &str = "RUST_LOG";

/// Resolve an environment variable or fall back to a default.
pub fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Resolve the current working directory.
pub fn work_dir() -> io::Result<PathBuf> {
    std::env::current_dir()
}

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level if `RUST_LOG` is not set.
    pub default_level: Level,

    /// Whether to include target module path.
    pub include_target: bool,

    /// Whether to use ANSI colors in output.
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Verbose configuration for debugging scans.
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_target: true,
            ansi_colors: true,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured default level. Safe to call once;
/// later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string().to_lowercase()));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(config.include_target)
        .with_ansi(config.ansi_colors)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_fallback() {
        let value = env_or("OTELSCAN_TEST_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert!(!config.include_target);

        let verbose = LogConfig::verbose();
        assert_eq!(verbose.default_level, Level::DEBUG);
        assert!(verbose.include_target);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig::verbose());
    }
}
