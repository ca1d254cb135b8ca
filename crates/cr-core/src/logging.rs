//! Structured logging foundation for cr-core.
//!
//! Dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for agent workflows
//!
//! stdout is reserved for command payloads (the recommendation JSON or text
//! report); all log output goes to stderr. The filter is driven by `CR_LOG`
//! or `RUST_LOG`, with CLI flags taking precedence.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Logging configuration resolved from environment and CLI flags.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "cr_core=debug".
    pub filter: Option<String>,
    /// Output format.
    pub format: LogFormat,
}

impl LogConfig {
    /// Resolve configuration from environment, with optional CLI overrides.
    pub fn from_env(filter: Option<String>, format: Option<LogFormat>) -> Self {
        let env_filter = std::env::var("CR_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        LogConfig {
            filter: filter.or(env_filter),
            format: format.unwrap_or_default(),
        }
    }
}

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize global logging once at startup.
///
/// Subsequent calls are no-ops, which keeps tests that construct the CLI
/// repeatedly from panicking on double subscriber registration.
pub fn init_logging(config: &LogConfig) {
    LOGGING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(config.filter.as_deref().unwrap_or("warn"))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        match config.format {
            LogFormat::Human => {
                let _ = fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .try_init();
            }
            LogFormat::Jsonl => {
                let _ = fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
    });
}
