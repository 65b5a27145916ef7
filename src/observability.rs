//! Logging setup and scan spans.
//!
//! The library only emits `tracing` events. Installing a subscriber is left
//! to the binary via [`init_tracing`].

use tracing::{Level, Span, span};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl TracingLevel {
    /// Maps a `-v` count onto a level, starting from the default.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn as_directive(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub level: TracingLevel,
    pub with_target: bool,
}

impl TracingConfig {
    pub fn new(level: TracingLevel) -> Self {
        Self {
            level,
            with_target: false,
        }
    }

    /// `RUST_LOG` wins over the configured level when set.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_directive()))
    }
}

/// Installs a stderr `fmt` subscriber. Stdout stays reserved for output.
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> crate::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| crate::Error::Config(format!("Failed to initialise tracing: {e}")))
}

pub fn scan_span(root: &std::path::Path) -> Span {
    span!(Level::INFO, "interchart.scan", root = %root.display())
}
