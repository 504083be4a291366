//! Tracing subscriber setup

use chica_domain::{ChicaError, Result};
use tracing_subscriber::EnvFilter;

use crate::config::loader::env_bool;

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset or invalid
    pub default_level: String,
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { default_level: "info".to_string(), json: false }
    }
}

impl LogConfig {
    /// Defaults, with `CHICA_LOG_JSON` toggling JSON output
    #[must_use]
    pub fn from_env() -> Self {
        Self { json: env_bool("CHICA_LOG_JSON", false), ..Self::default() }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_level))
    }
}

/// Install the global subscriber
///
/// # Errors
/// `ChicaError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(config.filter()).with_target(true);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().try_init()
    };

    installed
        .map_err(|e| ChicaError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
