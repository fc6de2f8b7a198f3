//! Runtime configuration from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `HEARTCHECK_PREDICTOR` | `simulated` (or `http`) |
//! | `HEARTCHECK_ENDPOINT` | `http://localhost:8000` |
//! | `HEARTCHECK_REQUEST_TIMEOUT_SECS` | `30` |
//! | `HEARTCHECK_SIMULATED_LATENCY_MS` | `1500` |
//! | `HEARTCHECK_DEBOUNCE_MS` | `1000` |
//! | `HEARTCHECK_LOG_MODE` | `auto` (or `file`, `stdout`) |
//! | `HEARTCHECK_LOG_FILE` | `heartcheck.log` |

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{HttpPredictor, SimulatedPredictor};
use crate::ports::RiskPredictor;
use crate::{HeartcheckError, Result};

/// Which predictor backs the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictorBackend {
    Simulated { latency: Duration },
    Http { endpoint: String, timeout_secs: u64 },
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
    File,
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: PredictorBackend,
    pub debounce: Duration,
    pub log_mode: LogMode,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: PredictorBackend::Simulated {
                latency: crate::adapters::simulated::DEFAULT_LATENCY,
            },
            debounce: crate::application::DEFAULT_DEBOUNCE,
            log_mode: LogMode::Auto,
            log_file: "heartcheck.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `HeartcheckError::Config` for unknown modes or unparsable numbers.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (used by tests).
    ///
    /// # Errors
    /// Returns `HeartcheckError::Config` for unknown modes or unparsable numbers.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("HEARTCHECK_PREDICTOR").as_deref() {
            None | Some("simulated") => PredictorBackend::Simulated {
                latency: Duration::from_millis(parse_or(
                    &lookup,
                    "HEARTCHECK_SIMULATED_LATENCY_MS",
                    1500,
                )?),
            },
            Some("http") => PredictorBackend::Http {
                endpoint: lookup("HEARTCHECK_ENDPOINT")
                    .unwrap_or_else(|| "http://localhost:8000".to_string()),
                timeout_secs: parse_or(&lookup, "HEARTCHECK_REQUEST_TIMEOUT_SECS", 30)?,
            },
            Some(other) => {
                return Err(HeartcheckError::Config(format!(
                    "HEARTCHECK_PREDICTOR must be 'simulated' or 'http', got '{other}'"
                )))
            }
        };

        let debounce = Duration::from_millis(parse_or(
            &lookup,
            "HEARTCHECK_DEBOUNCE_MS",
            defaults.debounce.as_millis() as u64,
        )?);

        let log_mode = match lookup("HEARTCHECK_LOG_MODE").as_deref() {
            None | Some("auto") => LogMode::Auto,
            Some("file") => LogMode::File,
            Some("stdout") => LogMode::Stdout,
            Some(other) => {
                return Err(HeartcheckError::Config(format!(
                    "HEARTCHECK_LOG_MODE must be 'auto', 'file' or 'stdout', got '{other}'"
                )))
            }
        };

        Ok(Self {
            backend,
            debounce,
            log_mode,
            log_file: lookup("HEARTCHECK_LOG_FILE").unwrap_or(defaults.log_file),
        })
    }

    /// Construct the configured predictor.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn build_predictor(&self) -> Result<Arc<dyn RiskPredictor>> {
        let predictor: Arc<dyn RiskPredictor> = match &self.backend {
            PredictorBackend::Simulated { latency } => Arc::new(SimulatedPredictor::new(*latency)),
            PredictorBackend::Http {
                endpoint,
                timeout_secs,
            } => Arc::new(HttpPredictor::new(endpoint, *timeout_secs)?),
        };
        Ok(predictor)
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            HeartcheckError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}
