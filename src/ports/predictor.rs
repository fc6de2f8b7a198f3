//! Risk predictor port: Trait for the prediction endpoint.
//!
//! This trait abstracts the transport (simulated or HTTP) from the
//! orchestration logic.

use thiserror::Error;

use crate::domain::{PredictionPayload, PredictionResult};

/// Errors raised by a predictor call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredictionError {
    #[error("Cannot connect to prediction server at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

impl PredictionError {
    /// Whether the failure means the server could not be reached at all.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    /// Banner text shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(_) | Self::Timeout(_) => {
                "Could not reach the prediction server. Check your connection or try again later."
                    .to_string()
            }
            Self::Status { .. } => format!(
                "The prediction server returned an error: {self}. Please try again later."
            ),
            Self::InvalidResponse(_) | Self::Other(_) => format!("Prediction failed: {self}"),
        }
    }
}

/// Trait for risk predictors.
///
/// Implementations block the calling thread for the duration of the call;
/// the orchestrator runs them on worker threads.
pub trait RiskPredictor: Send + Sync {
    /// Predict cardiovascular risk for an encoded form.
    ///
    /// # Errors
    /// Returns a classified `PredictionError` on any non-success outcome.
    fn predict(&self, payload: &PredictionPayload) -> Result<PredictionResult, PredictionError>;

    /// Short name for logs and the status bar.
    fn name(&self) -> &str;
}
