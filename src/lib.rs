//! # Heartcheck
//!
//! Cardiovascular risk intake form for the terminal.
//!
//! This crate provides:
//! - Validation and encoding of thirteen clinical parameters
//! - A prediction orchestrator with debounced live re-assessment
//! - Pluggable risk predictors (simulated or remote HTTP endpoint)
//! - Terminal UI for data entry and result presentation
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (form data, encoder, validator, prediction result)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (simulated predictor, HTTP, log sanitizer)
//! - `application`: Prediction orchestration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{HealthFormData, PredictionPayload, PredictionResult, RiskCategory};

/// Result type for Heartcheck operations
pub type Result<T> = std::result::Result<T, HeartcheckError>;

/// Main error type for Heartcheck
#[derive(Debug, thiserror::Error)]
pub enum HeartcheckError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] ports::PredictionError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
