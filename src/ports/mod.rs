//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (the prediction endpoint).

mod predictor;

pub use predictor::{PredictionError, RiskPredictor};
