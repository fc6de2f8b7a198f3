//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Encoding and validation are total functions over `HealthFormData`.

pub mod encoder;
pub mod form;
mod prediction;
pub mod validation;

pub use encoder::PredictionPayload;
pub use form::{ChestPainType, Choice, HealthFormData, RestingEcg, Sex, Slope, Thalassemia};
pub use prediction::{
    percentage_of, PredictionResult, RiskCategory, HIGH_RISK_MESSAGE, LOW_RISK_MESSAGE,
};
pub use validation::{validate, FormField, ValidationErrors};
