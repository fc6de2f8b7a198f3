//! Application layer: Use cases and services.
//!
//! The orchestrator ties the form to a predictor port, running calls in
//! the background and scheduling silent refreshes.

mod debounce;
mod orchestrator;
mod worker;

pub use debounce::RefreshTimer;
pub use orchestrator::{PredictionOrchestrator, DEFAULT_DEBOUNCE};
pub use worker::{PredictionOutcome, PredictionWorker};
