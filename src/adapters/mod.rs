//! Adapters layer: Concrete implementations of ports.
//!
//! - `simulated`: randomized stand-in for the prediction endpoint
//! - `http`: reqwest client for a real prediction endpoint
//! - `sanitize`: clinical-value and secret filtering for logs

pub mod http;
pub mod sanitize;
pub mod simulated;

pub use http::HttpPredictor;
pub use simulated::SimulatedPredictor;
