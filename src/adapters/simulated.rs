//! Simulated predictor: stands in for the remote endpoint.
//!
//! Waits a fixed latency, then draws a uniform confidence in `[0, 1)`.
//! High risk iff confidence >= 0.5.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::{PredictionPayload, PredictionResult};
use crate::ports::{PredictionError, RiskPredictor};

/// Default simulated round-trip latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

/// Predictor that returns randomized results after a fixed delay.
pub struct SimulatedPredictor {
    latency: Duration,
    rng: Mutex<ChaCha20Rng>,
}

impl SimulatedPredictor {
    /// Create a predictor seeded from OS entropy.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Create a predictor with a fixed seed (reproducible draws).
    #[must_use]
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    fn draw_confidence(&self) -> Result<f64, PredictionError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PredictionError::Other("Simulator RNG lock poisoned".to_string()))?;
        Ok(rng.gen_range(0.0..1.0))
    }
}

impl Default for SimulatedPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl RiskPredictor for SimulatedPredictor {
    fn predict(&self, _payload: &PredictionPayload) -> Result<PredictionResult, PredictionError> {
        tracing::debug!(
            "Simulating prediction ({}ms latency)",
            self.latency.as_millis()
        );

        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let confidence = self.draw_confidence()?;
        let result = PredictionResult::from_confidence(confidence);

        tracing::info!(
            "Simulated prediction: risk={}, percentage={}%",
            result.risk,
            result.percentage()
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HealthFormData, RiskCategory, HIGH_RISK_MESSAGE, LOW_RISK_MESSAGE};
    use std::time::Instant;

    fn payload() -> PredictionPayload {
        PredictionPayload::from_form(&HealthFormData::sample())
    }

    #[test]
    fn test_result_is_consistent_with_confidence() {
        let predictor = SimulatedPredictor::with_seed(Duration::ZERO, 7);
        for _ in 0..200 {
            let result = predictor.predict(&payload()).expect("Should predict");
            assert!((0.0..1.0).contains(&result.confidence));
            match result.risk {
                RiskCategory::Low => {
                    assert!(result.confidence < 0.5);
                    // Only [0.495, 0.5) rounds up to 50.
                    assert!(result.percentage() < 50 || result.confidence >= 0.495);
                    assert_eq!(result.message, LOW_RISK_MESSAGE);
                }
                RiskCategory::High => {
                    assert!(result.percentage() >= 50);
                    assert_eq!(result.message, HIGH_RISK_MESSAGE);
                }
            }
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let a = SimulatedPredictor::with_seed(Duration::ZERO, 42);
        let b = SimulatedPredictor::with_seed(Duration::ZERO, 42);
        for _ in 0..5 {
            let ra = a.predict(&payload()).expect("Should predict");
            let rb = b.predict(&payload()).expect("Should predict");
            assert!((ra.confidence - rb.confidence).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_latency_is_applied() {
        let predictor = SimulatedPredictor::with_seed(Duration::from_millis(30), 1);
        let start = Instant::now();
        predictor.predict(&payload()).expect("Should predict");
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
