//! Background prediction worker.
//!
//! Each prediction call runs on its own thread so the TUI main loop stays
//! responsive; the outcome is reported back over a channel.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::domain::{PredictionPayload, PredictionResult};
use crate::ports::{PredictionError, RiskPredictor};

/// Result of one prediction call, tagged with its submission sequence number.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub seq: u64,
    pub silent: bool,
    pub result: Result<PredictionResult, PredictionError>,
}

/// Spawns prediction calls on background threads.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Run `predictor` on `payload` in the background.
    ///
    /// The outcome is sent on `tx`; if the receiver is gone the outcome is
    /// dropped. A panicking predictor is reported as `PredictionError::Other`,
    /// so every spawned call produces exactly one outcome.
    pub fn spawn<P>(
        predictor: Arc<P>,
        payload: PredictionPayload,
        seq: u64,
        silent: bool,
        tx: Sender<PredictionOutcome>,
    ) -> JoinHandle<()>
    where
        P: RiskPredictor + ?Sized + 'static,
    {
        thread::spawn(move || {
            tracing::debug!(seq, silent, "Prediction call started ({})", predictor.name());
            let result = panic::catch_unwind(AssertUnwindSafe(|| predictor.predict(&payload)))
                .unwrap_or_else(|_| {
                    tracing::error!(seq, "Predictor {} panicked", predictor.name());
                    Err(PredictionError::Other("Predictor panicked".to_string()))
                });
            if tx.send(PredictionOutcome { seq, silent, result }).is_err() {
                tracing::debug!(seq, "Orchestrator gone; dropping prediction outcome");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedPredictor;
    use crate::domain::HealthFormData;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_outcome_is_tagged() {
        let (tx, rx) = mpsc::channel();
        let predictor = Arc::new(SimulatedPredictor::with_seed(Duration::ZERO, 3));
        let payload = PredictionPayload::from_form(&HealthFormData::sample());

        let handle = PredictionWorker::spawn(predictor, payload, 9, true, tx);
        handle.join().expect("Worker should not panic");

        let outcome = rx.recv_timeout(Duration::from_secs(1)).expect("Should receive");
        assert_eq!(outcome.seq, 9);
        assert!(outcome.silent);
        assert!(outcome.result.is_ok());
    }

    struct PanickingPredictor;

    impl RiskPredictor for PanickingPredictor {
        fn predict(&self, _: &PredictionPayload) -> Result<PredictionResult, PredictionError> {
            panic!("model crashed");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_panic_is_reported_as_error() {
        let (tx, rx) = mpsc::channel();
        let payload = PredictionPayload::from_form(&HealthFormData::sample());

        let handle = PredictionWorker::spawn(Arc::new(PanickingPredictor), payload, 4, false, tx);
        assert!(handle.join().is_ok(), "panic must not escape the worker");

        let outcome = rx.recv_timeout(Duration::from_secs(1)).expect("Should receive");
        assert_eq!(outcome.seq, 4);
        assert_eq!(
            outcome.result,
            Err(PredictionError::Other("Predictor panicked".to_string()))
        );
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let predictor = Arc::new(SimulatedPredictor::with_seed(Duration::ZERO, 3));
        let payload = PredictionPayload::from_form(&HealthFormData::sample());

        let handle = PredictionWorker::spawn(predictor, payload, 1, false, tx);
        assert!(handle.join().is_ok());
    }
}
