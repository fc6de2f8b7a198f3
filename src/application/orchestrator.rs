//! Prediction orchestrator: owns the form, the latest result and the
//! auto-refresh loop.
//!
//! This service coordinates:
//! - Encoding the form and running the predictor in the background
//! - Loading and error state for the UI
//! - Debounced silent re-prediction after the first successful result
//!
//! All state lives on the caller's (UI) thread. Predictor calls run on
//! worker threads and are applied by `poll()`.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::debounce::RefreshTimer;
use super::worker::{PredictionOutcome, PredictionWorker};
use crate::domain::{HealthFormData, PredictionPayload, PredictionResult};
use crate::ports::RiskPredictor;

/// Quiet period before an edit triggers a silent re-prediction.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Owns the canonical form data and prediction state.
///
/// Every submission gets a sequence number. An outcome is applied only if it
/// is newer than the last applied outcome and was issued after the last
/// reset, so a slow response can never overwrite a fresher one.
pub struct PredictionOrchestrator<P>
where
    P: RiskPredictor + ?Sized + 'static,
{
    predictor: Arc<P>,

    form: HealthFormData,
    result: Option<PredictionResult>,
    error: Option<String>,
    auto_update: bool,

    timer: RefreshTimer,

    /// Last sequence number handed out
    issued_seq: u64,
    /// Outcomes at or below this sequence number are stale
    applied_seq: u64,
    /// Non-silent calls still running (drive the loading flag)
    visible_pending: HashSet<u64>,
    /// All calls still running
    outstanding: usize,

    tx: Sender<PredictionOutcome>,
    rx: Receiver<PredictionOutcome>,
}

impl<P> PredictionOrchestrator<P>
where
    P: RiskPredictor + ?Sized + 'static,
{
    /// Create an orchestrator with default form data.
    pub fn new(predictor: Arc<P>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            predictor,
            form: HealthFormData::default(),
            result: None,
            error: None,
            auto_update: false,
            timer: RefreshTimer::new(debounce),
            issued_seq: 0,
            applied_seq: 0,
            visible_pending: HashSet::new(),
            outstanding: 0,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn form(&self) -> &HealthFormData {
        &self.form
    }

    #[must_use]
    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a user-initiated (non-silent) call is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.visible_pending.is_empty()
    }

    #[must_use]
    pub fn auto_update_enabled(&self) -> bool {
        self.auto_update
    }

    /// When the pending silent refresh will fire, if one is armed.
    #[must_use]
    pub fn refresh_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Number of predictor calls that have not reported back yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.outstanding
    }

    #[must_use]
    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }

    /// Start a prediction for the current form.
    ///
    /// A silent submission never touches the loading flag. Returns the
    /// sequence number of the call.
    pub fn submit(&mut self, silent: bool) -> u64 {
        self.issued_seq += 1;
        let seq = self.issued_seq;

        if !silent {
            self.visible_pending.insert(seq);
        }
        self.error = None;

        let payload = PredictionPayload::from_form(&self.form);
        tracing::info!(seq, silent, "Submitting prediction via {}", self.predictor.name());

        self.outstanding += 1;
        // Detached: the outcome arrives on the channel.
        let _ = PredictionWorker::spawn(
            Arc::clone(&self.predictor),
            payload,
            seq,
            silent,
            self.tx.clone(),
        );

        seq
    }

    /// Replace the form data wholesale after a user edit.
    pub fn on_field_change(&mut self, data: HealthFormData) {
        self.on_field_change_at(data, Instant::now());
    }

    /// `on_field_change` with an explicit clock reading.
    pub fn on_field_change_at(&mut self, data: HealthFormData, now: Instant) {
        self.form = data;
        // Editing acknowledges the previous error.
        self.error = None;
        self.reconcile(now);
    }

    /// Start a new assessment: clear everything and stop auto-refresh.
    ///
    /// Calls still in flight are discarded when they report back.
    pub fn reset(&mut self) {
        tracing::info!("Resetting assessment");
        self.result = None;
        self.error = None;
        self.auto_update = false;
        self.form = HealthFormData::default();
        self.timer.disarm();
        self.applied_seq = self.issued_seq;
        self.visible_pending.clear();
    }

    /// Apply finished calls and fire the refresh timer if due.
    ///
    /// Returns `true` if any visible state changed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// `poll` with an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome, now);
        }

        if self.timer.fire_if_due(now) {
            tracing::debug!("Auto-refresh timer fired");
            self.submit(true);
            changed = true;
        }

        changed
    }

    /// Block until every outstanding call has reported back.
    ///
    /// Does not fire the refresh timer. Returns `false` on timeout.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome, Instant::now());
                }
                Err(RecvTimeoutError::Timeout) => return false,
                // Unreachable while `self.tx` is alive.
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }

        true
    }

    fn apply(&mut self, outcome: PredictionOutcome, now: Instant) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);
        let was_loading = self.is_loading();
        self.visible_pending.remove(&outcome.seq);
        let loading_changed = was_loading != self.is_loading();

        if outcome.seq <= self.applied_seq {
            tracing::debug!(
                seq = outcome.seq,
                applied = self.applied_seq,
                "Discarding stale prediction outcome"
            );
            return loading_changed;
        }
        self.applied_seq = outcome.seq;

        match outcome.result {
            Ok(result) => {
                tracing::info!(
                    seq = outcome.seq,
                    silent = outcome.silent,
                    "Prediction complete: risk={}, percentage={}%",
                    result.risk,
                    result.percentage()
                );
                self.result = Some(result);
                self.auto_update = true;
                self.reconcile(now);
            }
            Err(e) => {
                tracing::warn!(seq = outcome.seq, "Prediction failed: {}", e);
                self.error = Some(e.user_message());
            }
        }

        true
    }

    /// Arm or disarm the refresh timer for the current state.
    fn reconcile(&mut self, now: Instant) {
        if self.auto_update && self.result.is_some() && self.form.is_complete() {
            self.timer.arm(now);
        } else {
            self.timer.disarm();
        }
    }
}

impl<P> Drop for PredictionOrchestrator<P>
where
    P: RiskPredictor + ?Sized + 'static,
{
    fn drop(&mut self) {
        self.timer.disarm();
        if self.outstanding > 0 {
            tracing::debug!("Detaching {} in-flight prediction call(s)", self.outstanding);
        }
    }
}
