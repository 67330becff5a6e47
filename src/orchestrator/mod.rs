//! Optimization orchestrator: owns the request lifecycle.
//!
//! State machine: `Idle → InFlight → Complete | Failed`, repeated per
//! attempt. The orchestrator is the only writer of [`RequestState`] and the
//! only translator from transport errors to user-facing [`ErrorInfo`].
//!
//! `optimize` takes `&mut self`, so a second attempt cannot start while one
//! is in flight on the same instance: overlapping calls are rejected at
//! compile time rather than superseded.

pub mod fallback;

use std::sync::Arc;
use std::time::Instant;

use crate::analytics::logger::{EventEntry, EventKind, EventLog};
use crate::api::AnalysisTransport;
use crate::api::normalize::normalize;
use crate::config::schema::FeatureFlags;
use crate::error::{ErrorInfo, GreenCodeError, Result};
use crate::events::{OptimizationEvent, ResultPublisher, SubscriptionId};
use crate::model::{OptimizationRequest, OptimizationResult, RequestState};

/// Message for empty or whitespace-only input.
pub const EMPTY_CODE_MESSAGE: &str = "Please enter code to analyze";

/// Drives optimization attempts against an [`AnalysisTransport`].
#[derive(Debug)]
pub struct Orchestrator<T: AnalysisTransport> {
    transport: T,
    state: RequestState,
    publisher: ResultPublisher,
    use_real_api: bool,
    mock_fallback: bool,
    log: EventLog,
}

impl<T: AnalysisTransport> Orchestrator<T> {
    /// Build an orchestrator with the given feature flags and no event log.
    pub fn new(transport: T, features: &FeatureFlags) -> Self {
        Self {
            transport,
            state: RequestState::Idle,
            publisher: ResultPublisher::new(),
            use_real_api: features.use_real_api,
            mock_fallback: features.mock_fallback,
            log: EventLog::disabled(),
        }
    }

    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Subscribe to future attempt outcomes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&OptimizationEvent) + 'static,
    ) -> SubscriptionId {
        self.publisher.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe(id)
    }

    pub fn publisher_mut(&mut self) -> &mut ResultPublisher {
        &mut self.publisher
    }

    /// Return to `Idle`, dropping the last result. Nothing is published.
    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }

    /// Run one optimization attempt.
    ///
    /// Empty input is rejected before any state change or network call.
    /// Every other attempt ends in `Complete` or `Failed` and publishes
    /// exactly one event. The result fully replaces the previous one.
    pub fn optimize(&mut self, request: &OptimizationRequest) -> Result<Arc<OptimizationResult>> {
        if request.source_code.trim().is_empty() {
            return Err(GreenCodeError::Validation(EMPTY_CODE_MESSAGE.to_string()));
        }

        self.state = RequestState::InFlight;
        let start = Instant::now();
        let outcome = self.attempt(request);
        let latency_ms = start.elapsed().as_millis() as u64;

        let mut entry = EventEntry::new(
            EventKind::Optimize,
            if outcome.is_ok() { "complete" } else { "failed" },
        );
        entry.context = Some(request.context.to_string());
        entry.model = Some(request.model.clone());
        entry.latency_ms = Some(latency_ms);

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                entry.source = Some(result.source.to_string());
                entry.score_improvement = result.score.map(|s| s.improvement);
                entry.message = result.warning.clone();
                self.log.record(&entry);

                self.state = RequestState::Complete(Arc::clone(&result));
                self.publisher
                    .publish(&OptimizationEvent::Completed(Arc::clone(&result)));
                Ok(result)
            }
            Err(err) => {
                let info = ErrorInfo::from(&err);
                entry.error_kind = Some(info.kind.to_string());
                entry.message = Some(err.to_string());
                self.log.record(&entry);

                self.state = RequestState::Failed(info.clone());
                self.publisher.publish(&OptimizationEvent::Failed(info));
                Err(err)
            }
        }
    }

    fn attempt(&self, request: &OptimizationRequest) -> Result<OptimizationResult> {
        if !self.use_real_api {
            return Ok(fallback::mock_result());
        }

        match self.transport.send(request) {
            // Malformed payloads are not transport failures: no fallback.
            Ok(payload) => normalize(payload),
            Err(err) if self.mock_fallback => {
                let mut result = fallback::mock_result();
                result.warning = Some(format!(
                    "API Error: {err}. Using simulated data instead."
                ));
                Ok(result)
            }
            Err(err) => Err(err),
        }
    }
}
