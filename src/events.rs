//! Result distribution: a single-writer, multi-reader publisher.
//!
//! The orchestrator owns one [`ResultPublisher`] and publishes exactly one
//! [`OptimizationEvent`] per attempt. Subscribers receive a shared reference
//! and cannot mutate the payload. There is no replay: a subscriber added
//! after a publish sees only later events, so initial renders read the
//! orchestrator's state directly.

use std::sync::Arc;

use crate::error::ErrorInfo;
use crate::model::OptimizationResult;

/// Outcome of one optimization attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationEvent {
    Completed(Arc<OptimizationResult>),
    Failed(ErrorInfo),
}

/// Handle returned by [`ResultPublisher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&OptimizationEvent)>;

/// Observer list notified in subscription order.
#[derive(Default)]
pub struct ResultPublisher {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl ResultPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for future events.
    pub fn subscribe(&mut self, callback: impl FnMut(&OptimizationEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every current subscriber.
    pub fn publish(&mut self, event: &OptimizationEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for ResultPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPublisher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
