//! Domain events emitted by the search loop.
//!
//! Events are published when a search changes phase or a cycle completes.
//! Subscribers (display, logging) react without feeding back into the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

use crate::session::SessionId;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A new search session started
    SearchStarted {
        session_id: SessionId,
        target: String,
        timestamp: DateTime<Utc>,
    },

    /// A cycle returned guidance
    GuidanceReceived {
        session_id: SessionId,
        guidance: String,
        found: bool,
        timestamp: DateTime<Utc>,
    },

    /// The recognizer located the target
    ObjectFound {
        session_id: SessionId,
        target: String,
        cycles: u64,
        timestamp: DateTime<Utc>,
    },

    /// The search was cancelled or torn down
    SearchStopped {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },

    /// A cycle was abandoned because capture or recognition failed
    CycleFailed {
        session_id: SessionId,
        stage: String, // "capture", "recognize"
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A tick came due but no cycle ran
    CycleSkipped {
        session_id: SessionId,
        reason: String, // "camera_not_ready", "busy"
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
/// Slow subscribers lag and drop events; publishers never block.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers. Returns how many received it.
    pub fn publish(&self, event: DomainEvent) -> usize {
        match self.sender.send(Arc::new(event)) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                trace!(event = ?event, "No subscribers for domain event");
                0
            }
        }
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
