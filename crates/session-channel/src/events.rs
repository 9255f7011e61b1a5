//! Channel Event System
//!
//! Caller-side observability using tokio::sync::broadcast. Events mirror the
//! channel's lifecycle transitions and deliveries; publishing is best-effort,
//! so a channel with no subscribers keeps working unchanged.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::SessionId;

/// Default capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Why a session went from Active to Inactive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The caller invoked `stop()`
    CallerStopped,
    /// The collaborator signaled that the session terminated on its own
    CollaboratorTerminated,
}

/// Events published by the channel as it processes control messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A session was created
    SessionStarted {
        session_id: SessionId,
        waypoint_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Waypoints were appended to the active route
    WaypointsAdded {
        session_id: SessionId,
        count: usize,
    },

    /// The session ended
    SessionStopped {
        session_id: SessionId,
        reason: StopReason,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Annotations were overlaid (session-independent)
    AnnotationsAdded { count: usize },
}

/// Broadcast publisher for [`SessionEvent`]
#[derive(Debug)]
pub struct EventPublisher {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventPublisher {
    /// Create a publisher with the default capacity
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to subsequent events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; a send error just means nobody is listening
    pub fn publish(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No event subscribers, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.publish(SessionEvent::AnnotationsAdded { count: 2 });

        match rx.recv().await.unwrap() {
            SessionEvent::AnnotationsAdded { count } => assert_eq!(count, 2),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher.publish(SessionEvent::AnnotationsAdded { count: 1 });
    }
}
