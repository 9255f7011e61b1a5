//! Delivery seam between the channel and the navigation collaborator
//!
//! The collaborator (the SDK-backed session renderer) is an opaque external
//! actor: the channel only hands it typed signals and never waits for an
//! acknowledgment. This module defines the wire enum for those signals, the
//! [`SignalSink`] trait the channel delivers through, and the shipped
//! mpsc-backed implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::errors::{ChannelError, Result};
use crate::types::{Annotation, SessionId, Waypoint};

/// A signal crossing the collaborator boundary
///
/// The channel guarantees send order only; the collaborator schedules its
/// own processing independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionSignal {
    /// Create and launch a session with this route
    Start {
        session_id: SessionId,
        waypoints: Vec<Waypoint>,
    },
    /// Append stops to the active route
    AddWaypoints {
        waypoints: Vec<Waypoint>,
        /// Marks the payload as an addition to an existing route rather
        /// than a fresh route
        is_addition: bool,
    },
    /// Terminate the active session, if any
    Stop,
    /// Overlay annotation markers, independent of session state
    AddAnnotations { annotations: Vec<Annotation> },
}

impl SessionSignal {
    /// Short name used in logs and delivery errors
    pub fn name(&self) -> &'static str {
        match self {
            SessionSignal::Start { .. } => "Start",
            SessionSignal::AddWaypoints { .. } => "AddWaypoints",
            SessionSignal::Stop => "Stop",
            SessionSignal::AddAnnotations { .. } => "AddAnnotations",
        }
    }
}

/// Where the channel hands signals off
///
/// Implementations must not block: delivery is fire-and-forget, and the
/// channel calls `deliver` while holding its lifecycle lock to keep the
/// state check and the send a single atomic step.
pub trait SignalSink: Send + Sync {
    /// Hand one signal to the collaborator
    fn deliver(&self, signal: SessionSignal) -> Result<()>;
}

/// Bounded mpsc sink feeding a [`SignalInbox`]
///
/// A full inbox or a dropped receiver surfaces as
/// [`ChannelError::DeliveryFailed`] rather than being swallowed.
pub struct InboxSink {
    tx: mpsc::Sender<SessionSignal>,
}

impl InboxSink {
    /// Create a sink/inbox pair with the given capacity
    pub fn new(capacity: usize) -> (Self, SignalInbox) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, SignalInbox { rx })
    }
}

impl SignalSink for InboxSink {
    fn deliver(&self, signal: SessionSignal) -> Result<()> {
        let name = signal.name();
        self.tx.try_send(signal).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "inbox full",
                mpsc::error::TrySendError::Closed(_) => "collaborator gone",
            };
            ChannelError::delivery_failed(name, reason)
        })
    }
}

/// Receiver handle the collaborator drains
///
/// Signals come out in exactly the order the channel sent them.
pub struct SignalInbox {
    rx: mpsc::Receiver<SessionSignal>,
}

impl SignalInbox {
    /// Wait for the next signal; `None` once the channel side is dropped
    pub async fn recv(&mut self) -> Option<SessionSignal> {
        self.rx.recv().await
    }

    /// Non-blocking poll for a pending signal
    pub fn try_recv(&mut self) -> Option<SessionSignal> {
        self.rx.try_recv().ok()
    }
}
