//! Session Control Channel
//!
//! The single component of this crate: it owns the lifecycle flag for the
//! (at most one) active navigation session and an ordered delivery path to
//! it. Each public operation checks the flag and hands the signal off in one
//! critical section, so two racing callers can never both observe Inactive
//! and both start a session.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::delivery::{InboxSink, SessionSignal, SignalInbox, SignalSink};
use crate::errors::{ChannelError, Result};
use crate::events::{EventPublisher, SessionEvent, StopReason};
use crate::types::{Annotation, ChannelStats, ControlMessage, SessionId, SessionState, Waypoint};

/// Configuration for a [`SessionControlChannel`]
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Capacity of the collaborator's signal inbox
    pub inbox_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { inbox_capacity: 64 }
    }
}

/// State guarded by the lifecycle lock
#[derive(Debug)]
struct Lifecycle {
    state: SessionState,
    /// Id of the live session; `Some` exactly while state is Active
    session_id: Option<SessionId>,
    stats: ChannelStats,
}

/// Serializes and delivers control messages to exactly one navigation
/// session, and tracks that session's lifecycle
///
/// Start policy: a `start` while a session is already active is rejected
/// with [`ChannelError::SessionAlreadyActive`]; the caller must `stop()`
/// first. The channel never spawns a duplicate session.
///
/// Delivery is fire-and-forget: no operation blocks on the collaborator,
/// and the channel guarantees send order only, not processing order.
pub struct SessionControlChannel {
    lifecycle: Mutex<Lifecycle>,
    sink: Arc<dyn SignalSink>,
    events: EventPublisher,
}

impl SessionControlChannel {
    /// Create a channel with default configuration, returning the inbox
    /// the collaborator drains
    pub fn new() -> (Self, SignalInbox) {
        Self::with_config(ChannelConfig::default())
    }

    /// Create a channel with a custom configuration
    pub fn with_config(config: ChannelConfig) -> (Self, SignalInbox) {
        let (sink, inbox) = InboxSink::new(config.inbox_capacity);
        (Self::with_sink(Arc::new(sink)), inbox)
    }

    /// Create a channel delivering through a caller-supplied sink
    pub fn with_sink(sink: Arc<dyn SignalSink>) -> Self {
        Self {
            lifecycle: Mutex::new(Lifecycle {
                state: SessionState::Inactive,
                session_id: None,
                stats: ChannelStats::default(),
            }),
            sink,
            events: EventPublisher::new(),
        }
    }

    // ===== Core Operations =====

    /// Start a session with the given route
    ///
    /// Fails with [`ChannelError::InvalidArgument`] on an empty route and
    /// [`ChannelError::SessionAlreadyActive`] while a session is live. On
    /// delivery failure no session is created and the state stays Inactive.
    pub fn start(&self, waypoints: Vec<Waypoint>) -> Result<SessionId> {
        if waypoints.is_empty() {
            return Err(ChannelError::invalid_argument(
                "start requires at least one waypoint",
            ));
        }

        let waypoint_count = waypoints.len();
        let mut lifecycle = self.lifecycle.lock();

        if lifecycle.state == SessionState::Active {
            let live = lifecycle
                .session_id
                .as_ref()
                .map(|id| id.0.clone())
                .unwrap_or_default();
            return Err(ChannelError::session_already_active(live));
        }

        let session_id = SessionId::new();
        if let Err(e) = self.sink.deliver(SessionSignal::Start {
            session_id: session_id.clone(),
            waypoints,
        }) {
            lifecycle.stats.delivery_failures += 1;
            tracing::warn!("Start delivery failed: {}", e);
            return Err(e);
        }

        lifecycle.state = SessionState::Active;
        lifecycle.session_id = Some(session_id.clone());
        lifecycle.stats.sessions_started += 1;
        lifecycle.stats.signals_delivered += 1;
        drop(lifecycle);

        tracing::debug!("Session {} state: Inactive -> Active", session_id);
        self.events.publish(SessionEvent::SessionStarted {
            session_id: session_id.clone(),
            waypoint_count,
            timestamp: chrono::Utc::now(),
        });
        Ok(session_id)
    }

    /// Append stops to the active route
    ///
    /// Fails with [`ChannelError::NoActiveSession`] while Inactive; nothing
    /// is delivered in that case. Signals are observed by the collaborator
    /// in exactly the order they were sent.
    pub fn add_waypoints(&self, waypoints: Vec<Waypoint>) -> Result<()> {
        if waypoints.is_empty() {
            return Err(ChannelError::invalid_argument(
                "add_waypoints requires at least one waypoint",
            ));
        }

        let count = waypoints.len();
        let mut lifecycle = self.lifecycle.lock();

        if lifecycle.state != SessionState::Active {
            return Err(ChannelError::no_active_session("add_waypoints"));
        }
        let session_id = lifecycle.session_id.clone().unwrap_or_else(SessionId::new);

        if let Err(e) = self.sink.deliver(SessionSignal::AddWaypoints {
            waypoints,
            is_addition: true,
        }) {
            lifecycle.stats.delivery_failures += 1;
            tracing::warn!("AddWaypoints delivery failed: {}", e);
            return Err(e);
        }
        lifecycle.stats.signals_delivered += 1;
        drop(lifecycle);

        tracing::debug!("Delivered {} waypoint(s) to session {}", count, session_id);
        self.events
            .publish(SessionEvent::WaypointsAdded { session_id, count });
        Ok(())
    }

    /// Stop the active session
    ///
    /// Idempotent: while Inactive this is a no-op, not an error. The flag
    /// is released even if the Stop signal cannot be delivered, so a gone
    /// collaborator never wedges the channel in Active; the delivery
    /// failure is still reported. Signals already in the inbox are not
    /// recalled and may be processed by the collaborator after this call.
    pub fn stop(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();

        if lifecycle.state == SessionState::Inactive {
            tracing::debug!("stop() while Inactive, nothing to do");
            return Ok(());
        }

        let session_id = lifecycle.session_id.take().unwrap_or_else(SessionId::new);
        lifecycle.state = SessionState::Inactive;
        lifecycle.stats.sessions_stopped += 1;

        let delivery = self.sink.deliver(SessionSignal::Stop);
        match &delivery {
            Ok(()) => lifecycle.stats.signals_delivered += 1,
            Err(e) => {
                lifecycle.stats.delivery_failures += 1;
                tracing::warn!("Stop delivery failed: {}", e);
            }
        }
        drop(lifecycle);

        tracing::debug!("Session {} state: Active -> Inactive", session_id);
        self.events.publish(SessionEvent::SessionStopped {
            session_id,
            reason: StopReason::CallerStopped,
            timestamp: chrono::Utc::now(),
        });
        delivery
    }

    /// Overlay annotation markers
    ///
    /// Succeeds in both lifecycle states: annotations are informational
    /// overlays, not session-dependent, so delivery does not require a live
    /// session.
    pub fn add_annotations(&self, annotations: Vec<Annotation>) -> Result<()> {
        if annotations.is_empty() {
            return Err(ChannelError::invalid_argument(
                "add_annotations requires at least one annotation",
            ));
        }

        let count = annotations.len();
        let mut lifecycle = self.lifecycle.lock();

        if let Err(e) = self
            .sink
            .deliver(SessionSignal::AddAnnotations { annotations })
        {
            lifecycle.stats.delivery_failures += 1;
            tracing::warn!("AddAnnotations delivery failed: {}", e);
            return Err(e);
        }
        lifecycle.stats.signals_delivered += 1;
        drop(lifecycle);

        tracing::debug!("Delivered {} annotation(s)", count);
        self.events.publish(SessionEvent::AnnotationsAdded { count });
        Ok(())
    }

    /// Dispatch a typed control message to the matching operation
    pub fn send(&self, message: ControlMessage) -> Result<()> {
        match message {
            ControlMessage::Start(waypoints) => self.start(waypoints).map(|_| ()),
            ControlMessage::AddWaypoints(waypoints) => self.add_waypoints(waypoints),
            ControlMessage::Stop => self.stop(),
            ControlMessage::AddAnnotations(annotations) => self.add_annotations(annotations),
        }
    }

    // ===== Collaborator Callbacks =====

    /// Record that the collaborator terminated the session on its own
    ///
    /// Releases the lifecycle flag only when `session_id` matches the live
    /// session; a stale notice for a session that already ended is ignored.
    pub fn on_session_terminated(&self, session_id: &SessionId) {
        let mut lifecycle = self.lifecycle.lock();

        if lifecycle.state != SessionState::Active
            || lifecycle.session_id.as_ref() != Some(session_id)
        {
            tracing::debug!("Ignoring stale termination notice for {}", session_id);
            return;
        }

        lifecycle.state = SessionState::Inactive;
        lifecycle.session_id = None;
        lifecycle.stats.sessions_stopped += 1;
        drop(lifecycle);

        tracing::debug!("Session {} terminated by collaborator", session_id);
        self.events.publish(SessionEvent::SessionStopped {
            session_id: session_id.clone(),
            reason: StopReason::CollaboratorTerminated,
            timestamp: chrono::Utc::now(),
        });
    }

    // ===== Accessors =====

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.lifecycle.lock().state
    }

    /// Id of the live session, if any
    pub fn current_session(&self) -> Option<SessionId> {
        self.lifecycle.lock().session_id.clone()
    }

    /// Counters since construction
    pub fn stats(&self) -> ChannelStats {
        self.lifecycle.lock().stats
    }

    /// Subscribe to lifecycle and delivery events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
