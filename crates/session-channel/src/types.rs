//! Core types shared across the channel: session ids, route points,
//! control messages, and lifecycle state.

use serde::{Deserialize, Serialize};

/// Session ID type
///
/// Assigned when a session starts and carried on every event that refers
/// to that session.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh unique id
    pub fn new() -> Self {
        Self(format!("session-{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route stop: geographic position plus an optional label
///
/// Immutable once constructed. Owned by the caller until handed to a
/// control message, then by the message until delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Optional display name
    pub name: Option<String>,
}

impl Waypoint {
    /// Create an unnamed waypoint
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    /// Create a named waypoint
    pub fn named(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name.into()),
        }
    }
}

/// A map marker independent of the session lifecycle
///
/// Same shape as [`Waypoint`] but semantically distinct: it marks a point
/// of interest rather than a route stop, and its delivery never requires a
/// live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Optional marker label
    pub label: Option<String>,
}

impl Annotation {
    /// Create an unlabeled annotation
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            label: None,
        }
    }

    /// Create a labeled annotation
    pub fn labeled(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            label: Some(label.into()),
        }
    }
}

/// Typed control message accepted by [`SessionControlChannel::send`]
///
/// Each message is constructed once, sent once, never mutated. Sequences
/// preserve caller order; duplicates are permitted and not deduplicated.
///
/// [`SessionControlChannel::send`]: crate::channel::SessionControlChannel::send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlMessage {
    /// Start a session with this route
    Start(Vec<Waypoint>),
    /// Append stops to the active route
    AddWaypoints(Vec<Waypoint>),
    /// Terminate the active session
    Stop,
    /// Overlay markers, independent of session state
    AddAnnotations(Vec<Annotation>),
}

/// Lifecycle state of the (at most one) navigation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session exists
    Inactive,
    /// Exactly one session is live
    Active,
}

/// Counters tracking channel activity since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Sessions started over the channel's lifetime
    pub sessions_started: usize,
    /// Sessions ended, whether by `stop()` or by collaborator termination
    pub sessions_stopped: usize,
    /// Signals successfully handed to the delivery layer
    pub signals_delivered: usize,
    /// Signals the delivery layer refused
    pub delivery_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique_and_prefixed() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert!(a.0.starts_with("session-"));
        assert_eq!(format!("{}", a), a.0);
    }

    #[test]
    fn waypoint_constructors() {
        let plain = Waypoint::new(37.7749, -122.4194);
        assert_eq!(plain.name, None);

        let named = Waypoint::named("Ferry Building", 37.7955, -122.3937);
        assert_eq!(named.name.as_deref(), Some("Ferry Building"));
        assert_eq!(named.latitude, 37.7955);
    }

    #[test]
    fn control_message_serializes_with_payload() {
        let msg = ControlMessage::Start(vec![Waypoint::named("Depot", 40.0, -73.9)]);
        let json = serde_json::to_string(&msg).unwrap();
        let back: ControlMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
