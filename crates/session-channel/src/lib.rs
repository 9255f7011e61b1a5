//! # Navbridge Session Channel
//!
//! An in-process control channel for a single navigation session. Callers
//! hand it typed control messages — start, add-waypoints, stop,
//! add-annotations — and the channel delivers them reliably, in order, to
//! the one active session, whether that session is just starting up or
//! already running.
//!
//! The navigation session itself is an opaque external collaborator: the
//! channel reaches it only through four fire-and-forget signals and never
//! models its routing or rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use navbridge_session_channel::{SessionControlChannel, Waypoint};
//!
//! # fn main() -> navbridge_session_channel::Result<()> {
//! // The inbox end goes to whatever materializes the session.
//! let (channel, mut inbox) = SessionControlChannel::new();
//!
//! let session = channel.start(vec![
//!     Waypoint::named("Depot", 37.7749, -122.4194),
//!     Waypoint::new(37.7955, -122.3937),
//! ])?;
//! assert_eq!(channel.current_session(), Some(session));
//!
//! channel.add_waypoints(vec![Waypoint::new(37.8044, -122.2712)])?;
//! channel.stop()?;
//!
//! // The collaborator drains the signals in send order.
//! assert!(matches!(
//!     inbox.try_recv(),
//!     Some(navbridge_session_channel::SessionSignal::Start { .. })
//! ));
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - At most one session is active at any time; a second `start` is
//!   rejected, never silently duplicated.
//! - Signals reach the collaborator in exactly the order they were sent
//!   (send order, not processing order).
//! - `stop()` is idempotent; annotations deliver with or without a live
//!   session.
//! - No operation blocks: a full or disconnected inbox surfaces as a
//!   `DeliveryFailed` error instead.

#![warn(missing_docs)]

pub mod channel;
pub mod delivery;
pub mod errors;
pub mod events;
pub mod types;

// Re-export main types
pub use channel::{ChannelConfig, SessionControlChannel};
pub use delivery::{InboxSink, SessionSignal, SignalInbox, SignalSink};
pub use errors::{ChannelError, Result};
pub use events::{SessionEvent, StopReason};
pub use types::{Annotation, ChannelStats, ControlMessage, SessionId, SessionState, Waypoint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
