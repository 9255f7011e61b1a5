//! Error types for the session control channel

use thiserror::Error;

/// Result type for channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Errors that can occur on the session control channel
///
/// All of these are local and recoverable: they are reported to the caller
/// synchronously and never terminate the process.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// An empty sequence was supplied where a non-empty one is required
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A session-bound operation was requested while no session is active
    #[error("No active session for operation: {operation}")]
    NoActiveSession { operation: String },

    /// Start was requested while a session is already active
    #[error("Session already active: {session_id}")]
    SessionAlreadyActive { session_id: String },

    /// The delivery layer could not hand the signal to the collaborator
    #[error("Delivery of {signal} failed: {reason}")]
    DeliveryFailed { signal: String, reason: String },
}

impl ChannelError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a no-active-session error
    pub fn no_active_session(operation: impl Into<String>) -> Self {
        Self::NoActiveSession {
            operation: operation.into(),
        }
    }

    /// Create a session-already-active error
    pub fn session_already_active(session_id: impl Into<String>) -> Self {
        Self::SessionAlreadyActive {
            session_id: session_id.into(),
        }
    }

    /// Create a delivery failure error
    pub fn delivery_failed(signal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            signal: signal.into(),
            reason: reason.into(),
        }
    }
}
