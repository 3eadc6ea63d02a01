//! Error types for the bridge.
//!
//! Every failure surfaces synchronously to the caller; nothing here is retried.
//! Release-time failures never reach this type, they are logged and dropped.

use crate::channel::ChannelError;
use crate::value::Handle;
use thiserror::Error;

/// Main error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport failure, passed through unmodified from the channel.
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// An exception raised inside the remote runtime (a `!!!` response line).
    #[error("Remote error: {message}")]
    Remote { message: String },

    /// The response does not follow the wrap/unwrap grammar.
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A path segment was missing during a dive.
    #[error("{}", describe_dive(.reached.as_deref(), .missing))]
    Dive {
        /// Last segment that was reached, `None` when the first one is missing.
        reached: Option<String>,
        missing: String,
    },

    /// The proxy behind this handle has been released.
    #[error("Invalid handle: {0} has been released")]
    InvalidHandle(Handle),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

fn describe_dive(reached: Option<&str>, missing: &str) -> String {
    match reached {
        Some(reached) => format!("Dive failed: '{}' not found after '{}'", missing, reached),
        None => format!("Dive failed: '{}' not found on the root object", missing),
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Protocol {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl BridgeError {
    /// Create a protocol error without an underlying parse error.
    pub fn protocol(message: impl Into<String>) -> Self {
        BridgeError::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// True when the failure came from the transport rather than the remote runtime.
    pub fn is_channel_failure(&self) -> bool {
        matches!(self, BridgeError::Channel(_) | BridgeError::SessionClosed)
    }
}
