//! Command channel abstraction.
//!
//! The channel is the only way the bridge talks to the remote runtime: it hands
//! over a piece of script source and blocks until the runtime's printed
//! response comes back. Framing, timeouts, retries and mutual exclusion between
//! concurrent callers all belong to the implementation, not to the bridge.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a channel implementation.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel disconnected: {0}")]
    Disconnected(String),

    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// A synchronous request/response link to a remote script runtime.
pub trait CommandChannel: Send + Sync {
    /// Execute `code` remotely and return the raw response text.
    ///
    /// The response must not be interpreted here; error lines and structured
    /// results are decoded by the bridge.
    fn execute(&self, code: &str) -> Result<String, ChannelError>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for Arc<C> {
    fn execute(&self, code: &str) -> Result<String, ChannelError> {
        (**self).execute(code)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn execute(&self, code: &str) -> Result<String, ChannelError> {
        (**self).execute(code)
    }
}

/// Channel backed by a closure, see [`from_fn`].
pub struct FnChannel<F> {
    handler: F,
}

/// Build a channel from a closure.
///
/// Useful for canned responses and for adapting an existing transport that is
/// already a plain function.
pub fn from_fn<F>(handler: F) -> FnChannel<F>
where
    F: Fn(&str) -> Result<String, ChannelError> + Send + Sync,
{
    FnChannel { handler }
}

impl<F> CommandChannel for FnChannel<F>
where
    F: Fn(&str) -> Result<String, ChannelError> + Send + Sync,
{
    fn execute(&self, code: &str) -> Result<String, ChannelError> {
        (self.handler)(code)
    }
}
