//! Error types shared by every layer that reads a [`Channel`](crate::channel::Channel).

use crate::channel::ChannelId;
use thiserror::Error;

/// Errors raised when reading a distribution channel.
///
/// These are programmer errors: a component asked for a value that no
/// ancestor provides. They are meant to be propagated with `?` all the way
/// out of the render call so misuse shows up in tests, never defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The channel was read outside of any provider that sets it
    #[error("Out of context: channel '{channel}' ({id}) has no provider above this component")]
    OutOfContext {
        /// Debug name of the channel that was read
        channel: &'static str,
        /// Identity of the channel, tells apart channels sharing a name
        id: ChannelId,
    },
}

impl ContextError {
    /// Name of the channel involved in the failure
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::OutOfContext { channel, .. } => *channel,
        }
    }

    /// Identity of the channel involved in the failure
    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        match self {
            Self::OutOfContext { id, .. } => *id,
        }
    }
}
