//! Distribution channels.
//!
//! A [`Channel`] is a typed key. It carries no value of its own: values are
//! attached to it by a scope (see the runtime crate) for the duration of a
//! subtree, and a channel that nobody attached a value to reads as unset.
//!
//! Every channel gets a process-unique [`ChannelId`], so two channels with
//! the same value type never alias each other.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, useful for logging
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch#{}", self.0)
    }
}

/// A typed, scope-aware slot identity
///
/// # Example
///
/// ```
/// use simple_provider_core::channel::Channel;
///
/// let a: Channel<u32> = Channel::new("a");
/// let b: Channel<u32> = Channel::new("b");
/// assert_ne!(a.id(), b.id());
/// ```
pub struct Channel<T> {
    id: ChannelId,
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Channel<T> {
    /// Create a fresh channel, distinct from every other channel in the process
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            id: ChannelId::next(),
            name,
            _value: PhantomData,
        }
    }

    /// Identity of this channel
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Debug name given at creation
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: a channel is a key and is copyable whatever `T` is.
impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Channel<T> {}

impl<T> PartialEq for Channel<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Channel<T> {}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_with_same_type_are_distinct() {
        let first: Channel<String> = Channel::new("state");
        let second: Channel<String> = Channel::new("state");

        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn test_copy_keeps_identity() {
        let channel: Channel<i32> = Channel::new("value");
        let copy = channel;

        assert_eq!(channel, copy);
        assert_eq!(copy.name(), "value");
    }
}
