//! Scoped value distribution.
//!
//! A [`Scope`] is an immutable chain of `(channel, value)` frames. Providing
//! a value never mutates a scope: it returns a child scope whose head frame
//! shadows any outer frame for the same channel. The root threads the scope
//! explicitly through the render of every subtree, so what a component can
//! read is exactly what its ancestors provided.

use simple_provider_core::channel::{Channel, ChannelId};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

struct Frame {
    channel: ChannelId,
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Frame>>,
}

/// Values visible to a component, keyed by channel
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Arc<Frame>>,
}

impl Scope {
    /// The empty scope every root starts from; all channels read as unset
    #[must_use]
    pub const fn root() -> Self {
        Self { head: None }
    }

    /// Child scope in which `channel` carries `value`
    #[must_use]
    pub fn provide<T>(&self, channel: &Channel<T>, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            head: Some(Arc::new(Frame {
                channel: channel.id(),
                name: channel.name(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest value for `channel`, or `None` when no frame sets it
    #[must_use]
    pub fn get<T>(&self, channel: &Channel<T>) -> Option<T>
    where
        T: Clone + 'static,
    {
        let mut frame = self.head.as_deref();
        while let Some(current) = frame {
            if current.channel == channel.id() {
                return current.value.downcast_ref::<T>().cloned();
            }
            frame = current.parent.as_deref();
        }
        None
    }

    /// Whether any frame sets `channel`
    #[must_use]
    pub fn contains<T>(&self, channel: &Channel<T>) -> bool {
        self.channels().any(|(id, _)| id == channel.id())
    }

    /// Number of frames, shadowed ones included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.channels().count()
    }

    fn channels(&self) -> impl Iterator<Item = (ChannelId, &'static str)> + '_ {
        std::iter::successors(self.head.as_deref(), |frame| frame.parent.as_deref())
            .map(|frame| (frame.channel, frame.name))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.channels().map(|(id, name)| format!("{id}:{name}")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_scope_is_unset() {
        let channel: Channel<u8> = Channel::new("byte");
        assert_eq!(Scope::root().get(&channel), None);
        assert!(!Scope::root().contains(&channel));
    }

    #[test]
    fn test_nearest_value_wins() {
        let channel: Channel<&'static str> = Channel::new("label");
        let outer = Scope::root().provide(&channel, "outer");
        let inner = outer.provide(&channel, "inner");

        assert_eq!(outer.get(&channel), Some("outer"));
        assert_eq!(inner.get(&channel), Some("inner"));
        assert_eq!(inner.depth(), 2);
    }

    #[test]
    fn test_same_type_channels_do_not_alias() {
        let first: Channel<i32> = Channel::new("first");
        let second: Channel<i32> = Channel::new("second");
        let scope = Scope::root().provide(&first, 1);

        assert_eq!(scope.get(&first), Some(1));
        assert_eq!(scope.get(&second), None);
    }
}
