//! Null-safe channel reads.

use crate::context::RenderContext;
use simple_provider_core::channel::Channel;
use simple_provider_core::error::ContextError;

/// Read `channel`, failing when no ancestor provides it
///
/// Call from inside [`Component::render`](crate::Component::render). The
/// nearest value provided above the component is returned. When the channel
/// is unset the result is [`ContextError::OutOfContext`]; propagate it with
/// `?` so the render pass fails instead of continuing without the value.
///
/// # Errors
///
/// [`ContextError::OutOfContext`] when no ancestor provides `channel`.
///
/// # Example
///
/// ```
/// use simple_provider_core::channel::Channel;
/// use simple_provider_runtime::{use_context_null_safe, Children, Element, Root};
///
/// let theme: Channel<&'static str> = Channel::new("theme");
///
/// let orphan = Element::from_fn("Orphan", move |cx| {
///     let value = use_context_null_safe(cx, &theme)?;
///     cx.text(value);
///     Ok(Children::new())
/// });
///
/// let error = Root::mount(orphan).err().map(|e| e.to_string()).unwrap_or_default();
/// assert!(error.starts_with("Out of context"));
/// ```
pub fn use_context_null_safe<T>(
    cx: &RenderContext<'_>,
    channel: &Channel<T>,
) -> Result<T, ContextError>
where
    T: Clone + 'static,
{
    cx.use_context(channel).ok_or_else(|| {
        tracing::warn!(
            channel = channel.name(),
            channel_id = %channel.id(),
            component = cx.component_name(),
            "Channel read outside of its provider"
        );
        ContextError::OutOfContext {
            channel: channel.name(),
            id: channel.id(),
        }
    })
}
