//! Components and elements.

use crate::context::RenderContext;
use crate::error::RenderError;
use smallvec::SmallVec;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// What a component renders: the elements nested directly below it
pub type Children = SmallVec<[Element; 4]>;

/// A unit of UI
///
/// `render` reads state and context through the [`RenderContext`], emits
/// output and handlers, and returns its children. It runs on every render
/// pass while the component is mounted, so it should be cheap and free of
/// side effects other than those routed through the context.
pub trait Component: Send + Sync + 'static {
    /// Render this component
    ///
    /// # Errors
    ///
    /// Any [`RenderError`] aborts the render pass.
    fn render(&self, cx: &mut RenderContext<'_>) -> Result<Children, RenderError>;
}

/// A component instance placed in the tree
///
/// The component's concrete type, together with an optional key, decides
/// identity during reconciliation: a child keeps its hook state across
/// passes only while an element with the same type and key occupies the
/// same position.
#[derive(Clone)]
pub struct Element {
    component: Arc<dyn Component>,
    type_id: TypeId,
    key: Option<u64>,
    name: &'static str,
}

impl Element {
    /// Wrap a component
    #[must_use]
    pub fn new<C: Component>(component: C) -> Self {
        Self {
            component: Arc::new(component),
            type_id: TypeId::of::<C>(),
            key: None,
            name: short_type_name::<C>(),
        }
    }

    /// Component defined by a closure
    ///
    /// ```
    /// use simple_provider_runtime::{Children, Element};
    ///
    /// let hello = Element::from_fn("Hello", |cx| {
    ///     cx.text("hello");
    ///     Ok(Children::new())
    /// });
    /// assert_eq!(hello.name(), "Hello");
    /// ```
    #[must_use]
    pub fn from_fn<F>(name: &'static str, render: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> Result<Children, RenderError> + Send + Sync + 'static,
    {
        Self::new(FnComponent { render }).named(name)
    }

    /// Override the name used in logs and errors
    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Distinguish this element from others of the same component type
    ///
    /// Replacing an element with one of the same type but a different key
    /// unmounts the old instance and mounts a fresh one.
    #[must_use]
    pub const fn with_key(mut self, key: u64) -> Self {
        self.key = Some(key);
        self
    }

    /// Name used in logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Key given with [`with_key`](Self::with_key), if any
    #[must_use]
    pub const fn key(&self) -> Option<u64> {
        self.key
    }

    pub(crate) const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether a node rendered from `self` can keep state rendered from `other`
    pub(crate) fn same_identity(&self, type_id: TypeId, key: Option<u64>) -> bool {
        self.type_id == type_id && self.key == key
    }

    pub(crate) fn component(&self) -> &dyn Component {
        &*self.component
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

struct FnComponent<F> {
    render: F,
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&mut RenderContext<'_>) -> Result<Children, RenderError> + Send + Sync + 'static,
{
    fn render(&self, cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
        (self.render)(cx)
    }
}

/// Groups several elements under one parent
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    children: Children,
}

impl Fragment {
    /// Fragment rendering `children` in order
    #[must_use]
    pub fn new(children: impl IntoIterator<Item = Element>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }
}

impl Component for Fragment {
    fn render(&self, _cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
        Ok(self.children.clone())
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label;

    impl Component for Label {
        fn render(&self, _cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
            Ok(Children::new())
        }
    }

    #[test]
    fn test_element_name_defaults_to_type() {
        assert_eq!(Element::new(Label).name(), "Label");
        assert_eq!(Element::new(Fragment::default()).name(), "Fragment");
    }

    #[test]
    fn test_type_identity() {
        let a = Element::new(Label);
        let b = Element::new(Label).named("Other");
        let c = Element::new(Fragment::default());

        assert_eq!(a.type_id(), b.type_id());
        assert_ne!(a.type_id(), c.type_id());
    }

    #[test]
    fn test_key_is_part_of_identity() {
        let plain = Element::new(Label);
        let keyed = Element::new(Label).with_key(7);

        assert_eq!(keyed.key(), Some(7));
        assert!(plain.same_identity(TypeId::of::<Label>(), None));
        assert!(!plain.same_identity(TypeId::of::<Label>(), Some(7)));
        assert!(keyed.same_identity(TypeId::of::<Label>(), Some(7)));
        assert!(!keyed.same_identity(TypeId::of::<Label>(), Some(8)));
    }
}
