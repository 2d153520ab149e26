//! The root of a component tree: render passes, commits and update flushing.

use crate::component::Element;
use crate::container::Scheduler;
use crate::context::{CommitBuffer, Handler, Hook, RenderContext};
use crate::error::RenderError;
use crate::scope::Scope;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Instant;

/// Configuration for [`Root`] instances
///
/// # Example
///
/// ```
/// use simple_provider_runtime::RootConfig;
///
/// let config = RootConfig::default().with_max_render_passes(10);
/// assert_eq!(config.max_render_passes, 10);
/// ```
#[derive(Debug, Clone)]
pub struct RootConfig {
    /// Render passes a single flush may perform before giving up
    ///
    /// Protects against components that dispatch on every render.
    pub max_render_passes: usize,
}

impl RootConfig {
    /// Create a configuration with custom values
    #[must_use]
    pub const fn new(max_render_passes: usize) -> Self {
        Self { max_render_passes }
    }

    /// Set the render pass limit per flush
    #[must_use]
    pub const fn with_max_render_passes(mut self, max_render_passes: usize) -> Self {
        self.max_render_passes = max_render_passes;
        self
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_render_passes: 50,
        }
    }
}

struct Node {
    type_id: TypeId,
    key: Option<u64>,
    name: &'static str,
    hooks: Vec<Hook>,
    children: Vec<Node>,
    mounted: bool,
}

impl Node {
    fn new(element: &Element) -> Self {
        Self {
            type_id: element.type_id(),
            key: element.key(),
            name: element.name(),
            hooks: Vec::new(),
            children: Vec::new(),
            mounted: false,
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.mounted {
            tracing::trace!(component = self.name, "Unmounted");
        }
    }
}

/// Owner of a mounted component tree
///
/// The root renders its element, keeps every component's hook state between
/// passes, and re-renders when a [`Dispatch`](crate::Dispatch) created under
/// it changes some state. Nothing happens on its own: updates are applied
/// when [`flush`](Self::flush) (or [`fire`](Self::fire)) is called.
///
/// # Example
///
/// ```
/// use simple_provider_runtime::{Children, Element, Root};
///
/// let root = Root::mount(Element::from_fn("Greeting", |cx| {
///     cx.text("Hello");
///     Ok(Children::new())
/// }))?;
///
/// assert_eq!(root.text(), "Hello");
/// # Ok::<(), simple_provider_runtime::RenderError>(())
/// ```
pub struct Root {
    element: Element,
    tree: Option<Node>,
    scheduler: Arc<Scheduler>,
    config: RootConfig,
    output: Vec<String>,
    handlers: HashMap<String, Handler>,
    render_count: u64,
}

impl Root {
    /// Root for `element`, not rendered yet
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self::with_config(element, RootConfig::default())
    }

    /// Root with custom configuration, not rendered yet
    #[must_use]
    pub fn with_config(element: Element, config: RootConfig) -> Self {
        Self {
            element,
            tree: None,
            scheduler: Arc::new(Scheduler::default()),
            config,
            output: Vec::new(),
            handlers: HashMap::new(),
            render_count: 0,
        }
    }

    /// Render `element` and flush whatever its mount effects dispatched
    ///
    /// # Errors
    ///
    /// Any [`RenderError`] raised while rendering.
    pub fn mount(element: Element) -> Result<Self, RenderError> {
        let mut root = Self::new(element);
        root.render()?;
        root.flush()?;
        Ok(root)
    }

    /// Perform one render pass, commit it and run new mount effects
    ///
    /// On error the whole tree is unmounted and the committed output is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Any [`RenderError`] returned by a component.
    #[tracing::instrument(skip(self), name = "root_render", fields(root = self.element.name()))]
    pub fn render(&mut self) -> Result<(), RenderError> {
        let start = Instant::now();
        let mut buffer = CommitBuffer::default();

        let mut tree = match self.tree.take() {
            Some(node) if self.element.same_identity(node.type_id, node.key) => node,
            _ => Node::new(&self.element),
        };

        if let Err(error) = render_node(
            &mut tree,
            &self.element,
            &Scope::root(),
            &self.scheduler,
            &mut buffer,
        ) {
            tracing::warn!(%error, "Render failed, unmounting tree");
            self.output.clear();
            self.handlers.clear();
            return Err(error);
        }

        self.tree = Some(tree);
        self.output = buffer.output;
        self.handlers = buffer.handlers;
        self.render_count += 1;

        metrics::counter!("root.render_passes.total").increment(1);
        metrics::histogram!("root.render.duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::trace!(
            effects = buffer.effects.len(),
            render_count = self.render_count,
            "Committed render pass"
        );

        for effect in buffer.effects {
            effect();
        }
        Ok(())
    }

    /// Apply every pending dispatch and re-render until nothing is pending
    ///
    /// Queued actions are folded through their reducer in the order they
    /// were sent. A pass is skipped when no state handle changed.
    ///
    /// # Returns
    ///
    /// The number of render passes performed.
    ///
    /// # Errors
    ///
    /// - [`RenderError::TooManyRenders`] when updates keep arriving past
    ///   [`RootConfig::max_render_passes`]
    /// - any error raised while re-rendering
    ///
    /// In both cases the tree is unmounted and the committed output cleared.
    pub fn flush(&mut self) -> Result<usize, RenderError> {
        let mut passes = 0;

        loop {
            let pending = self.scheduler.take();
            if pending.is_empty() {
                break;
            }

            let changed = pending
                .iter()
                .filter_map(Weak::upgrade)
                .fold(false, |changed, target| target.apply_pending() || changed);

            if !changed {
                tracing::trace!("Pending updates left state unchanged");
                continue;
            }

            if passes >= self.config.max_render_passes {
                tracing::error!(
                    max_render_passes = self.config.max_render_passes,
                    "Updates did not settle, unmounting tree"
                );
                self.unmount();
                return Err(RenderError::TooManyRenders(self.config.max_render_passes));
            }

            self.render()?;
            passes += 1;
        }

        if passes > 0 {
            tracing::debug!(passes, "Flushed pending updates");
        }
        Ok(passes)
    }

    /// Invoke the handler registered for `event`, then flush
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownEvent`] when the last commit registered no such
    /// handler, or any error raised by the flush.
    pub fn fire(&mut self, event: &str) -> Result<usize, RenderError> {
        let handler = self
            .handlers
            .get(event)
            .cloned()
            .ok_or_else(|| RenderError::UnknownEvent(event.to_string()))?;

        tracing::debug!(event, "Firing event");
        handler();
        self.flush()
    }

    /// Resolves once some dispatch has scheduled work for this root
    ///
    /// Lets an async task drive the root when dispatches come from other
    /// tasks:
    ///
    /// ```ignore
    /// loop {
    ///     root.wait_for_update().await;
    ///     root.flush()?;
    /// }
    /// ```
    pub async fn wait_for_update(&self) {
        self.scheduler.notified().await;
    }

    /// Whether dispatched actions are waiting for a flush
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Output lines of the last commit
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Output of the last commit, one line per entry
    #[must_use]
    pub fn text(&self) -> String {
        self.output.join("\n")
    }

    /// Events with a handler in the last commit
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Completed render passes since creation
    #[must_use]
    pub const fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Whether a committed tree exists
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.tree.is_some()
    }

    /// Drop the tree and all state it owns
    ///
    /// Dispatch handles created under the tree stop delivering actions.
    pub fn unmount(&mut self) {
        if self.tree.take().is_some() {
            tracing::debug!(root = self.element.name(), "Unmounting root");
        }
        self.output.clear();
        self.handlers.clear();
    }
}

fn render_node(
    node: &mut Node,
    element: &Element,
    scope: &Scope,
    scheduler: &Arc<Scheduler>,
    buffer: &mut CommitBuffer,
) -> Result<(), RenderError> {
    let first_render = !node.mounted;
    if first_render {
        tracing::trace!(component = element.name(), "Mounting");
    }
    node.name = element.name();

    let mut cx = RenderContext::new(
        element.name(),
        &mut node.hooks,
        first_render,
        scope,
        scheduler,
        buffer,
    );
    let children = element.component().render(&mut cx)?;
    let (child_scope, effects) = cx.finish()?;
    node.mounted = true;

    let mut previous = std::mem::take(&mut node.children).into_iter();
    let mut next = Vec::with_capacity(children.len());
    for child in &children {
        let mut child_node = match previous.next() {
            Some(existing) if child.same_identity(existing.type_id, existing.key) => existing,
            _ => Node::new(child),
        };
        render_node(&mut child_node, child, &child_scope, scheduler, buffer)?;
        next.push(child_node);
    }
    node.children = next;

    buffer.effects.extend(effects);
    Ok(())
}
