//! Bootstrapping a provider and its context accessors.
//!
//! [`bootstrap_provider`] packages the usual boilerplate around a reducer:
//! two channels (state and dispatch), a [`SimpleProvider`] component that
//! owns the state container and publishes both values to its subtree, and
//! an accessor that descendants call to get them back.
//!
//! ```
//! use std::sync::Arc;
//! use simple_provider_core::{from_fn, ReducerAction};
//! use simple_provider_runtime::{bootstrap_provider, smallvec, Children, Element, Root};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum ActionType {
//!     Increment,
//! }
//!
//! let counter = bootstrap_provider(
//!     from_fn(|count: Arc<i64>, action: ReducerAction<ActionType>| match action.kind {
//!         ActionType::Increment => Arc::new(*count + 1),
//!     }),
//!     0,
//! );
//!
//! let accessors = counter.accessors();
//! let view = Element::from_fn("View", move |cx| {
//!     let ctx = accessors.use_context_accessors(cx)?;
//!     cx.text(format!("Value: {}", ctx.state));
//!     cx.on("increment", move || ctx.dispatch.send(ActionType::Increment.into()));
//!     Ok(Children::new())
//! });
//!
//! let mut root = Root::mount(counter.provider([view]))?;
//! root.fire("increment")?;
//! assert_eq!(root.text(), "Value: 1");
//! # Ok::<(), simple_provider_runtime::RenderError>(())
//! ```

use crate::accessor::use_context_null_safe;
use crate::component::{Children, Component, Element};
use crate::container::Dispatch;
use crate::context::RenderContext;
use crate::error::RenderError;
use simple_provider_core::channel::Channel;
use simple_provider_core::error::ContextError;
use simple_provider_core::reducer::Reducer;
use std::fmt;
use std::sync::Arc;

/// Everything [`SimpleProvider`] needs
pub struct SimpleProviderParams<R: Reducer> {
    /// Channel receiving the current state
    pub state_channel: Channel<Arc<R::State>>,
    /// Channel receiving the dispatch handle
    pub dispatch_channel: Channel<Dispatch<R::Action>>,
    /// Transition function for the container
    pub reducer: Arc<R>,
    /// State the container starts from
    pub initial_state: Arc<R::State>,
    /// Subtree that can read both channels
    pub children: Children,
}

/// Component owning one state container and publishing it to its children
///
/// On its first render it creates the container from the reducer and the
/// initial state. Every render provides the container's current state and
/// its dispatch handle on the two channels, then renders the children inside
/// both scopes.
pub struct SimpleProvider<R: Reducer> {
    params: SimpleProviderParams<R>,
}

impl<R: Reducer> SimpleProvider<R> {
    /// Provider from explicit channels, reducer, initial state and children
    #[must_use]
    pub const fn new(params: SimpleProviderParams<R>) -> Self {
        Self { params }
    }
}

impl<R> Component for SimpleProvider<R>
where
    R: Reducer + Send + Sync + 'static,
    R::State: Send + Sync + 'static,
    R::Action: Send + 'static,
{
    fn render(&self, cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
        let params = &self.params;
        if cx.is_first_render() {
            tracing::debug!(
                state_channel = %params.state_channel.id(),
                dispatch_channel = %params.dispatch_channel.id(),
                "Mounting provider"
            );
        }

        let (state, dispatch) = cx.use_reducer(
            Arc::clone(&params.reducer),
            Arc::clone(&params.initial_state),
        )?;

        cx.provide(&params.state_channel, state);
        cx.provide(&params.dispatch_channel, dispatch);

        Ok(params.children.clone())
    }
}

/// What a descendant gets from [`Accessors::use_context_accessors`]
pub struct ContextAccessors<S, A> {
    /// State as of the current render pass
    pub state: Arc<S>,
    /// Handle for requesting transitions; stable while the provider is mounted
    pub dispatch: Dispatch<A>,
}

impl<S, A> Clone for ContextAccessors<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for ContextAccessors<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextAccessors")
            .field("state", &self.state)
            .field("dispatch", &self.dispatch)
            .finish()
    }
}

/// The channel pair of one bootstrap call
///
/// Copyable and independent of the reducer type, so it can be captured by
/// any component that needs the shared state.
pub struct Accessors<S, A> {
    state_channel: Channel<Arc<S>>,
    dispatch_channel: Channel<Dispatch<A>>,
}

impl<S, A> Accessors<S, A> {
    /// Channel carrying the state
    #[must_use]
    pub const fn state_channel(&self) -> Channel<Arc<S>> {
        self.state_channel
    }

    /// Channel carrying the dispatch handle
    #[must_use]
    pub const fn dispatch_channel(&self) -> Channel<Dispatch<A>> {
        self.dispatch_channel
    }
}

impl<S, A> Accessors<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Read state and dispatch from the nearest matching provider
    ///
    /// # Errors
    ///
    /// [`ContextError::OutOfContext`] for the first of the two channels
    /// (state, then dispatch) that no ancestor provides.
    pub fn use_context_accessors(
        &self,
        cx: &RenderContext<'_>,
    ) -> Result<ContextAccessors<S, A>, ContextError> {
        let state = use_context_null_safe(cx, &self.state_channel)?;
        let dispatch = use_context_null_safe(cx, &self.dispatch_channel)?;
        Ok(ContextAccessors { state, dispatch })
    }
}

impl<S, A> Clone for Accessors<S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for Accessors<S, A> {}

impl<S, A> fmt::Debug for Accessors<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("state_channel", &self.state_channel)
            .field("dispatch_channel", &self.dispatch_channel)
            .finish()
    }
}

/// Result of [`bootstrap_provider`]
pub struct Bootstrapped<R: Reducer> {
    accessors: Accessors<R::State, R::Action>,
    reducer: Arc<R>,
    initial_state: Arc<R::State>,
}

/// Create the channels, provider and accessors for `reducer`
///
/// Every call creates a fresh channel pair. Providers and accessors from
/// different calls never see each other, even for identical types.
#[must_use]
pub fn bootstrap_provider<R>(reducer: R, initial_state: R::State) -> Bootstrapped<R>
where
    R: Reducer,
{
    let accessors = Accessors {
        state_channel: Channel::new("provider.state"),
        dispatch_channel: Channel::new("provider.dispatch"),
    };

    tracing::debug!(
        state_channel = %accessors.state_channel.id(),
        dispatch_channel = %accessors.dispatch_channel.id(),
        state = std::any::type_name::<R::State>(),
        "Bootstrapped provider"
    );

    Bootstrapped {
        accessors,
        reducer: Arc::new(reducer),
        initial_state: Arc::new(initial_state),
    }
}

impl<R: Reducer> Bootstrapped<R> {
    /// Channel pair for descendants
    #[must_use]
    pub const fn accessors(&self) -> Accessors<R::State, R::Action> {
        self.accessors
    }
}

impl<R> Bootstrapped<R>
where
    R: Reducer + Send + Sync + 'static,
    R::State: Send + Sync + 'static,
    R::Action: Send + 'static,
{
    /// Provider element wrapping `children`
    ///
    /// Each mounted provider owns its own container, seeded with the
    /// bootstrap's initial state. The element is keyed by the bootstrap's
    /// state channel, so a provider of another bootstrap taking its place
    /// starts from its own initial state.
    #[must_use]
    pub fn provider(&self, children: impl IntoIterator<Item = Element>) -> Element {
        Element::new(SimpleProvider::new(SimpleProviderParams {
            state_channel: self.accessors.state_channel,
            dispatch_channel: self.accessors.dispatch_channel,
            reducer: Arc::clone(&self.reducer),
            initial_state: Arc::clone(&self.initial_state),
            children: children.into_iter().collect(),
        }))
        .named("Provider")
        .with_key(self.accessors.state_channel.id().as_u64())
    }

    /// Read state and dispatch from the nearest provider of this bootstrap
    ///
    /// # Errors
    ///
    /// [`ContextError::OutOfContext`] outside such a provider.
    pub fn use_context_accessors(
        &self,
        cx: &RenderContext<'_>,
    ) -> Result<ContextAccessors<R::State, R::Action>, ContextError> {
        self.accessors.use_context_accessors(cx)
    }
}

impl<R: Reducer> Clone for Bootstrapped<R> {
    fn clone(&self) -> Self {
        Self {
            accessors: self.accessors,
            reducer: Arc::clone(&self.reducer),
            initial_state: Arc::clone(&self.initial_state),
        }
    }
}

impl<R: Reducer> fmt::Debug for Bootstrapped<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapped")
            .field("accessors", &self.accessors)
            .finish_non_exhaustive()
    }
}
