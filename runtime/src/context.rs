//! The render context handed to [`Component::render`](crate::Component::render).
//!
//! Hooks are stored per mounted component in call order. A component must
//! call the same hooks in the same order on every render; a mismatch is
//! reported as [`RenderError::HookOrder`].

use crate::container::{Dispatch, ReducerContainer, Scheduler};
use crate::error::RenderError;
use crate::scope::Scope;
use simple_provider_core::channel::Channel;
use simple_provider_core::reducer::Reducer;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type Hook = Box<dyn Any + Send + Sync>;
pub(crate) type Effect = Box<dyn FnOnce() + Send>;
pub(crate) type Handler = Arc<dyn Fn() + Send + Sync>;

/// Everything one render pass produces besides the tree itself
#[derive(Default)]
pub(crate) struct CommitBuffer {
    pub(crate) output: Vec<String>,
    pub(crate) handlers: HashMap<String, Handler>,
    pub(crate) effects: Vec<Effect>,
}

struct ReducerSlot<R: Reducer> {
    container: Arc<ReducerContainer<R>>,
    dispatch: Dispatch<R::Action>,
}

struct MountEffect;

/// Per-component view of a render pass
pub struct RenderContext<'a> {
    component: &'static str,
    hooks: &'a mut Vec<Hook>,
    cursor: usize,
    first_render: bool,
    scope: Scope,
    child_scope: Scope,
    scheduler: &'a Arc<Scheduler>,
    buffer: &'a mut CommitBuffer,
    effects: Vec<Effect>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        component: &'static str,
        hooks: &'a mut Vec<Hook>,
        first_render: bool,
        scope: &Scope,
        scheduler: &'a Arc<Scheduler>,
        buffer: &'a mut CommitBuffer,
    ) -> Self {
        Self {
            component,
            hooks,
            cursor: 0,
            first_render,
            scope: scope.clone(),
            child_scope: scope.clone(),
            scheduler,
            buffer,
            effects: Vec::new(),
        }
    }

    /// Name of the component being rendered
    #[must_use]
    pub const fn component_name(&self) -> &'static str {
        self.component
    }

    /// Whether this is the component's first render since it mounted
    #[must_use]
    pub const fn is_first_render(&self) -> bool {
        self.first_render
    }

    /// Values provided by this component's ancestors
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// State container governed by `reducer`
    ///
    /// On the first render the container is created from `reducer` and
    /// `initial_state`; later renders ignore both arguments and return the
    /// container's latest state together with the same [`Dispatch`].
    ///
    /// # Errors
    ///
    /// [`RenderError::HookOrder`] when this slot held a different hook on
    /// the previous render.
    pub fn use_reducer<R>(
        &mut self,
        reducer: R,
        initial_state: Arc<R::State>,
    ) -> Result<(Arc<R::State>, Dispatch<R::Action>), RenderError>
    where
        R: Reducer + Send + Sync + 'static,
        R::State: Send + Sync + 'static,
        R::Action: Send + 'static,
    {
        let scheduler = Arc::clone(self.scheduler);
        let slot = self.next_slot(|| {
            let (container, dispatch) =
                ReducerContainer::create(reducer, initial_state, &scheduler);
            ReducerSlot {
                container,
                dispatch,
            }
        })?;
        Ok((slot.container.state(), slot.dispatch.clone()))
    }

    /// Raw read of `channel`; `None` when no ancestor provides it
    ///
    /// Prefer [`use_context_null_safe`](crate::accessor::use_context_null_safe),
    /// which turns the missing case into an error.
    #[must_use]
    pub fn use_context<T>(&self, channel: &Channel<T>) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.scope.get(channel)
    }

    /// Provide `value` on `channel` to this component's children
    ///
    /// The component itself keeps seeing what its ancestors provided.
    pub fn provide<T>(&mut self, channel: &Channel<T>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.child_scope = self.child_scope.provide(channel, value);
    }

    /// Run `effect` once, after the component's first commit
    ///
    /// Effects of children run before those of their parents.
    ///
    /// # Errors
    ///
    /// [`RenderError::HookOrder`] when this slot held a different hook on
    /// the previous render.
    pub fn use_mount_effect<F>(&mut self, effect: F) -> Result<(), RenderError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.next_slot(|| MountEffect)?;
        if self.first_render {
            self.effects.push(Box::new(effect));
        }
        Ok(())
    }

    /// Register a handler for `event` in this commit
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let event = event.into();
        if self
            .buffer
            .handlers
            .insert(event.clone(), Arc::new(handler))
            .is_some()
        {
            tracing::debug!(component = self.component, event = %event, "Handler replaced");
        }
    }

    /// Append a line to the committed output
    pub fn text(&mut self, line: impl Into<String>) {
        self.buffer.output.push(line.into());
    }

    pub(crate) fn finish(self) -> Result<(Scope, Vec<Effect>), RenderError> {
        if !self.first_render && self.cursor != self.hooks.len() {
            return Err(RenderError::HookOrder {
                component: self.component,
                slot: self.cursor,
            });
        }
        Ok((self.child_scope, self.effects))
    }

    fn next_slot<T>(&mut self, init: impl FnOnce() -> T) -> Result<&mut T, RenderError>
    where
        T: Send + Sync + 'static,
    {
        let component = self.component;
        let slot = self.cursor;
        self.cursor += 1;

        if slot == self.hooks.len() {
            if !self.first_render {
                return Err(RenderError::HookOrder { component, slot });
            }
            self.hooks.push(Box::new(init()));
        }

        self.hooks
            .get_mut(slot)
            .and_then(|hook| hook.downcast_mut::<T>())
            .ok_or(RenderError::HookOrder { component, slot })
    }
}
