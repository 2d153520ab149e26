//! # Simple Provider Runtime
//!
//! A minimal host rendering runtime plus the provider helper built on it.
//!
//! The runtime supplies the two primitives the provider relies on:
//!
//! - a reducer-backed state container
//!   ([`RenderContext::use_reducer`], returning a stable [`Dispatch`])
//! - scoped value distribution
//!   ([`RenderContext::provide`] / [`RenderContext::use_context`] over a [`Scope`])
//!
//! and the render/commit cycle that makes them observable ([`Root`]).
//!
//! On top of that, [`bootstrap_provider`] builds a provider component and an
//! accessor that fails with [`ContextError::OutOfContext`] when used outside
//! the provider's subtree.
//!
//! ## Flow
//!
//! ```text
//! bootstrap_provider(reducer, initial)
//!        │
//!        ▼
//!   Provider ──use_reducer──▶ container ──▶ (state, dispatch)
//!        │                                       │
//!        └──provide(state), provide(dispatch)◀───┘
//!        │
//!        ▼
//!   descendants ──use_context_accessors──▶ { state, dispatch }
//!        │
//!        └──dispatch.send(action)──▶ queued ──Root::flush──▶ reducer ──▶ re-render
//! ```

pub use simple_provider_core::error::ContextError;
pub use smallvec::{SmallVec, smallvec};

pub mod accessor;
pub mod component;
pub mod container;
pub mod context;
pub mod provider;
pub mod root;
pub mod scope;

/// Error types for the runtime
pub mod error {
    use simple_provider_core::error::ContextError;
    use thiserror::Error;

    /// Errors that abort a render pass
    ///
    /// When one is returned from [`Root::render`](crate::Root::render) or
    /// [`Root::flush`](crate::Root::flush) the tree has been unmounted.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum RenderError {
        /// A component read a channel that no ancestor provides
        #[error(transparent)]
        Context(#[from] ContextError),

        /// A component called different hooks than on its previous render
        #[error("Hook order changed in component '{component}' at slot {slot}")]
        HookOrder {
            /// Component that broke the order
            component: &'static str,
            /// Hook slot where the mismatch was found
            slot: usize,
        },

        /// Updates kept arriving after the configured number of passes
        #[error("Too many re-renders: updates did not settle within {0} render passes")]
        TooManyRenders(usize),

        /// No handler for the fired event in the last commit
        #[error("No handler registered for event '{0}'")]
        UnknownEvent(String),
    }
}

pub use accessor::use_context_null_safe;
pub use component::{Children, Component, Element, Fragment};
pub use container::Dispatch;
pub use context::RenderContext;
pub use error::RenderError;
pub use provider::{
    Accessors, Bootstrapped, ContextAccessors, SimpleProvider, SimpleProviderParams,
    bootstrap_provider,
};
pub use root::{Root, RootConfig};
pub use scope::Scope;
