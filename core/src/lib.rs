//! # Simple Provider Core
//!
//! Core traits and types for sharing one piece of reducer-managed state with
//! a component subtree.
//!
//! ## Core Concepts
//!
//! - **State**: Application data owned by a single container, replaced on change
//! - **Action**: A tagged request to transition state ([`ReducerAction`])
//! - **Reducer**: Pure function `(State, Action) → State` ([`Reducer`])
//! - **Channel**: A typed key through which an ancestor hands a value to its
//!   descendants ([`Channel`])
//!
//! Reading a channel that no ancestor populated is an error
//! ([`ContextError::OutOfContext`]), never a silent default.
//!
//! The runtime crate provides the render cycle, the scopes that give
//! channels their values, and the provider built on top of these types.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use simple_provider_core::{from_fn, Reducer, ReducerAction};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum ActionType {
//!     Increment,
//!     Unknown,
//! }
//!
//! #[derive(Debug)]
//! struct State {
//!     value: i64,
//! }
//!
//! let reducer = from_fn(|state: Arc<State>, action: ReducerAction<ActionType>| {
//!     match action.kind {
//!         ActionType::Increment => Arc::new(State { value: state.value + 1 }),
//!         ActionType::Unknown => state,
//!     }
//! });
//!
//! let state = reducer.reduce(Arc::new(State { value: 0 }), ActionType::Increment.into());
//! assert_eq!(state.value, 1);
//! ```

pub mod action;
pub mod channel;
pub mod error;
pub mod reducer;

pub use action::ReducerAction;
pub use channel::{Channel, ChannelId};
pub use error::ContextError;
pub use reducer::{FnReducer, Reducer, from_fn};
