//! The [`Reducer`] trait - pure state transitions.
//!
//! A reducer computes the next state from the current state and an action.
//! State travels as an `Arc` so that "nothing changed" has a precise
//! meaning: the reducer hands back the very same `Arc` it was given.
//! Runtimes compare with [`Arc::ptr_eq`] to decide whether to re-render.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure transition function `(State, Action) -> State`
///
/// Implementations must be total: an action they do not recognize returns
/// the input `state` unchanged.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use simple_provider_core::reducer::Reducer;
///
/// struct Counter;
///
/// enum CounterAction {
///     Increment,
///     Ignored,
/// }
///
/// impl Reducer for Counter {
///     type State = i64;
///     type Action = CounterAction;
///
///     fn reduce(&self, state: Arc<i64>, action: CounterAction) -> Arc<i64> {
///         match action {
///             CounterAction::Increment => Arc::new(*state + 1),
///             CounterAction::Ignored => state,
///         }
///     }
/// }
///
/// let next = Counter.reduce(Arc::new(1), CounterAction::Increment);
/// assert_eq!(*next, 2);
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// Compute the next state
    ///
    /// Return `state` itself when the action does not change anything.
    fn reduce(&self, state: Arc<Self::State>, action: Self::Action) -> Arc<Self::State>;
}

impl<R: Reducer + ?Sized> Reducer for Arc<R> {
    type State = R::State;
    type Action = R::Action;

    fn reduce(&self, state: Arc<Self::State>, action: Self::Action) -> Arc<Self::State> {
        (**self).reduce(state, action)
    }
}

/// Reducer backed by a closure, see [`from_fn`]
pub struct FnReducer<F, S, A> {
    f: F,
    _types: PhantomData<fn(Arc<S>, A) -> Arc<S>>,
}

/// Turn a closure into a [`Reducer`]
///
/// ```
/// use std::sync::Arc;
/// use simple_provider_core::reducer::{from_fn, Reducer};
///
/// let double = from_fn(|state: Arc<u32>, _action: ()| Arc::new(*state * 2));
/// assert_eq!(*double.reduce(Arc::new(21), ()), 42);
/// ```
#[must_use]
pub const fn from_fn<S, A, F>(f: F) -> FnReducer<F, S, A>
where
    F: Fn(Arc<S>, A) -> Arc<S>,
{
    FnReducer {
        f,
        _types: PhantomData,
    }
}

impl<F, S, A> Reducer for FnReducer<F, S, A>
where
    F: Fn(Arc<S>, A) -> Arc<S>,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: Arc<S>, action: A) -> Arc<S> {
        (self.f)(state, action)
    }
}

impl<F: Clone, S, A> Clone for FnReducer<F, S, A> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _types: PhantomData,
        }
    }
}

impl<F, S, A> fmt::Debug for FnReducer<F, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReducer")
            .field("state", &std::any::type_name::<S>())
            .field("action", &std::any::type_name::<A>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct State {
        value: i64,
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Increment,
        Unknown,
    }

    fn reducer() -> impl Reducer<State = State, Action = Action> {
        from_fn(|state: Arc<State>, action: Action| match action {
            Action::Increment => Arc::new(State {
                value: state.value + 1,
            }),
            Action::Unknown => state,
        })
    }

    #[test]
    fn test_fn_reducer_applies_transition() {
        let next = reducer().reduce(Arc::new(State { value: 0 }), Action::Increment);
        assert_eq!(next.value, 1);
    }

    #[test]
    fn test_unknown_action_returns_same_handle() {
        let state = Arc::new(State { value: 7 });
        let next = reducer().reduce(Arc::clone(&state), Action::Unknown);
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_arc_reducer_delegates() {
        let shared = Arc::new(reducer());
        let next = shared.reduce(Arc::new(State { value: 1 }), Action::Increment);
        assert_eq!(next.value, 2);
    }

    proptest! {
        #[test]
        fn prop_fold_counts_increments(actions in proptest::collection::vec(any::<bool>(), 0..64)) {
            let reducer = reducer();
            let expected = actions.iter().filter(|is_increment| **is_increment).count();

            let end = actions.iter().fold(Arc::new(State { value: 0 }), |state, is_increment| {
                let action = if *is_increment { Action::Increment } else { Action::Unknown };
                reducer.reduce(state, action)
            });

            prop_assert_eq!(end.value, i64::try_from(expected).unwrap_or(i64::MAX));
        }
    }
}
