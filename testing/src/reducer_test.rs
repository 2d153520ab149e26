//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use simple_provider_core::reducer::Reducer;
use std::sync::Arc;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Actions given with [`when_action`](Self::when_action) and
/// [`when_actions`](Self::when_actions) are folded in order, each one
/// receiving the state produced by the previous.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use simple_provider_core::from_fn;
/// use simple_provider_testing::ReducerTest;
///
/// ReducerTest::new(from_fn(|count: Arc<i32>, delta: i32| Arc::new(*count + delta)))
///     .given_state(0)
///     .when_actions([1, 2, 3])
///     .then_state(|count| assert_eq!(*count, 6))
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    initial_state: Option<Arc<R::State>>,
    actions: Vec<R::Action>,
    expect_unchanged: bool,
    state_assertions: Vec<StateAssertion<R::State>>,
}

impl<R: Reducer> ReducerTest<R> {
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            expect_unchanged: false,
            state_assertions: Vec::new(),
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(Arc::new(state));
        self
    }

    /// Add an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions to apply in order (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = R::Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Expect the reducer to hand back the initial state handle untouched (Then)
    #[must_use]
    pub const fn then_unchanged(mut self) -> Self {
        self.expect_unchanged = true;
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state or the actions are not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let initial = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        // Execute reducer
        let reducer = self.reducer;
        let state = self
            .actions
            .into_iter()
            .fold(Arc::clone(&initial), |state, action| reducer.reduce(state, action));

        if self.expect_unchanged {
            assert!(
                Arc::ptr_eq(&initial, &state),
                "Expected the reducer to return the initial state unchanged"
            );
        }

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Unknown,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;

        fn reduce(&self, state: Arc<Self::State>, action: Self::Action) -> Arc<Self::State> {
            match action {
                TestAction::Increment => Arc::new(TestState {
                    count: state.count + 1,
                }),
                TestAction::Decrement => Arc::new(TestState {
                    count: state.count - 1,
                }),
                TestAction::Unknown => state,
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_decrement() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_unknown_action() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 3 })
            .when_action(TestAction::Unknown)
            .then_unchanged()
            .then_state(|state| assert_eq!(state.count, 3))
            .run();
    }

    #[test]
    #[should_panic(expected = "Expected the reducer to return the initial state unchanged")]
    fn test_then_unchanged_detects_new_state() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 3 })
            .when_action(TestAction::Increment)
            .then_unchanged()
            .run();
    }
}
