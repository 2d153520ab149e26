//! # Counter Demo
//!
//! A counter whose state lives in a bootstrapped provider.
//!
//! This demo showcases:
//! - A reducer over [`ReducerAction`] with an enum kind and an optional payload
//! - A provider created with `bootstrap_provider`
//! - Descendants reading `{ state, dispatch }` through the accessors
//! - Dispatching from a mount effect and from event handlers
//!
//! ## Example
//!
//! ```
//! use counter::{app, bootstrap_counter};
//! use simple_provider_runtime::Root;
//!
//! let counter = bootstrap_counter();
//! let mut root = Root::mount(app(&counter))?;
//!
//! // The view dispatched one increment when it mounted.
//! assert_eq!(root.output()[0], "Value: 1");
//!
//! root.fire("increment")?;
//! assert_eq!(root.output()[0], "Value: 2");
//! # Ok::<(), simple_provider_runtime::RenderError>(())
//! ```

use serde::{Deserialize, Serialize};
use simple_provider_core::{Reducer, ReducerAction};
use simple_provider_runtime::{
    Accessors, Bootstrapped, Children, Component, Element, RenderContext, RenderError,
    bootstrap_provider,
};
use std::sync::Arc;

/// Counter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current count value
    pub value: i64,
}

/// Kinds of counter actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Reset the counter to 0
    Reset,
    /// Set the counter to the integer carried in `data`
    Set,
}

/// Counter action: a kind plus optional JSON payload
pub type CounterAction = ReducerAction<ActionType>;

/// Counter reducer
///
/// `Set` without an integer payload is ignored, as is any transition that
/// would not change the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;

    fn reduce(&self, state: Arc<Self::State>, action: Self::Action) -> Arc<Self::State> {
        let next = match action.kind {
            ActionType::Increment => state.value.checked_add(1),
            ActionType::Decrement => state.value.checked_sub(1),
            ActionType::Reset => Some(0),
            ActionType::Set => action.data.as_ref().and_then(serde_json::Value::as_i64),
        };

        match next {
            Some(value) if value != state.value => Arc::new(CounterState { value }),
            _ => state,
        }
    }
}

/// Bootstrap the counter provider starting from zero
#[must_use]
pub fn bootstrap_counter() -> Bootstrapped<CounterReducer> {
    bootstrap_provider(CounterReducer, CounterState::default())
}

/// Shows the value, increments once on mount and on every `increment` event
#[derive(Debug, Clone, Copy)]
pub struct CounterView {
    accessors: Accessors<CounterState, CounterAction>,
}

impl CounterView {
    /// View reading from the provider behind `accessors`
    #[must_use]
    pub const fn new(accessors: Accessors<CounterState, CounterAction>) -> Self {
        Self { accessors }
    }
}

impl Component for CounterView {
    fn render(&self, cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
        let ctx = self.accessors.use_context_accessors(cx)?;

        let on_mount = ctx.dispatch.clone();
        cx.use_mount_effect(move || on_mount.send(ActionType::Increment.into()))?;

        cx.text(format!("Value: {}", ctx.state.value));

        let dispatch = ctx.dispatch;
        cx.on("increment", move || dispatch.send(ActionType::Increment.into()));
        Ok(Children::new())
    }
}

/// Buttons for decrementing, resetting and setting a preset value
#[derive(Debug, Clone, Copy)]
pub struct CounterControls {
    accessors: Accessors<CounterState, CounterAction>,
    preset: i64,
}

impl CounterControls {
    /// Controls whose `set` event stores `preset`
    #[must_use]
    pub const fn new(accessors: Accessors<CounterState, CounterAction>, preset: i64) -> Self {
        Self { accessors, preset }
    }
}

impl Component for CounterControls {
    fn render(&self, cx: &mut RenderContext<'_>) -> Result<Children, RenderError> {
        let ctx = self.accessors.use_context_accessors(cx)?;

        let decrement = ctx.dispatch.clone();
        cx.on("decrement", move || decrement.send(ActionType::Decrement.into()));

        let reset = ctx.dispatch.clone();
        cx.on("reset", move || reset.send(ActionType::Reset.into()));

        let preset = self.preset;
        let set = ctx.dispatch;
        cx.on("set", move || {
            set.send(ReducerAction::with_data(ActionType::Set, preset.into()));
        });

        cx.text(format!("[-] [reset] [set {preset}]"));
        Ok(Children::new())
    }
}

/// The whole app: a provider around the view and the controls
#[must_use]
pub fn app(counter: &Bootstrapped<CounterReducer>) -> Element {
    let accessors = counter.accessors();
    counter.provider([
        Element::new(CounterView::new(accessors)),
        Element::new(CounterControls::new(accessors, 42)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use simple_provider_testing::ReducerTest;

    #[test]
    fn test_increment() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_action(ActionType::Increment.into())
            .then_state(|state| assert_eq!(state.value, 1))
            .run();
    }

    #[test]
    fn test_decrement() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { value: 5 })
            .when_action(ActionType::Decrement.into())
            .then_state(|state| assert_eq!(state.value, 4))
            .run();
    }

    #[test]
    fn test_reset() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { value: 42 })
            .when_action(ActionType::Reset.into())
            .then_state(|state| assert_eq!(state.value, 0))
            .run();
    }

    #[test]
    fn test_set_uses_payload() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_action(ReducerAction::with_data(ActionType::Set, json!(7)))
            .then_state(|state| assert_eq!(state.value, 7))
            .run();
    }

    #[test]
    fn test_set_without_integer_payload_is_ignored() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { value: 3 })
            .when_actions([
                ReducerAction::new(ActionType::Set),
                ReducerAction::with_data(ActionType::Set, json!({ "some": "data" })),
            ])
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_reset_at_zero_is_unchanged() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_action(ActionType::Reset.into())
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_overflow_is_ignored() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState { value: i64::MAX })
            .when_action(ActionType::Increment.into())
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_multiple_operations() {
        ReducerTest::new(CounterReducer)
            .given_state(CounterState::default())
            .when_actions([
                ActionType::Increment.into(),
                ActionType::Increment.into(),
                ActionType::Decrement.into(),
            ])
            .then_state(|state| assert_eq!(state.value, 1))
            .run();
    }

    #[test]
    fn test_action_wire_format() {
        let action: CounterAction = ReducerAction::with_data(ActionType::Set, json!(3));
        let encoded = serde_json::to_value(&action).unwrap_or_default();
        assert_eq!(encoded, json!({ "type": "SET", "data": 3 }));
    }
}
