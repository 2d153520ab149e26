//! Tagged actions with an optional payload.

use serde::{Deserialize, Serialize};

/// An action: a `kind` drawn from a closed set plus optional data
///
/// The payload defaults to [`serde_json::Value`], which keeps it opaque the
/// way most reducers want it. A reducer that prefers a typed payload picks
/// its own `P`.
///
/// Serialized with the kind under `"type"`, matching the usual
/// `{ "type": ..., "data": ... }` wire shape.
///
/// # Example
///
/// ```
/// use simple_provider_core::action::ReducerAction;
/// use serde_json::json;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum ActionType {
///     Rename,
/// }
///
/// let action = ReducerAction::with_data(ActionType::Rename, json!({ "name": "basil" }));
/// assert_eq!(action.kind, ActionType::Rename);
/// assert_eq!(action.data, Some(json!({ "name": "basil" })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerAction<K, P = serde_json::Value> {
    /// What kind of transition is requested
    #[serde(rename = "type")]
    pub kind: K,

    /// Optional data attached to the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<P>,
}

impl<K, P> ReducerAction<K, P> {
    /// Action without payload
    #[must_use]
    pub const fn new(kind: K) -> Self {
        Self { kind, data: None }
    }

    /// Action carrying a payload
    #[must_use]
    pub const fn with_data(kind: K, data: P) -> Self {
        Self {
            kind,
            data: Some(data),
        }
    }

    /// Payload, if any
    #[must_use]
    pub const fn data(&self) -> Option<&P> {
        self.data.as_ref()
    }

    /// Split into kind and payload
    #[must_use]
    pub fn into_parts(self) -> (K, Option<P>) {
        (self.kind, self.data)
    }
}

impl<K, P> From<K> for ReducerAction<K, P> {
    fn from(kind: K) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum ActionType {
        Test,
    }

    #[test]
    fn test_supports_enum_action_types() {
        let action: ReducerAction<ActionType> =
            ReducerAction::with_data(ActionType::Test, json!({ "some": "data" }));

        assert_eq!(action.kind, ActionType::Test);
        assert_eq!(action.data(), Some(&json!({ "some": "data" })));
    }

    #[test]
    fn test_supports_string_kinds_without_payload() {
        let action: ReducerAction<&str> = "TEST".into();

        assert_eq!(action.kind, "TEST");
        assert!(action.data().is_none());
    }

    #[test]
    fn test_wire_shape_uses_type_field() {
        let action: ReducerAction<ActionType> = ReducerAction::new(ActionType::Test);
        let encoded = serde_json::to_value(&action).unwrap_or_default();
        assert_eq!(encoded, json!({ "type": "Test" }));

        let decoded: Result<ReducerAction<ActionType>, _> =
            serde_json::from_value(json!({ "type": "Test", "data": [1, 2] }));
        assert!(matches!(decoded, Ok(a) if a.data == Some(json!([1, 2]))));
    }
}
