use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action kind dispatched once at registration to seed a store's state.
pub(crate) const INIT_KIND: &str = "@@INIT";

/// An action describing a state transition, consumed by a store's reducer.
///
/// Actions carry a `kind` tag the reducer matches on and an arbitrary JSON
/// payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    kind: String,
    payload: Value,
}

impl Action {
    /// Create an action with the given kind and payload.
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Create an action with no payload.
    pub fn bare(kind: impl Into<String>) -> Self {
        Self::new(kind, Value::Null)
    }

    pub(crate) fn init() -> Self {
        Self::bare(INIT_KIND)
    }

    /// The kind tag of this action.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The payload attached to this action.
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_round_trips_through_serde() {
        let action = Action::new("ADD_TODO", json!({ "text": "write docs" }));
        let encoded = serde_json::to_string(&action).unwrap();
        let decoded: Action = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, action);
        assert_eq!(decoded.kind(), "ADD_TODO");
        assert_eq!(decoded.payload()["text"], "write docs");
    }

    #[test]
    fn bare_action_has_null_payload() {
        let action = Action::bare("RESET");
        assert_eq!(action.payload(), &Value::Null);
    }
}
