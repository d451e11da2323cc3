//! Read-only game-state tree.
//!
//! A [`GameState`] is one telemetry snapshot supplied by an external game
//! integration.  It carries a `kind` tag that handlers use for dispatch, and a
//! tree of named fields reached through the borrowed [`Node`] view.
//!
//! Accessors never fail: a field that is missing, or present with the wrong
//! JSON type, reads as `None`.  Handlers decide what a missing field means.

use serde_json::Value;
use thiserror::Error;

/// Error type for building a [`GameState`] from raw telemetry.
#[derive(Debug, Error)]
pub enum StateError {
    /// The telemetry payload was not valid JSON.
    #[error("telemetry for {kind:?} is not valid JSON: {source}")]
    Json {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One immutable telemetry snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    kind: String,
    root: Value,
}

impl GameState {
    /// Wraps an already-parsed JSON tree.
    pub fn from_value(kind: impl Into<String>, root: Value) -> Self {
        Self {
            kind: kind.into(),
            root,
        }
    }

    /// Parses a JSON telemetry payload.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Json`] when `text` is not valid JSON.
    pub fn from_json(kind: impl Into<String>, text: &str) -> Result<Self, StateError> {
        let kind = kind.into();
        match serde_json::from_str(text) {
            Ok(root) => Ok(Self { kind, root }),
            Err(source) => Err(StateError::Json { kind, source }),
        }
    }

    /// A state with no fields, used before any telemetry arrives.
    pub fn empty(kind: impl Into<String>) -> Self {
        Self::from_value(kind, Value::Object(serde_json::Map::new()))
    }

    /// Type tag identifying which game produced this snapshot.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn root(&self) -> Node<'_> {
        Node { value: &self.root }
    }
}

/// Borrowed view of one node in a [`GameState`] tree.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> Node<'a> {
    fn field(&self, name: &str) -> Option<&'a Value> {
        self.value.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&'a str> {
        self.field(name)?.as_str()
    }

    /// Integer field.  Whole-valued floats are accepted.
    pub fn int(&self, name: &str) -> Option<i64> {
        let v = self.field(name)?;
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.field(name)?.as_f64()
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.field(name)?.as_bool()
    }

    /// Nested object node.
    pub fn child(&self, name: &str) -> Option<Node<'a>> {
        self.field(name)
            .filter(|v| v.is_object())
            .map(|value| Node { value })
    }

    /// Elements of an array field, or the values of an object field in
    /// document order.  Anything else yields an empty list.
    pub fn items(&self, name: &str) -> Vec<Node<'a>> {
        match self.field(name) {
            Some(Value::Array(values)) => values.iter().map(|value| Node { value }).collect(),
            Some(Value::Object(map)) => map.values().map(|value| Node { value }).collect(),
            _ => Vec::new(),
        }
    }
}
