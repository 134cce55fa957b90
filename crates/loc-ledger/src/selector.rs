//! Equality selectors over JSON state values.
//!
//! A selector is the `{"selector": {...}}` document understood by the
//! state index. Only top-level field equality is supported, which is all the
//! role-relative listings need. Selectors are assembled from values rather
//! than by splicing strings, so field values cannot alter the query shape.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::LedgerError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    fields: BTreeMap<String, Value>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Parse a `{"selector": {...}}` document.
    pub fn from_json(text: &str) -> Result<Self, LedgerError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| LedgerError::InvalidSelector(e.to_string()))?;
        let Some(Value::Object(criteria)) = document.get("selector") else {
            return Err(LedgerError::InvalidSelector(
                "missing \"selector\" object".into(),
            ));
        };

        let mut fields = BTreeMap::new();
        for (field, value) in criteria {
            if value.is_object() || value.is_array() {
                return Err(LedgerError::InvalidSelector(format!(
                    "field {field:?}: only scalar equality is supported"
                )));
            }
            fields.insert(field.clone(), value.clone());
        }
        Ok(Self { fields })
    }

    /// The selector as a query document.
    pub fn to_json(&self) -> Value {
        let criteria: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut document = Map::new();
        document.insert("selector".into(), Value::Object(criteria));
        Value::Object(document)
    }

    /// Returns `true` if every field of the selector is present and equal.
    /// Non-object values never match.
    pub fn matches(&self, value: &Value) -> bool {
        let Some(object) = value.as_object() else {
            return false;
        };
        self.fields
            .iter()
            .all(|(field, expected)| object.get(field) == Some(expected))
    }

    /// Decode raw bytes and match; undecodable values do not match.
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        serde_json::from_slice::<Value>(bytes)
            .map(|value| self.matches(&value))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
