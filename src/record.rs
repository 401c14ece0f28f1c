//! # Device Record
//! The input side of the pipeline: a named bag of optional hardware attributes.
//!
//! Scorers never look at a concrete record type. They go through [`FieldSource`],
//! a "get field by name" capability, so a plain JSON object, a `HashMap` or the
//! transparent [`DeviceRecord`] wrapper can all be ranked the same way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Read-only access to a record's raw fields by name.
pub trait FieldSource {
    /// Raw value stored under `key`, if any (JSON `null` counts as present here;
    /// the resolver decides what is acceptable).
    fn field(&self, key: &str) -> Option<&Value>;
}

impl FieldSource for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl FieldSource for HashMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, key: &str) -> Option<&Value> {
        (**self).field(key)
    }
}

/// One device specification record as handed over by the caller.
///
/// Serializes back to exactly the object it was built from, so identifying
/// fields (`slug`, `model`, `brand`, `price_sgd`, ...) flow into ranked output untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord(Map<String, Value>);

impl DeviceRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builder-style setter, handy in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }

    pub fn brand(&self) -> Option<&str> {
        self.str_field("brand")
    }

    /// Drop a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl FieldSource for DeviceRecord {
    fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for DeviceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for DeviceRecord {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
