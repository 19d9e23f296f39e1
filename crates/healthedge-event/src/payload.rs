use healthedge_canonical::CanonicalizationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::EventError;

/// Sensor readings or alert details: a mapping from string keys to JSON values.
///
/// Values are the JSON variant tree (`null`, booleans, finite numbers, strings,
/// arrays, nested objects), so every payload has a canonical encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a float reading.
    ///
    /// `NaN` and infinities have no JSON form and are rejected rather than
    /// stored as `null`.
    pub fn insert_f64(&mut self, key: impl Into<String>, value: f64) -> Result<&mut Self, EventError> {
        let key = key.into();
        let number = Number::from_f64(value)
            .ok_or_else(|| CanonicalizationError::NonFiniteNumber(format!("payload.{key}")))?;
        self.0.insert(key, Value::Number(number));
        Ok(self)
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload, returning the underlying mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Payload {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(EventError::WrongType {
                field: "payload",
                expected: "an object",
                value: other.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
