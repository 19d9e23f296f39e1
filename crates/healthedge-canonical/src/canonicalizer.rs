use canonical_json::to_string;
use serde::Serialize;
use serde_json::{Map, Value};

use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// The value does not have the shape the caller asked for.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// The value could not be converted into the JSON value model.
    #[error("value is not representable as JSON: {0}")]
    Serialization(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic RFC 8785 bytes.
///
/// Two values that are equal as JSON (regardless of the order their object
/// members were inserted in) always produce byte-identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical UTF-8 bytes for `value`.
    ///
    /// A `serde_json::Number` cannot hold NaN or infinity unless the
    /// `arbitrary_precision` feature is enabled somewhere in the build, so
    /// `NonFiniteNumber` is only raised under that feature. Float readings are
    /// checked earlier by `Payload::insert_f64`, which reports the same error.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;

        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Produces canonical bytes for a key-value mapping.
    pub fn canonicalize_map(
        &self,
        map: &Map<String, Value>,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        self.canonicalize(&Value::Object(map.clone()))
    }

    /// Produces canonical bytes for a value whose root must be an object.
    ///
    /// Any other root is rejected with
    /// [`CanonicalizationError::InvalidStructure`] naming the JSON type found.
    pub fn canonicalize_object(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        match value {
            Value::Object(_) => self.canonicalize(value),
            other => Err(CanonicalizationError::InvalidStructure(format!(
                "expected an object at root, got {}",
                json_type(other)
            ))),
        }
    }

    /// Converts any `Serialize` value into the JSON model, then canonicalizes it.
    ///
    /// Conversion failures (non-string map keys, a custom `Serialize` impl
    /// returning an error) become [`CanonicalizationError::Serialization`].
    /// `serde_json` turns non-finite floats into `null` during this
    /// conversion; reject them before calling this if that matters.
    pub fn canonicalize_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let value = serde_json::to_value(value)
            .map_err(|err| CanonicalizationError::Serialization(err.to_string()))?;
        self.canonicalize(&value)
    }

    /// Rejects values the canonical encoding cannot represent.
    #[allow(clippy::only_used_in_recursion)]
    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_display_joins_segments() {
        let path = Path::root().push_field("payload").push_index(2).push_field("x");
        assert_eq!(path.to_string(), "payload.[2].x");
        assert_eq!(Path::root().to_string(), "root");
    }

    #[test]
    fn finite_numbers_pass_validation() {
        let value = json!({"payload": {"temp": 36.6, "readings": [1, -2, 0.5]}});
        assert_eq!(Canonicalizer::new().validate(&value, Path::root()), Ok(()));
    }

    #[test]
    fn non_finite_numbers_are_unrepresentable_without_arbitrary_precision() {
        assert!(serde_json::Number::from_f64(f64::NAN).is_none());
        assert!(serde_json::Number::from_f64(f64::INFINITY).is_none());
        assert_eq!(json!(f64::NEG_INFINITY), Value::Null);
    }

    #[test]
    fn non_finite_error_names_the_path() {
        let path = Path::root().push_field("payload").push_field("temp");
        let err = CanonicalizationError::NonFiniteNumber(path.to_string());
        assert_eq!(err.to_string(), "non-finite number detected at payload.temp");
    }
}
