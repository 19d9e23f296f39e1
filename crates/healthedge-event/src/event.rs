use healthedge_canonical::{digest_of_mapping, HexDigest};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::classification::EventClassification;
use crate::errors::EventError;
use crate::fields::{EventId, Timestamp};
use crate::payload::Payload;

/// Priority used by [`crate::NewEvent`] when none is given.
pub const DEFAULT_PRIORITY: i128 = 1;

const IDENTIFIER: &str = "identifier";
const CLASSIFICATION: &str = "classification";
const TIMESTAMP: &str = "timestamp";
const PRIORITY: &str = "priority";
const PAYLOAD: &str = "payload";
const INTEGRITY_HASH: &str = "integrity_hash";

/// Key names written by earlier producers, read when the current key is absent.
const LEGACY_IDENTIFIER: &str = "event_id";
const LEGACY_CLASSIFICATION: &str = "type";
const LEGACY_INTEGRITY_HASH: &str = "hash";

/// Unvalidated field set handed to [`Event::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    /// UUID string.
    pub identifier: String,
    /// Event kind.
    pub classification: EventClassification,
    /// ISO-8601 timestamp with timezone.
    pub timestamp: String,
    /// Urgency rank, must be in `0..=u64::MAX`.
    pub priority: i128,
    /// Readings or alert details.
    pub payload: Payload,
    /// Precomputed hash; `None` or empty means "compute it".
    pub integrity_hash: Option<String>,
}

/// Immutable measurement or alert record with a content-derived integrity hash.
///
/// Fields are private and set once by a validating constructor; there are no
/// mutators. The hash is SHA-256 over the canonical JSON encoding of
/// `{identifier, classification, timestamp, priority, payload}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Event {
    identifier: EventId,
    classification: EventClassification,
    timestamp: Timestamp,
    priority: u64,
    payload: Payload,
    integrity_hash: HexDigest,
}

impl Event {
    /// Validates `fields` and builds an event.
    ///
    /// Checks run in order identifier, priority, timestamp, and the first
    /// failure is returned. A missing or empty `integrity_hash` is computed;
    /// a supplied one is kept as long as it is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] naming the first invalid field.
    pub fn new(fields: EventFields) -> Result<Self, EventError> {
        let identifier = EventId::parse(fields.identifier)?;
        let priority = check_priority(fields.priority)?;
        let timestamp = Timestamp::parse(fields.timestamp)?;
        Self::assemble(
            identifier,
            fields.classification,
            timestamp,
            priority,
            fields.payload,
            fields.integrity_hash,
        )
    }

    /// Reconstructs an event from its external form.
    ///
    /// `payload` and `integrity_hash` may be absent (or `null`); the payload
    /// then defaults to an empty mapping and the hash is recomputed. Fields
    /// are checked in order identifier, classification, priority, timestamp,
    /// payload, integrity_hash. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] naming the first missing or invalid field.
    pub fn from_value(value: &Value) -> Result<Self, EventError> {
        let Some(obj) = value.as_object() else {
            return Err(EventError::WrongType {
                field: "event",
                expected: "an object",
                value: value.to_string(),
            });
        };

        let identifier = EventId::parse(required_str(obj, IDENTIFIER, Some(LEGACY_IDENTIFIER))?)?;
        let classification: EventClassification =
            required_str(obj, CLASSIFICATION, Some(LEGACY_CLASSIFICATION))?.parse()?;
        let priority = priority_from_value(lookup(obj, PRIORITY, None))?;
        let timestamp = Timestamp::parse(required_str(obj, TIMESTAMP, None)?)?;
        let payload = match lookup(obj, PAYLOAD, None) {
            Some(value) => Payload::try_from(value.clone())?,
            None => Payload::new(),
        };
        let integrity_hash = match lookup(obj, INTEGRITY_HASH, Some(LEGACY_INTEGRITY_HASH)) {
            Some(Value::String(hash)) => Some(hash.clone()),
            Some(other) => {
                return Err(EventError::WrongType {
                    field: INTEGRITY_HASH,
                    expected: "a string",
                    value: other.to_string(),
                })
            }
            None => None,
        };

        Self::assemble(
            identifier,
            classification,
            timestamp,
            priority,
            payload,
            integrity_hash,
        )
    }

    /// Returns the non-empty hash a document carries, resolved the same way
    /// [`Event::from_value`] resolves it (`integrity_hash`, then `hash`).
    ///
    /// `None` means the event would get a freshly computed hash on load.
    pub fn supplied_hash(document: &Value) -> Option<&str> {
        let obj = document.as_object()?;
        lookup(obj, INTEGRITY_HASH, Some(LEGACY_INTEGRITY_HASH))
            .and_then(Value::as_str)
            .filter(|hash| !hash.is_empty())
    }

    /// Projects the event into its external form: a JSON object with exactly
    /// `identifier`, `classification`, `timestamp`, `priority`, `payload` and
    /// `integrity_hash`.
    pub fn to_value(&self) -> Value {
        let mut map = self.content_map();
        map.insert(
            INTEGRITY_HASH.to_string(),
            Value::String(self.integrity_hash.to_string()),
        );
        Value::Object(map)
    }

    /// Recomputes the hash over the five content fields.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Canonicalization`] if the payload cannot be encoded.
    pub fn compute_integrity_hash(&self) -> Result<HexDigest, EventError> {
        Ok(digest_of_mapping(&self.content_map())?)
    }

    /// Checks that the stored hash matches the content.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::IntegrityMismatch`] when the content was altered
    /// after the hash was computed.
    pub fn verify_integrity(&self) -> Result<(), EventError> {
        let computed = self.compute_integrity_hash()?;
        if computed != self.integrity_hash {
            return Err(EventError::IntegrityMismatch {
                stored: self.integrity_hash.to_string(),
                computed: computed.to_string(),
            });
        }
        Ok(())
    }

    /// Boolean form of [`Event::verify_integrity`].
    pub fn has_valid_integrity(&self) -> bool {
        self.verify_integrity().is_ok()
    }

    /// Event identifier.
    pub fn identifier(&self) -> &EventId {
        &self.identifier
    }

    /// Event kind.
    pub fn classification(&self) -> EventClassification {
        self.classification
    }

    /// When the event occurred.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Urgency rank.
    pub fn priority(&self) -> u64 {
        self.priority
    }

    /// Readings or alert details.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Content digest.
    pub fn integrity_hash(&self) -> &HexDigest {
        &self.integrity_hash
    }

    fn assemble(
        identifier: EventId,
        classification: EventClassification,
        timestamp: Timestamp,
        priority: u64,
        payload: Payload,
        integrity_hash: Option<String>,
    ) -> Result<Self, EventError> {
        let supplied = match integrity_hash.filter(|hash| !hash.is_empty()) {
            Some(hash) => match HexDigest::parse(hash.as_str()) {
                Ok(digest) => Some(digest),
                Err(_) => return Err(EventError::InvalidIntegrityHash { value: hash }),
            },
            None => None,
        };

        let content = content_map(&identifier, classification, &timestamp, priority, &payload);
        let integrity_hash = match supplied {
            Some(hash) => hash,
            None => digest_of_mapping(&content)?,
        };

        Ok(Self {
            identifier,
            classification,
            timestamp,
            priority,
            payload,
            integrity_hash,
        })
    }

    fn content_map(&self) -> Map<String, Value> {
        content_map(
            &self.identifier,
            self.classification,
            &self.timestamp,
            self.priority,
            &self.payload,
        )
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl TryFrom<Value> for Event {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Event::from_value(&value)
    }
}

impl TryFrom<EventFields> for Event {
    type Error = EventError;

    fn try_from(fields: EventFields) -> Result<Self, Self::Error> {
        Event::new(fields)
    }
}

/// The hash input: the five content fields, never the hash itself.
fn content_map(
    identifier: &EventId,
    classification: EventClassification,
    timestamp: &Timestamp,
    priority: u64,
    payload: &Payload,
) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(IDENTIFIER.to_string(), Value::String(identifier.to_string()));
    map.insert(
        CLASSIFICATION.to_string(),
        Value::String(classification.as_str().to_string()),
    );
    map.insert(TIMESTAMP.to_string(), Value::String(timestamp.to_string()));
    map.insert(PRIORITY.to_string(), Value::from(priority));
    map.insert(PAYLOAD.to_string(), Value::Object(payload.as_map().clone()));
    map
}

fn check_priority(priority: i128) -> Result<u64, EventError> {
    u64::try_from(priority).map_err(|_| {
        if priority < 0 {
            EventError::NegativePriority { value: priority }
        } else {
            EventError::PriorityOutOfRange {
                value: priority.to_string(),
            }
        }
    })
}

fn lookup<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    legacy: Option<&str>,
) -> Option<&'a Value> {
    obj.get(key)
        .filter(|value| !value.is_null())
        .or_else(|| legacy.and_then(|legacy| obj.get(legacy)))
        .filter(|value| !value.is_null())
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    legacy: Option<&str>,
) -> Result<&'a str, EventError> {
    match lookup(obj, field, legacy) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(EventError::WrongType {
            field,
            expected: "a string",
            value: other.to_string(),
        }),
        None => Err(EventError::MissingField { field }),
    }
}

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn priority_from_value(value: Option<&Value>) -> Result<u64, EventError> {
    let Some(value) = value else {
        return Err(EventError::MissingField { field: PRIORITY });
    };
    if let Value::Number(n) = value {
        if let Some(priority) = n.as_u64() {
            return Ok(priority);
        }
        if let Some(priority) = n.as_i64() {
            return check_priority(i128::from(priority));
        }
        // Integers outside the i64/u64 range parse as floats.
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && (f >= TWO_POW_64 || f < -TWO_POW_63) {
                return Err(EventError::PriorityOutOfRange {
                    value: n.to_string(),
                });
            }
        }
    }
    Err(EventError::WrongType {
        field: PRIORITY,
        expected: "an integer",
        value: value.to_string(),
    })
}
