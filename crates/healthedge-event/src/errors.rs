use healthedge_canonical::CanonicalizationError;
use thiserror::Error;

/// Broad category of an [`EventError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A string field is not in the required format.
    Format,
    /// A field has the wrong JSON type or is missing.
    Type,
    /// A numeric field is outside its allowed range.
    Range,
    /// The payload cannot be canonically encoded.
    Canonicalization,
    /// The stored integrity hash does not match the content.
    Integrity,
}

/// Errors produced while constructing, decoding or verifying an event.
///
/// Every variant names the offending field and, where one was received, its value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// `identifier` is not a UUID string.
    #[error("identifier must be a valid UUID string, got '{value}'")]
    InvalidIdentifier {
        /// Offending value.
        value: String,
    },
    /// `timestamp` is not ISO-8601.
    #[error("timestamp must be an ISO-8601 date-time, got '{value}'")]
    InvalidTimestamp {
        /// Offending value.
        value: String,
    },
    /// `timestamp` parsed but carries no UTC offset.
    #[error("timestamp must include a timezone offset, got '{value}'")]
    MissingTimezone {
        /// Offending value.
        value: String,
    },
    /// `classification` is not one of the known tags.
    #[error("classification must be MEASUREMENT or ALERT, got '{value}'")]
    UnknownClassification {
        /// Offending value.
        value: String,
    },
    /// A supplied `integrity_hash` is not 64 lowercase hex characters.
    #[error("integrity_hash must be 64 lowercase hex characters, got '{value}'")]
    InvalidIntegrityHash {
        /// Offending value.
        value: String,
    },
    /// A field has the wrong JSON type.
    #[error("{field} must be {expected}, got {value}")]
    WrongType {
        /// Field name.
        field: &'static str,
        /// Expected type description.
        expected: &'static str,
        /// Offending value rendered as JSON.
        value: String,
    },
    /// A required field is absent.
    #[error("{field} is required")]
    MissingField {
        /// Field name.
        field: &'static str,
    },
    /// `priority` is below zero.
    #[error("priority must be >= 0, got {value}")]
    NegativePriority {
        /// Offending value.
        value: i128,
    },
    /// `priority` does not fit the stored range `0..=u64::MAX`.
    #[error("priority must be between 0 and 18446744073709551615, got {value}")]
    PriorityOutOfRange {
        /// Offending value as written.
        value: String,
    },
    /// The payload holds a value that cannot be canonically encoded.
    #[error("payload is not canonicalizable: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// The stored hash differs from the hash recomputed over the content.
    #[error("integrity_hash mismatch: stored {stored}, computed {computed}")]
    IntegrityMismatch {
        /// Hash carried by the event.
        stored: String,
        /// Hash recomputed from the five content fields.
        computed: String,
    },
}

impl EventError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventError::InvalidIdentifier { .. }
            | EventError::InvalidTimestamp { .. }
            | EventError::MissingTimezone { .. }
            | EventError::UnknownClassification { .. }
            | EventError::InvalidIntegrityHash { .. } => ErrorKind::Format,
            EventError::WrongType { .. } | EventError::MissingField { .. } => ErrorKind::Type,
            EventError::NegativePriority { .. } | EventError::PriorityOutOfRange { .. } => {
                ErrorKind::Range
            }
            EventError::Canonicalization(_) => ErrorKind::Canonicalization,
            EventError::IntegrityMismatch { .. } => ErrorKind::Integrity,
        }
    }
}
