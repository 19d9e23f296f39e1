use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use std::fmt;

use crate::errors::EventError;

/// Event identifier: any string `uuid` accepts as a UUID.
///
/// The original text is kept verbatim because it feeds the integrity hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    raw: String,
    uuid: Uuid,
}

impl EventId {
    /// Parses a UUID string of any version.
    pub fn parse(value: impl Into<String>) -> Result<Self, EventError> {
        let raw = value.into();
        match Uuid::parse_str(&raw) {
            Ok(uuid) => Ok(Self { raw, uuid }),
            Err(_) => Err(EventError::InvalidIdentifier { value: raw }),
        }
    }

    /// Wraps a freshly generated UUID in its hyphenated lowercase form.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            raw: uuid.hyphenated().to_string(),
            uuid,
        }
    }

    /// The identifier exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Accepted date-time layouts beyond strict RFC 3339. `%.f` also matches an
// absent fractional part.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO-8601 timestamp that carries an explicit UTC offset (`Z` or `±hh:mm`).
///
/// Equality compares the original text, not the instant: `...Z` and
/// `...+00:00` are different timestamps as far as hashing is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Parses a timezone-qualified ISO-8601 date-time.
    ///
    /// # Errors
    ///
    /// [`EventError::MissingTimezone`] when the text is a valid local
    /// date-time without offset, [`EventError::InvalidTimestamp`] otherwise.
    pub fn parse(value: impl Into<String>) -> Result<Self, EventError> {
        let raw = value.into();
        let text = raw.as_str();

        let parsed = DateTime::parse_from_rfc3339(text).ok().or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        });
        if let Some(instant) = parsed {
            return Ok(Self { raw, instant });
        }

        let is_local = NAIVE_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
            || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();
        if is_local {
            Err(EventError::MissingTimezone { value: raw })
        } else {
            Err(EventError::InvalidTimestamp { value: raw })
        }
    }

    /// Wraps an instant, rendered as RFC 3339 with microseconds.
    pub fn from_datetime(instant: DateTime<FixedOffset>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(chrono::SecondsFormat::Micros, false),
            instant,
        }
    }

    /// The timestamp exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed instant with its original offset.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn identifier_accepts_any_uuid_version() {
        for raw in [
            "0b5c4f7e-2f1d-4b7e-9a53-8c7d2d1f6a10",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "00000000-0000-0000-0000-000000000000",
            "0B5C4F7E-2F1D-4B7E-9A53-8C7D2D1F6A10",
        ] {
            let id = EventId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn identifier_rejects_garbage() {
        let err = EventId::parse("not-a-uuid").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn generated_identifier_is_hyphenated() {
        let uuid = Uuid::from_u128(0x0b5c4f7e_2f1d_4b7e_9a53_8c7d2d1f6a10);
        let id = EventId::from_uuid(uuid);
        assert_eq!(id.as_str(), "0b5c4f7e-2f1d-4b7e-9a53-8c7d2d1f6a10");
        assert_eq!(id.uuid(), uuid);
    }

    #[test]
    fn timestamp_accepts_utc_and_offsets() {
        for raw in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00+00:00",
            "2024-01-01T00:00:00.123456+00:00",
            "2024-06-30T23:59:59-07:00",
            "2024-01-01 08:30:00+05:30",
        ] {
            let ts = Timestamp::parse(raw).unwrap_or_else(|e| panic!("{raw}: {e}"));
            assert_eq!(ts.as_str(), raw);
        }
    }

    #[test]
    fn timestamp_without_offset_is_missing_timezone() {
        for raw in ["2024-01-01T00:00:00", "2024-01-01 00:00:00.5", "2024-01-01"] {
            assert!(matches!(
                Timestamp::parse(raw),
                Err(EventError::MissingTimezone { .. })
            ));
        }
    }

    #[test]
    fn timestamp_rejects_garbage() {
        for raw in ["", "yesterday", "2024-13-01T00:00:00Z", "1700000000"] {
            let err = Timestamp::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{raw}");
        }
    }

    #[test]
    fn from_datetime_renders_rfc3339_micros() {
        let instant = DateTime::parse_from_rfc3339("2025-03-04T05:06:07.5Z").unwrap();
        let ts = Timestamp::from_datetime(instant);
        assert_eq!(ts.as_str(), "2025-03-04T05:06:07.500000+00:00");
        assert_eq!(ts.instant(), instant);
    }
}
