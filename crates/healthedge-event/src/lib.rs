//! Immutable event records for physiological measurements and alerts.
//!
//! This crate provides:
//! - [`Event`], a validated value type whose fields can only be read
//! - integrity hashes derived from the canonical encoding of the five
//!   content fields (`identifier`, `classification`, `timestamp`, `priority`,
//!   `payload`)
//! - the external (wire/storage) form consumed by transport and storage layers
//! - injectable clock and identifier sources for [`Event::create`]
//!
//! Core invariants:
//! - A live `Event` always carries a UUID identifier, a non-negative priority,
//!   a timezone-qualified ISO-8601 timestamp and a mapping payload
//! - Construction either fully succeeds or returns an [`EventError`]
//! - Nothing mutates an event after construction
//!
#![deny(missing_docs)]

/// Event kinds and their string tags.
pub mod classification;
/// Error types for event construction and verification.
pub mod errors;
/// The event value type and its external form.
pub mod event;
/// Factories with injectable clock and identifier sources.
pub mod factory;
/// Identifier and timestamp field types.
pub mod fields;
/// Event payload mapping.
pub mod payload;

pub use classification::EventClassification;
pub use errors::{ErrorKind, EventError};
pub use event::{Event, EventFields, DEFAULT_PRIORITY};
pub use factory::{
    Clock, EventFactory, FixedClock, FixedIds, IdSource, NewEvent, RandomIds, SystemClock,
};
pub use fields::{EventId, Timestamp};
pub use healthedge_canonical::HexDigest;
pub use payload::Payload;
