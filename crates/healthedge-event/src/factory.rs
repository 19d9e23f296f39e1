use chrono::{DateTime, Utc};
use uuid::Uuid;

use std::fmt;

use crate::classification::EventClassification;
use crate::errors::EventError;
use crate::event::{Event, EventFields, DEFAULT_PRIORITY};
use crate::fields::{EventId, Timestamp};
use crate::payload::Payload;

/// Source of the current time for default timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for reproducible events in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant to return.
    pub instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always returns `instant`.
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Source of fresh event identifiers.
pub trait IdSource: Send + Sync {
    /// Returns a new identifier.
    fn next_id(&self) -> Uuid;
}

/// Random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Always hands out the same identifier.
#[derive(Debug, Clone, Copy)]
pub struct FixedIds(pub Uuid);

impl IdSource for FixedIds {
    fn next_id(&self) -> Uuid {
        self.0
    }
}

/// Arguments for [`Event::create`]: classification and payload are required,
/// everything else falls back to a default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Event kind.
    pub classification: EventClassification,
    /// Readings or alert details.
    pub payload: Payload,
    /// Urgency rank (default [`DEFAULT_PRIORITY`]).
    pub priority: i128,
    /// Explicit identifier; generated when `None` or empty.
    pub identifier: Option<String>,
    /// Explicit timestamp; taken from the clock when `None` or empty.
    pub timestamp: Option<String>,
}

impl NewEvent {
    /// Starts an event of the given kind with default priority.
    pub fn new(classification: EventClassification, payload: Payload) -> Self {
        Self {
            classification,
            payload,
            priority: DEFAULT_PRIORITY,
            identifier: None,
            timestamp: None,
        }
    }

    /// Sets the priority.
    pub fn priority(mut self, priority: i128) -> Self {
        self.priority = priority;
        self
    }

    /// Sets an explicit identifier.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets an explicit timestamp.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Creates events, filling missing identifiers and timestamps from its sources.
pub struct EventFactory<C = SystemClock, I = RandomIds> {
    clock: C,
    ids: I,
}

impl EventFactory {
    /// Factory backed by the wall clock and random v4 UUIDs.
    pub fn system() -> Self {
        Self::new(SystemClock, RandomIds)
    }
}

impl Default for EventFactory {
    fn default() -> Self {
        Self::system()
    }
}

impl<C: Clock, I: IdSource> EventFactory<C, I> {
    /// Factory with explicit sources.
    pub fn new(clock: C, ids: I) -> Self {
        Self { clock, ids }
    }

    /// Fills defaults and constructs the event.
    ///
    /// # Errors
    ///
    /// Only explicitly supplied fields can fail validation; generated
    /// defaults are always valid.
    pub fn create(&self, new: NewEvent) -> Result<Event, EventError> {
        let identifier = match new.identifier.filter(|id| !id.is_empty()) {
            Some(identifier) => identifier,
            None => EventId::from_uuid(self.ids.next_id()).to_string(),
        };
        let timestamp = match new.timestamp.filter(|ts| !ts.is_empty()) {
            Some(timestamp) => timestamp,
            None => Timestamp::from_datetime(self.clock.now().into()).to_string(),
        };

        Event::new(EventFields {
            identifier,
            classification: new.classification,
            timestamp,
            priority: new.priority,
            payload: new.payload,
            integrity_hash: None,
        })
    }
}

impl<C, I> fmt::Debug for EventFactory<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFactory").finish_non_exhaustive()
    }
}

impl Event {
    /// Creates an event using the wall clock and a random v4 UUID for any
    /// field left unset in `new`.
    ///
    /// ```rust
    /// use healthedge_event::{Event, EventClassification, NewEvent, Payload};
    ///
    /// let payload: Payload = [("heart_rate", 88), ("spo2", 97)].into_iter().collect();
    /// let event = Event::create(NewEvent::new(EventClassification::Measurement, payload).priority(2))?;
    /// assert_eq!(event.priority(), 2);
    /// assert!(event.has_valid_integrity());
    /// # Ok::<(), healthedge_event::EventError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if an explicitly supplied field is invalid.
    pub fn create(new: NewEvent) -> Result<Event, EventError> {
        EventFactory::system().create(new)
    }
}
