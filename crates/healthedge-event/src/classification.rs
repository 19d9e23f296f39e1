use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::errors::EventError;

/// Kind of event carried through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventClassification {
    /// Routine physiological reading.
    Measurement,
    /// Abnormal or urgent condition that needs attention.
    Alert,
}

impl EventClassification {
    /// All classifications, in tag order.
    pub const ALL: [EventClassification; 2] =
        [EventClassification::Measurement, EventClassification::Alert];

    /// Stable string tag used on the wire and in the hash input.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventClassification::Measurement => "MEASUREMENT",
            EventClassification::Alert => "ALERT",
        }
    }
}

impl fmt::Display for EventClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventClassification {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventError::UnknownClassification {
                value: s.to_string(),
            })
    }
}
