//! Create command implementation.

use healthedge_event::{Event, EventClassification, NewEvent, Payload};
use serde_json::Value;

use crate::output;

pub struct CreateArgs {
    pub classification: EventClassification,
    pub payload: Option<String>,
    pub priority: Option<i128>,
    pub identifier: Option<String>,
    pub timestamp: Option<String>,
    pub pretty: bool,
}

pub fn run(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let payload = match args.payload {
        Some(text) => {
            let value: Value =
                serde_json::from_str(&text).map_err(|e| format!("Invalid payload JSON: {}", e))?;
            Payload::try_from(value)?
        }
        None => Payload::new(),
    };

    let mut new = NewEvent::new(args.classification, payload);
    if let Some(priority) = args.priority {
        new = new.priority(priority);
    }
    if let Some(identifier) = args.identifier {
        new = new.identifier(identifier);
    }
    if let Some(timestamp) = args.timestamp {
        new = new.timestamp(timestamp);
    }

    let event = Event::create(new)?;
    tracing::info!(
        identifier = %event.identifier(),
        classification = %event.classification(),
        priority = event.priority(),
        integrity_hash = %event.integrity_hash(),
        "created event"
    );

    println!("{}", output::format_json(&event.to_value(), args.pretty));
    Ok(())
}
