//! Verify command implementation.

use healthedge_event::{Event, EventError};
use serde_json::{json, Value};

use crate::input;
use crate::output;

/// Outcome of checking one event document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ok,
    Mismatch,
    Invalid,
}

impl Verdict {
    fn as_str(self) -> &'static str {
        match self {
            Verdict::Ok => "ok",
            Verdict::Mismatch => "mismatch",
            Verdict::Invalid => "invalid",
        }
    }
}

struct Report {
    identifier: String,
    classification: String,
    verdict: Verdict,
    detail: Option<String>,
}

fn check(document: &Value) -> Report {
    let event = match Event::from_value(document) {
        Ok(event) => event,
        Err(err) => {
            let field = |key: &str, legacy: &str| {
                document
                    .get(key)
                    .filter(|value| !value.is_null())
                    .or_else(|| document.get(legacy))
                    .and_then(Value::as_str)
                    .unwrap_or("?")
                    .to_string()
            };
            return Report {
                identifier: field("identifier", "event_id"),
                classification: field("classification", "type"),
                verdict: Verdict::Invalid,
                detail: Some(err.to_string()),
            };
        }
    };

    // A document without a stored hash gets one computed on load, so there
    // is nothing to compare against.
    let has_stored_hash = Event::supplied_hash(document).is_some();

    let (verdict, detail) = match event.verify_integrity() {
        Ok(()) if has_stored_hash => (Verdict::Ok, None),
        Ok(()) => (
            Verdict::Invalid,
            Some("integrity_hash is required".to_string()),
        ),
        Err(err @ EventError::IntegrityMismatch { .. }) => {
            tracing::warn!(identifier = %event.identifier(), "integrity hash mismatch");
            (Verdict::Mismatch, Some(err.to_string()))
        }
        Err(err) => (Verdict::Invalid, Some(err.to_string())),
    };

    Report {
        identifier: event.identifier().to_string(),
        classification: event.classification().to_string(),
        verdict,
        detail,
    }
}

pub fn run(
    input: Option<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = input::read_text(input)?;
    let documents = input::parse_documents(&text)?;
    tracing::debug!(count = documents.len(), "verifying events");

    let reports: Vec<Report> = documents.iter().map(check).collect();
    let failed = reports
        .iter()
        .filter(|r| r.verdict != Verdict::Ok)
        .count();

    if json_output {
        let results: Vec<Value> = reports
            .iter()
            .map(|r| {
                json!({
                    "identifier": r.identifier,
                    "classification": r.classification,
                    "verdict": r.verdict.as_str(),
                    "detail": r.detail,
                })
            })
            .collect();
        println!(
            "{}",
            output::format_json(
                &json!({"results": results, "total": reports.len(), "failed": failed}),
                false
            )
        );
    } else {
        output::print_table_header();
        for r in &reports {
            println!(
                "{}",
                output::format_table_row(&r.identifier, &r.classification, r.verdict.as_str())
            );
            if let Some(detail) = &r.detail {
                eprintln!("  {}: {}", r.identifier, detail);
            }
        }
    }

    tracing::info!(total = reports.len(), failed, "verification complete");
    if strict && failed > 0 {
        return Err(format!("{} of {} events failed verification", failed, reports.len()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthedge_event::{EventClassification, NewEvent, Payload};

    fn sample() -> Value {
        let payload: Payload = [("spo2", 97)].into_iter().collect();
        Event::create(NewEvent::new(EventClassification::Measurement, payload))
            .unwrap()
            .to_value()
    }

    #[test]
    fn intact_event_verifies() {
        assert_eq!(check(&sample()).verdict, Verdict::Ok);
    }

    #[test]
    fn altered_event_is_a_mismatch() {
        let mut doc = sample();
        doc["priority"] = json!(9);
        assert_eq!(check(&doc).verdict, Verdict::Mismatch);
    }

    #[test]
    fn unhashed_or_malformed_events_are_invalid() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("integrity_hash");
        assert_eq!(check(&doc).verdict, Verdict::Invalid);

        let report = check(&json!({"identifier": "nope"}));
        assert_eq!(report.verdict, Verdict::Invalid);
        assert_eq!(report.identifier, "nope");
        assert_eq!(report.classification, "?");
    }

    #[test]
    fn null_hash_does_not_hide_a_wrong_legacy_hash() {
        let mut doc = sample();
        doc["integrity_hash"] = Value::Null;
        doc["hash"] = json!("0".repeat(64));
        let report = check(&doc);
        assert_eq!(report.verdict, Verdict::Mismatch);
        assert!(report.detail.unwrap().contains(&"0".repeat(64)));

        doc.as_object_mut().unwrap().remove("hash");
        assert_eq!(check(&doc).verdict, Verdict::Invalid);
    }

    #[test]
    fn invalid_reports_read_legacy_names_behind_nulls() {
        let report = check(&json!({
            "identifier": null,
            "event_id": "nope",
            "classification": null,
            "type": "ALERT"
        }));
        assert_eq!(report.verdict, Verdict::Invalid);
        assert_eq!(report.identifier, "nope");
        assert_eq!(report.classification, "ALERT");
    }
}
