//! Recovery of step records from free-form model output
//!
//! The extraction collaborator has no enforced output schema, so this parser
//! is maximally permissive: it digs a JSON array out of whatever text came
//! back, tolerates trailing garbage, and falls back to a placeholder
//! workflow when nothing usable survives. Structural correctness is the
//! normalizer's job, not this module's.

use crate::core::record::StepRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// Parse step records out of a raw model response.
///
/// Total function: always returns a non-empty list. When every recovery
/// tier fails the result is the canonical placeholder workflow from
/// [`fallback_steps`].
pub fn parse_steps(raw: &str) -> Vec<StepRecord> {
    let records = recover_records(raw);
    if records.is_empty() {
        warn!("no usable step records in extraction response; using placeholder workflow");
        return fallback_steps();
    }
    records
}

/// The canonical placeholder workflow used when extraction is unusable:
/// start event -> "Analysis Required" task -> end event.
pub fn fallback_steps() -> Vec<StepRecord> {
    vec![
        StepRecord::new("step_1", "Start", "Process initiation", "event", vec!["step_2"]),
        StepRecord::new(
            "step_2",
            "Analysis Required",
            "Manual analysis needed - automatic extraction failed",
            "task",
            vec!["step_3"],
        ),
        StepRecord::new("step_3", "End", "Process completion", "event", vec![]),
    ]
}

fn recover_records(raw: &str) -> Vec<StepRecord> {
    let Some(value) = decode_bracketed(raw) else {
        return Vec::new();
    };

    let items = adopt_items(value);

    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match StepRecord::from_value(item, index + 1) {
            Some(record) => records.push(record),
            None => warn!("dropping non-record entry at position {}", index + 1),
        }
    }
    records
}

/// Pull the list of candidate records out of a decoded value. An object is
/// scanned in insertion order and its first list-valued entry adopted.
fn adopt_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            for (key, entry) in map {
                if let Value::Array(items) = entry {
                    debug!("adopting list-valued entry '{}' from object response", key);
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Locate and decode the first bracketed region of the response.
///
/// Two tiers: a strict decode of the widest `[...]` span, then a tolerant
/// decode from the first `[` that accepts a valid prefix and ignores
/// whatever trails it.
fn decode_bracketed(raw: &str) -> Option<Value> {
    let start = raw.find('[')?;

    if let Some(end) = raw.rfind(']').filter(|&end| end > start) {
        if let Ok(value) = serde_json::from_str::<Value>(&raw[start..=end]) {
            return Some(value);
        }
    }

    let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            debug!("tolerant decode of extraction response failed: {}", e);
            None
        }
        None => None,
    }
}
