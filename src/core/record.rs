//! Untrusted step records from the extraction collaborator

use serde_json::{Map, Value};

/// A single extracted process step before any validation.
///
/// Records come out of free-form model output, so nothing is guaranteed:
/// ids may collide or be blank, `next` may reference steps that do not
/// exist, and `kind` is whatever string the model produced. The graph
/// normalizer is responsible for turning a batch of these into something
/// structurally sound.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Step identifier as extracted (uniqueness not guaranteed)
    pub id: String,

    /// Human-readable step name
    pub name: String,

    /// What happens in this step
    pub description: String,

    /// Free-form step kind label (expected: task, event, gateway)
    pub kind: String,

    /// Ids of the steps that follow this one (may dangle)
    pub next: Vec<String>,

    /// Opaque key-value bag carried through from the extraction
    pub metadata: Map<String, Value>,
}

impl StepRecord {
    /// Create a record with explicit fields and empty metadata
    pub fn new(id: &str, name: &str, description: &str, kind: &str, next: Vec<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind: kind.to_string(),
            next: next.into_iter().map(String::from).collect(),
            metadata: Map::new(),
        }
    }

    /// Build a record from a raw JSON value, applying defaults for missing
    /// or mis-shaped fields.
    ///
    /// Returns `None` when the value is not an object at all; the caller
    /// decides whether that is worth a warning. `ordinal` is the 1-based
    /// position of the value in its source list, used for the fallback id.
    pub fn from_value(value: &Value, ordinal: usize) -> Option<Self> {
        let object = value.as_object()?;

        let id = object
            .get("step_id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("step_{}", ordinal));

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Unnamed Step")
            .to_string();

        let description = object
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let kind = object
            .get("step_type")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("task")
            .to_string();

        let next = object
            .get("next_steps")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let metadata = object
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Some(Self {
            id,
            name,
            description,
            kind,
            next,
            metadata,
        })
    }
}
