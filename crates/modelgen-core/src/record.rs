//! Entity records returned by collection queries.
//!
//! Records are loosely typed JSON objects; accessors convert them into
//! the typed [`ListNode`] and [`PhaseRecord`] values the generator uses.

use crate::{ActivityLevel, Error, ListNode, PhaseRecord, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of an entity collection.
///
/// # Examples
///
/// ```
/// use modelgen_core::EntityRecord;
/// use serde_json::json;
///
/// let record = EntityRecord::from_value(json!({
///     "type": "phase",
///     "id": "phase.defect.new",
///     "name": "New",
///     "entity": "defect"
/// })).unwrap();
///
/// let phase = record.to_phase().unwrap();
/// assert_eq!(phase.entity, "defect");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Map<String, Value>);

impl EntityRecord {
    /// Wraps a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::SerializationError {
                message: format!("expected entity object, got {other}"),
                source: None,
            }),
        }
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the record's entity type, if the server sent one.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        self.get("type").and_then(Value::as_str).unwrap_or("entity")
    }

    /// Returns a string field, `None` when absent or null.
    #[must_use]
    pub fn opt_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns a mandatory string field.
    ///
    /// Numeric ids are accepted as well, since some collections send them
    /// unquoted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] when the field is missing.
    pub fn string(&self, field: &str) -> Result<String> {
        match self.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(self.missing(field, "string")),
        }
    }

    /// Returns a mandatory integer field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] when the field is missing.
    pub fn integer(&self, field: &str) -> Result<i64> {
        self.get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.missing(field, "integer"))
    }

    /// Returns the id of a single-valued reference field.
    #[must_use]
    pub fn reference_id(&self, field: &str) -> Option<String> {
        match self.get(field)?.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Converts the record into a list node.
    ///
    /// # Errors
    ///
    /// Returns an error if `id`, `name` or `activity_level` is missing or the
    /// activity level is unknown.
    pub fn to_list_node(&self) -> Result<ListNode> {
        let level = self.integer("activity_level")?;
        let activity_level =
            ActivityLevel::from_level(level).ok_or_else(|| Error::InvalidMetadata {
                entity: self.entity_type().to_string(),
                field: "activity_level".to_string(),
                reason: format!("unknown activity level {level}"),
            })?;

        Ok(ListNode {
            id: self.string("id")?,
            name: self.string("name")?,
            logical_name: self.opt_str("logical_name").map(str::to_string),
            activity_level,
            list_root: self.reference_id("list_root"),
        })
    }

    /// Converts the record into a phase.
    ///
    /// # Errors
    ///
    /// Returns an error if `id`, `name` or `entity` is missing.
    pub fn to_phase(&self) -> Result<PhaseRecord> {
        Ok(PhaseRecord {
            id: self.string("id")?,
            name: self.string("name")?,
            entity: self.string("entity")?,
        })
    }

    fn missing(&self, field: &str, kind: &str) -> Error {
        Error::InvalidMetadata {
            entity: self.entity_type().to_string(),
            field: field.to_string(),
            reason: format!("missing {kind} value"),
        }
    }
}

impl From<Map<String, Value>> for EntityRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
