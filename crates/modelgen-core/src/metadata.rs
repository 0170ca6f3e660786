//! Metadata descriptors returned by the Octane metadata API.
//!
//! The shapes mirror the JSON payloads of `metadata/entities` and
//! `metadata/fields`, so they deserialize directly from server responses.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::{EntityTypeDescriptor, Feature};
//!
//! let json = r#"{
//!     "name": "defect",
//!     "label": "Defect",
//!     "features": [
//!         {"name": "rest", "url": "defects", "methods": ["GET", "POST"]},
//!         {"name": "subtype_of", "type": "work_item"}
//!     ]
//! }"#;
//!
//! let entity: EntityTypeDescriptor = serde_json::from_str(json).unwrap();
//! assert_eq!(entity.supertype(), Some("work_item"));
//! assert!(entity.rest_feature().is_some());
//! ```

use crate::{ActivityLevel, EntityName, LIST_NODE};
use serde::{Deserialize, Serialize};

/// Schema of one server-side entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDescriptor {
    /// Unique entity type name
    pub name: EntityName,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Capabilities of the type
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Field descriptors, filled in after `metadata/fields` was queried
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
}

impl EntityTypeDescriptor {
    /// Creates a descriptor without features or fields.
    #[must_use]
    pub fn new(name: impl Into<EntityName>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            features: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a feature.
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Replaces the field descriptors.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the REST exposure of this type, if any.
    #[must_use]
    pub fn rest_feature(&self) -> Option<(&str, &[String])> {
        self.features.iter().find_map(|feature| match feature {
            Feature::Rest { url, methods } => Some((url.as_str(), methods.as_slice())),
            _ => None,
        })
    }

    /// Returns the direct supertype named by the `subtype_of` feature.
    #[must_use]
    pub fn supertype(&self) -> Option<&str> {
        self.features.iter().find_map(|feature| match feature {
            Feature::SubtypeOf { parent } => Some(parent.as_str()),
            _ => None,
        })
    }

    /// Returns the registered direct subtypes.
    #[must_use]
    pub fn subtypes(&self) -> &[String] {
        self.features
            .iter()
            .find_map(|feature| match feature {
                Feature::Subtypes { types } => Some(types.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

/// Capability flag attached to an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Feature {
    /// Entity type is exposed as a REST collection
    Rest {
        /// Collection path relative to the workspace
        url: String,
        /// Allowed HTTP methods
        #[serde(default)]
        methods: Vec<String>,
    },
    /// Entity type is a subtype of another type
    SubtypeOf {
        /// Supertype name
        #[serde(rename = "type")]
        parent: String,
    },
    /// Entity type is abstract over a set of subtypes
    Subtypes {
        /// Direct subtype names
        #[serde(default)]
        types: Vec<String>,
    },
    /// Any feature the generator does not interpret
    #[serde(other)]
    Other,
}

/// Server field type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Short text
    String,
    /// Long text
    Memo,
    /// Integer number
    Integer,
    /// Floating point number
    Float,
    /// Boolean flag
    Boolean,
    /// Calendar date
    Date,
    /// Timestamp
    DateTime,
    /// Reference to other entities
    Reference,
    /// Structured value
    Object,
    /// Any type tag the generator does not know
    #[serde(other)]
    Unknown,
}

/// Description of one field of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Type tag
    pub field_type: FieldType,
    /// Must be set on creation
    #[serde(default)]
    pub required: bool,
    /// Can be used for ordering
    #[serde(default)]
    pub sortable: bool,
    /// Can be changed after creation
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Reference details, present for reference fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type_data: Option<FieldTypeData>,
}

fn default_editable() -> bool {
    true
}

impl FieldDescriptor {
    /// Creates a non-reference field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            field_type,
            required: false,
            sortable: false,
            editable: true,
            field_type_data: None,
        }
    }

    /// Creates a reference field with the given targets.
    #[must_use]
    pub fn reference(
        name: impl Into<String>,
        multiple: bool,
        targets: Vec<ReferenceTarget>,
    ) -> Self {
        Self {
            field_type_data: Some(FieldTypeData { multiple, targets }),
            ..Self::new(name, FieldType::Reference)
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as sortable.
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Returns `true` for reference fields.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.field_type == FieldType::Reference
    }

    /// Returns `true` if this reference holds multiple values.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.field_type_data.as_ref().is_some_and(|data| data.multiple)
    }

    /// Returns the declared reference targets.
    #[must_use]
    pub fn targets(&self) -> &[ReferenceTarget] {
        self.field_type_data
            .as_ref()
            .map_or(&[], |data| data.targets.as_slice())
    }

    /// Returns the list target if the first target is a list node.
    #[must_use]
    pub fn list_target(&self) -> Option<&ReferenceTarget> {
        self.targets()
            .first()
            .filter(|target| target.entity_type == LIST_NODE)
    }
}

/// Reference details of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypeData {
    /// Field holds a collection of references
    #[serde(default)]
    pub multiple: bool,
    /// Allowed target types
    #[serde(default)]
    pub targets: Vec<ReferenceTarget>,
}

/// One allowed target of a reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTarget {
    /// Target entity type
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Logical name of the list root for list node targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_name: Option<String>,
}

impl ReferenceTarget {
    /// Creates an entity target.
    #[must_use]
    pub fn entity(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            logical_name: None,
        }
    }

    /// Creates a list node target keyed by the list's logical name.
    #[must_use]
    pub fn list(logical_name: impl Into<String>) -> Self {
        Self {
            entity_type: LIST_NODE.to_string(),
            logical_name: Some(logical_name.into()),
        }
    }
}

/// A list root or list value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNode {
    /// Node id
    pub id: String,
    /// Raw display name
    pub name: String,
    /// Logical name, set on roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_name: Option<String>,
    /// Lifecycle state
    pub activity_level: ActivityLevel,
    /// Owning root id, absent for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_root: Option<String>,
}

impl ListNode {
    /// Creates a list root.
    #[must_use]
    pub fn root(id: impl Into<String>, name: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logical_name: Some(logical_name.into()),
            activity_level: ActivityLevel::Active,
            list_root: None,
        }
    }

    /// Creates a list value under `root_id`.
    #[must_use]
    pub fn child(
        id: impl Into<String>,
        name: impl Into<String>,
        root_id: impl Into<String>,
        activity_level: ActivityLevel,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logical_name: None,
            activity_level,
            list_root: Some(root_id.into()),
        }
    }
}

/// A workflow phase of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    /// Phase id
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning entity type
    pub entity: String,
}

impl PhaseRecord {
    /// Creates a phase record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity: entity.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_entity_with_unknown_features() {
        let json = r#"{
            "type": "entity_metadata",
            "name": "work_item",
            "label": "Work Item",
            "can_modify_label": false,
            "features": [
                {"name": "subtypes", "types": ["defect", "story"]},
                {"name": "business_rules"},
                {"name": "attachments", "url": "attachments"}
            ]
        }"#;

        let entity: EntityTypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(entity.name.as_str(), "work_item");
        assert_eq!(entity.subtypes(), ["defect", "story"]);
        assert_eq!(entity.features[1], Feature::Other);
        assert!(entity.rest_feature().is_none());
        assert!(entity.supertype().is_none());
    }

    #[test]
    fn test_field_without_editable_flag_is_editable() {
        let json = r#"{"name": "description", "field_type": "memo"}"#;

        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(field.editable);
        assert_eq!(field, FieldDescriptor::new("description", FieldType::Memo));

        let json = r#"{"name": "id", "field_type": "string", "editable": false}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(!field.editable);
    }

    #[test]
    fn test_deserialize_reference_field() {
        let json = r#"{
            "type": "field_metadata",
            "name": "severity",
            "entity_name": "defect",
            "label": "Severity",
            "field_type": "reference",
            "required": true,
            "sortable": true,
            "editable": true,
            "field_type_data": {
                "multiple": false,
                "targets": [{"type": "list_node", "logical_name": "list_node.severity"}]
            }
        }"#;

        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(field.is_reference());
        assert!(field.required);
        assert!(!field.is_multiple());
        assert_eq!(
            field.list_target().and_then(|t| t.logical_name.as_deref()),
            Some("list_node.severity")
        );
    }

    #[test]
    fn test_unknown_field_type_is_tolerated() {
        let json = r#"{"name": "blob", "field_type": "binary_stream"}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Unknown);
        assert!(field.targets().is_empty());
    }

    #[test]
    fn test_list_target_requires_first_target_to_be_list_node() {
        let field = FieldDescriptor::reference(
            "owner",
            false,
            vec![ReferenceTarget::entity("workspace_user"), ReferenceTarget::list("x")],
        );
        assert!(field.list_target().is_none());
    }
}
