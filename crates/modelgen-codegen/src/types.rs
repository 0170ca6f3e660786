//! Rendering contexts.
//!
//! One context type per artifact. Contexts are plain data; they are turned
//! into JSON only when handed to the template renderer.

use crate::lists::ListEnum;
use crate::naming::assign_identifiers;
use crate::phases::PhaseGroup;
use crate::references::TypeExpression;
use serde::Serialize;

/// Context for `model/{X}EntityModel.java`.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::types::ModelContext;
///
/// let context = ModelContext {
///     package: "com.acme.octane".to_string(),
///     entity_name: "defect".to_string(),
///     class_name: "DefectEntityModel".to_string(),
///     interface_name: "DefectEntity".to_string(),
///     fields: vec![],
///     constructors: vec![],
/// };
///
/// assert_eq!(context.class_name, "DefectEntityModel");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ModelContext {
    /// Root package
    pub package: String,
    /// Server entity type name
    pub entity_name: String,
    /// Generated class name
    pub class_name: String,
    /// Implemented interface
    pub interface_name: String,
    /// Fields in name order
    pub fields: Vec<FieldContext>,
    /// One constructor per required-field combination
    pub constructors: Vec<ConstructorContext>,
}

/// One field of a model.
#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    /// Server field name
    pub name: String,
    /// Display label
    pub label: String,
    /// PascalCase accessor suffix
    pub accessor: String,
    /// Getter signature
    pub getter: AccessorContext,
    /// One setter overload per candidate type
    pub setters: Vec<AccessorContext>,
    /// Field is required on creation
    pub required: bool,
    /// Field can be sorted on
    pub sortable: bool,
}

/// Java type of an accessor and how the template converts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorContext {
    /// Java type
    pub java_type: String,
    /// Conversion kind
    pub kind: AccessorKind,
    /// SDK field model class for scalars
    pub field_model: Option<&'static str>,
    /// Enumeration held by a list collection
    pub element_type: Option<String>,
}

impl AccessorContext {
    /// Builds the accessor of one type expression.
    #[must_use]
    pub fn new(expression: &TypeExpression, package: &str) -> Self {
        let (kind, field_model) = match expression {
            TypeExpression::Scalar(java_type) => (AccessorKind::Scalar, Some(field_model(java_type))),
            TypeExpression::Model(_) => (AccessorKind::Model, None),
            TypeExpression::Generic => (AccessorKind::Generic, None),
            TypeExpression::ListEnum { multiple: false, .. } => (AccessorKind::List, None),
            TypeExpression::ListEnum { multiple: true, .. } => (AccessorKind::ListCollection, None),
            TypeExpression::Phase(_) => (AccessorKind::Phase, None),
            TypeExpression::Collection(_) => (AccessorKind::Collection, None),
        };
        let element_type = match expression {
            TypeExpression::ListEnum {
                identifier,
                multiple: true,
            } => Some(format!("{package}.enums.lists.{identifier}")),
            _ => None,
        };
        Self {
            java_type: expression.java_type(package),
            kind,
            field_model,
            element_type,
        }
    }
}

/// How an accessor moves values in and out of the wrapped entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    /// Scalar field model
    Scalar,
    /// Reference to a generated model
    Model,
    /// Reference to an untyped entity
    Generic,
    /// Single list value
    List,
    /// Several list values
    ListCollection,
    /// Workflow phase
    Phase,
    /// Several entity references
    Collection,
}

fn field_model(java_type: &str) -> &'static str {
    match java_type {
        "Long" => "LongFieldModel",
        "Float" => "FloatFieldModel",
        "Boolean" => "BooleanFieldModel",
        "java.time.ZonedDateTime" => "DateFieldModel",
        "Object" => "ObjectFieldModel",
        _ => "StringFieldModel",
    }
}

/// One generated constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorContext {
    /// Parameters in field name order
    pub parameters: Vec<ParameterContext>,
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterContext {
    /// lowerCamel parameter name
    pub member: String,
    /// Setter suffix
    pub accessor: String,
    /// Java type
    pub java_type: String,
}

/// Context for `model/{X}Entity.java`.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceContext {
    /// Root package
    pub package: String,
    /// Server entity type name
    pub entity_name: String,
    /// Generated interface name
    pub interface_name: String,
    /// Extended interface
    pub super_interface: String,
}

/// Context for `entities/{X}EntityList.java`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityListContext {
    /// Root package
    pub package: String,
    /// Server entity type name
    pub entity_name: String,
    /// Generated class name
    pub class_name: String,
    /// Model class returned by queries
    pub model_class: String,
    /// Collection URL relative to the workspace
    pub url: String,
    /// `GET` is allowed
    pub can_get: bool,
    /// `POST` is allowed
    pub can_create: bool,
    /// `PUT` is allowed
    pub can_update: bool,
    /// `DELETE` is allowed
    pub can_delete: bool,
    /// Every field, for field selection
    pub available_fields: Vec<FieldConstant>,
    /// Sortable fields
    pub sortable_fields: Vec<FieldConstant>,
}

/// Enum constant naming one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldConstant {
    /// Enum constant
    pub identifier: String,
    /// Server field name
    pub name: String,
}

impl FieldConstant {
    /// Builds collision-free constants for `names`.
    #[must_use]
    pub fn for_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Self> {
        let names: Vec<&str> = names.into_iter().collect();
        assign_identifiers(names.iter().map(|name| (*name, *name)), None)
            .into_iter()
            .zip(names)
            .map(|(identifier, name)| Self {
                identifier,
                name: name.to_string(),
            })
            .collect()
    }
}

/// Context for `enums/lists/{LIST}.java`.
#[derive(Debug, Clone, Serialize)]
pub struct ListContext {
    /// Root package
    pub package: String,
    /// Enumeration name
    pub identifier: String,
    /// Logical name of the root
    pub logical_name: Option<String>,
    /// Root first, then its values
    pub items: Vec<ListItemContext>,
}

/// One list constant.
#[derive(Debug, Clone, Serialize)]
pub struct ListItemContext {
    /// Enum constant
    pub identifier: String,
    /// Server id
    pub id: String,
    /// Display name
    pub name: String,
    /// Value is deprecated
    pub deprecated: bool,
}

impl ListContext {
    /// Builds the context of one list enumeration.
    #[must_use]
    pub fn new(package: &str, list: &ListEnum) -> Self {
        Self {
            package: package.to_string(),
            identifier: list.identifier.clone(),
            logical_name: list.logical_name.clone(),
            items: list
                .items
                .iter()
                .map(|item| ListItemContext {
                    identifier: item.identifier.clone(),
                    id: item.id.clone(),
                    name: item.name.clone(),
                    deprecated: item.is_deprecated(),
                })
                .collect(),
        }
    }
}

/// Context for `enums/Phases.java`.
#[derive(Debug, Clone, Serialize)]
pub struct PhasesContext {
    /// Root package
    pub package: String,
    /// One enumeration per owning entity type
    pub groups: Vec<PhaseGroupContext>,
}

/// Phase enumeration of one entity type.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGroupContext {
    /// Enumeration name
    pub enum_name: String,
    /// Owning entity type
    pub entity: String,
    /// Phases sorted by display name
    pub phases: Vec<PhaseItemContext>,
}

/// One phase constant.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseItemContext {
    /// Enum constant
    pub identifier: String,
    /// Server id
    pub id: String,
    /// Display name
    pub name: String,
}

impl PhasesContext {
    /// Builds the context of the `Phases` class.
    #[must_use]
    pub fn new(package: &str, groups: &[PhaseGroup]) -> Self {
        Self {
            package: package.to_string(),
            groups: groups
                .iter()
                .map(|group| PhaseGroupContext {
                    enum_name: group.enum_name(),
                    entity: group.entity.clone(),
                    phases: group
                        .phases
                        .iter()
                        .map(|phase| PhaseItemContext {
                            identifier: phase.identifier.clone(),
                            id: phase.id.clone(),
                            name: phase.name.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
