//! Reference field resolution.
//!
//! Decides which Java types a field accepts. Scalars map directly; reference
//! fields resolve to a phase enumeration, a list enumeration, a collection
//! signature, a set of concrete models or the generic handle.

use crate::catalog::EntityCatalog;
use crate::naming::{java_type, to_type_identifier};
use modelgen_core::{Error, FieldDescriptor, LIST_NODE, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Field that carries the workflow phase of an entity.
pub const PHASE_FIELD: &str = "phase";

/// A Java type accepted by a generated accessor or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpression {
    /// Scalar Java type such as `String` or `Long`
    Scalar(&'static str),
    /// Generated model of a concrete entity type
    Model(String),
    /// Untyped entity handle
    Generic,
    /// Generated list enumeration
    ListEnum {
        /// Enumeration identifier
        identifier: String,
        /// Field holds several list values
        multiple: bool,
    },
    /// Phase enumeration of an entity type, keyed by its type identifier
    Phase(String),
    /// Multi-valued reference, bounded by a generated interface when known
    Collection(Option<String>),
}

impl TypeExpression {
    /// Renders the Java spelling of this type for models in `package`.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_codegen::TypeExpression;
    ///
    /// let model = TypeExpression::Model("work_item_root".to_string());
    /// assert_eq!(model.java_type("com.acme"), "WorkItemRootEntityModel");
    ///
    /// let phase = TypeExpression::Phase("Defect".to_string());
    /// assert_eq!(phase.java_type("com.acme"), "com.acme.enums.Phases.DefectPhase");
    /// ```
    #[must_use]
    pub fn java_type(&self, package: &str) -> String {
        match self {
            Self::Scalar(name) => (*name).to_string(),
            Self::Model(entity) => format!("{}EntityModel", to_type_identifier(entity)),
            Self::Generic => "EntityModel".to_string(),
            Self::ListEnum {
                identifier,
                multiple: false,
            } => format!("{package}.enums.lists.{identifier}"),
            Self::ListEnum {
                identifier,
                multiple: true,
            } => format!("java.util.Collection<{package}.enums.lists.{identifier}>"),
            Self::Phase(key) => format!("{package}.enums.Phases.{key}Phase"),
            Self::Collection(Some(entity)) => format!(
                "java.util.Collection<? extends {}Entity>",
                to_type_identifier(entity)
            ),
            Self::Collection(None) => "java.util.Collection<? extends Entity>".to_string(),
        }
    }
}

/// Outcome of resolving one reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceResolution {
    /// Phase enumeration of the owning type
    Phase(String),
    /// List enumeration found through the target's logical name
    List {
        /// Enumeration identifier
        identifier: String,
        /// Field holds several list values
        multiple: bool,
    },
    /// Multi-valued reference
    Collection(Option<String>),
    /// Concrete generated targets
    Typed {
        /// Entity type names in first-seen order
        types: Vec<String>,
        /// Some targets could not be typed and need the generic handle
        generic_fallback: bool,
    },
    /// No concrete target is generated
    Untyped,
}

impl ReferenceResolution {
    /// Type expressions a setter or constructor accepts for this field.
    #[must_use]
    pub fn type_expressions(&self) -> Vec<TypeExpression> {
        match self {
            Self::Phase(key) => vec![TypeExpression::Phase(key.clone())],
            Self::List {
                identifier,
                multiple,
            } => vec![TypeExpression::ListEnum {
                identifier: identifier.clone(),
                multiple: *multiple,
            }],
            Self::Collection(base) => vec![TypeExpression::Collection(base.clone())],
            Self::Typed {
                types,
                generic_fallback,
            } => {
                let mut expressions: Vec<TypeExpression> =
                    types.iter().cloned().map(TypeExpression::Model).collect();
                if *generic_fallback {
                    expressions.push(TypeExpression::Generic);
                }
                expressions
            }
            Self::Untyped => vec![TypeExpression::Generic],
        }
    }
}

/// Resolves fields against the entity catalog and the enumeration tables.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    catalog: &'a EntityCatalog,
    lists: &'a BTreeMap<String, String>,
    phases: &'a BTreeSet<String>,
}

impl<'a> ReferenceResolver<'a> {
    /// Creates a resolver.
    ///
    /// `lists` maps list logical names to enumeration identifiers and
    /// `phases` holds the keys of the registered phase enumerations.
    #[must_use]
    pub const fn new(
        catalog: &'a EntityCatalog,
        lists: &'a BTreeMap<String, String>,
        phases: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            catalog,
            lists,
            phases,
        }
    }

    /// Returns the candidate types of any field of `owner`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::resolve`].
    pub fn candidates(&self, owner: &str, field: &FieldDescriptor) -> Result<Vec<TypeExpression>> {
        if field.is_reference() || self.owns_phase_field(owner, field) {
            Ok(self.resolve(owner, field)?.type_expressions())
        } else {
            Ok(vec![TypeExpression::Scalar(java_type(field.field_type))])
        }
    }

    /// Resolves a reference field of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] if the field declares no targets or
    /// its list target lacks a logical name, and [`Error::UnknownList`] if the
    /// logical name has no enumeration.
    pub fn resolve(&self, owner: &str, field: &FieldDescriptor) -> Result<ReferenceResolution> {
        if self.owns_phase_field(owner, field) {
            return Ok(ReferenceResolution::Phase(to_type_identifier(owner)));
        }

        let targets = field.targets();
        let Some(first) = targets.first() else {
            return Err(invalid(owner, field, "reference field declares no targets"));
        };

        if first.entity_type == LIST_NODE && owner != LIST_NODE {
            let logical_name = first
                .logical_name
                .as_deref()
                .ok_or_else(|| invalid(owner, field, "list reference has no logical name"))?;
            let identifier = self.lists.get(logical_name).ok_or_else(|| Error::UnknownList {
                entity: owner.to_string(),
                field: field.name.clone(),
                logical_name: logical_name.to_string(),
            })?;
            return Ok(ReferenceResolution::List {
                identifier: identifier.clone(),
                multiple: field.is_multiple(),
            });
        }

        if field.is_multiple() {
            let base = match targets {
                [only] if self.catalog.is_generated(&only.entity_type) => {
                    Some(only.entity_type.clone())
                }
                _ => None,
            };
            return Ok(ReferenceResolution::Collection(base));
        }

        let mut concrete: Vec<String> = Vec::new();
        for target in targets {
            for leaf in self.catalog.leaf_subtypes(&target.entity_type) {
                if !concrete.contains(&leaf) {
                    concrete.push(leaf);
                }
            }
        }

        let (types, untypable): (Vec<String>, Vec<String>) = concrete
            .into_iter()
            .partition(|entity| self.catalog.is_generated(entity));

        if types.is_empty() {
            Ok(ReferenceResolution::Untyped)
        } else {
            Ok(ReferenceResolution::Typed {
                types,
                generic_fallback: !untypable.is_empty(),
            })
        }
    }

    fn owns_phase_field(&self, owner: &str, field: &FieldDescriptor) -> bool {
        field.name == PHASE_FIELD && self.phases.contains(&to_type_identifier(owner))
    }
}

fn invalid(owner: &str, field: &FieldDescriptor, reason: &str) -> Error {
    Error::InvalidMetadata {
        entity: owner.to_string(),
        field: field.name.clone(),
        reason: reason.to_string(),
    }
}
