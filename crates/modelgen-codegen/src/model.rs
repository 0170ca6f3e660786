//! Assembly of the per-entity rendering contexts.

use crate::catalog::EntityCatalog;
use crate::combinator::RequiredFields;
use crate::naming::{to_member_identifier, to_type_identifier};
use crate::references::{ReferenceResolver, TypeExpression};
use crate::types::{
    AccessorContext, AccessorKind, ConstructorContext, EntityListContext, FieldConstant,
    FieldContext, InterfaceContext, ModelContext, ParameterContext,
};
use modelgen_core::{EntityTypeDescriptor, FieldDescriptor, Result};
use std::collections::HashSet;
use tracing::debug;

/// Parameter type of the wrapping constructor every model has.
const WRAPPED_MODEL: &str = "EntityModel";

/// Builds the model class context of `entity`.
///
/// Fields are emitted in name order. Every required field contributes its
/// candidate types to the constructor overloads.
///
/// # Errors
///
/// Returns an error if a field cannot be resolved or a required field has no
/// candidate types.
pub fn model_context(
    package: &str,
    entity: &EntityTypeDescriptor,
    resolver: &ReferenceResolver<'_>,
) -> Result<ModelContext> {
    let owner = entity.name.as_str();
    let type_name = to_type_identifier(owner);

    let mut fields: Vec<&FieldDescriptor> = entity.fields.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let mut required = RequiredFields::new();
    let mut contexts = Vec::with_capacity(fields.len());

    for field in fields {
        let candidates = resolver.candidates(owner, field)?;
        let setters = if field.editable || field.required {
            candidates
                .iter()
                .map(|candidate| AccessorContext::new(candidate, package))
                .collect()
        } else {
            Vec::new()
        };

        contexts.push(FieldContext {
            name: field.name.clone(),
            label: doc_text(if field.label.is_empty() {
                &field.name
            } else {
                &field.label
            }),
            accessor: to_type_identifier(&field.name),
            getter: getter(&candidates, package),
            setters,
            required: field.required,
            sortable: field.sortable,
        });

        if field.required {
            required.insert(field.name.clone(), candidates);
        }
    }

    let constructors = constructors(owner, package, &required)?;

    Ok(ModelContext {
        package: package.to_string(),
        entity_name: owner.to_string(),
        class_name: format!("{type_name}EntityModel"),
        interface_name: format!("{type_name}Entity"),
        fields: contexts,
        constructors,
    })
}

/// Builds the interface context of `entity`.
///
/// The interface extends its supertype's interface when the supertype is
/// generated, and the SDK `Entity` interface otherwise.
#[must_use]
pub fn interface_context(
    package: &str,
    entity: &EntityTypeDescriptor,
    catalog: &EntityCatalog,
) -> InterfaceContext {
    let owner = entity.name.as_str();
    let super_interface = entity
        .supertype()
        .filter(|parent| catalog.is_generated(parent))
        .map_or_else(
            || "Entity".to_string(),
            |parent| format!("{}Entity", to_type_identifier(parent)),
        );

    InterfaceContext {
        package: package.to_string(),
        entity_name: owner.to_string(),
        interface_name: format!("{}Entity", to_type_identifier(owner)),
        super_interface,
    }
}

/// Builds the entity list context, or `None` if `entity` is not exposed over
/// REST.
#[must_use]
pub fn entity_list_context(package: &str, entity: &EntityTypeDescriptor) -> Option<EntityListContext> {
    let (url, methods) = entity.rest_feature()?;
    let allows = |method: &str| methods.iter().any(|m| m.eq_ignore_ascii_case(method));

    let mut fields: Vec<&FieldDescriptor> = entity.fields.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let owner = entity.name.as_str();
    let type_name = to_type_identifier(owner);

    Some(EntityListContext {
        package: package.to_string(),
        entity_name: owner.to_string(),
        class_name: format!("{type_name}EntityList"),
        model_class: format!("{type_name}EntityModel"),
        url: url.to_string(),
        can_get: allows("GET"),
        can_create: allows("POST"),
        can_update: allows("PUT"),
        can_delete: allows("DELETE"),
        available_fields: FieldConstant::for_names(fields.iter().map(|f| f.name.as_str())),
        sortable_fields: FieldConstant::for_names(
            fields
                .iter()
                .filter(|f| f.sortable)
                .map(|f| f.name.as_str()),
        ),
    })
}

/// Builds one constructor per required-field combination.
///
/// A combination whose erased Java signature matches the wrapping
/// `(EntityModel)` constructor or an earlier overload is dropped.
fn constructors(
    owner: &str,
    package: &str,
    required: &RequiredFields,
) -> Result<Vec<ConstructorContext>> {
    let mut signatures: HashSet<Vec<String>> = HashSet::from([vec![WRAPPED_MODEL.to_string()]]);
    let mut constructors = Vec::new();

    for combination in required.combinations(owner)? {
        let parameters: Vec<ParameterContext> = combination
            .values()
            .iter()
            .map(|value| ParameterContext {
                member: to_member_identifier(&value.field),
                accessor: to_type_identifier(&value.field),
                java_type: value.type_expression.java_type(package),
            })
            .collect();

        let signature = parameters.iter().map(|p| erasure(&p.java_type)).collect();
        if signatures.insert(signature) {
            constructors.push(ConstructorContext { parameters });
        } else {
            debug!("Skipping constructor of {owner} clashing with an existing signature");
        }
    }
    Ok(constructors)
}

fn erasure(java_type: &str) -> String {
    java_type
        .split_once('<')
        .map_or(java_type, |(raw, _)| raw)
        .to_string()
}

fn getter(candidates: &[TypeExpression], package: &str) -> AccessorContext {
    match candidates {
        [TypeExpression::Collection(_)] => AccessorContext {
            java_type: "java.util.Collection<EntityModel>".to_string(),
            kind: AccessorKind::Collection,
            field_model: None,
            element_type: None,
        },
        [only] => AccessorContext::new(only, package),
        _ => AccessorContext::new(&TypeExpression::Generic, package),
    }
}

fn doc_text(raw: &str) -> String {
    raw.replace("*/", "* /")
}
