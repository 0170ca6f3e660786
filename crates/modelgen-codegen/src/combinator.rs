//! Required-field constructor overloads.
//!
//! Each required field contributes a set of candidate types. Every member of
//! the Cartesian product of those sets becomes one generated constructor, so
//! callers can only build an entity when all mandatory values are present.

use crate::references::TypeExpression;
use modelgen_core::{Error, Result};
use std::collections::BTreeMap;

/// Upper bound on the constructor overloads of one entity type.
pub const MAX_COMBINATIONS: usize = 4096;

/// One required field bound to one candidate type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredFieldValue {
    /// Field name
    pub field: String,
    /// Chosen candidate
    pub type_expression: TypeExpression,
}

/// One member of the Cartesian product, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredFieldCombination {
    values: Vec<RequiredFieldValue>,
}

impl RequiredFieldCombination {
    /// The field bindings in field name order.
    #[must_use]
    pub fn values(&self) -> &[RequiredFieldValue] {
        &self.values
    }

    /// Returns the type chosen for `field`.
    #[must_use]
    pub fn type_of(&self, field: &str) -> Option<&TypeExpression> {
        self.values
            .iter()
            .find(|value| value.field == field)
            .map(|value| &value.type_expression)
    }
}

/// Candidate types of the required fields of one entity type.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::{RequiredFields, TypeExpression};
///
/// let mut required = RequiredFields::new();
/// required.insert("name", vec![TypeExpression::Scalar("String")]);
/// required.insert(
///     "parent",
///     vec![
///         TypeExpression::Model("story".to_string()),
///         TypeExpression::Model("feature".to_string()),
///     ],
/// );
///
/// let combinations = required.combinations("defect").unwrap();
/// assert_eq!(combinations.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFields {
    fields: BTreeMap<String, Vec<TypeExpression>>,
}

impl RequiredFields {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a required field. Duplicate candidates are collapsed.
    pub fn insert(&mut self, field: impl Into<String>, candidates: Vec<TypeExpression>) {
        let mut unique: Vec<TypeExpression> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        self.fields.insert(field.into(), unique);
    }

    /// Number of required fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Expands the Cartesian product of all candidate sets.
    ///
    /// The last field varies fastest. No required fields yields no
    /// combinations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] naming `entity` if a required field
    /// has no candidates, or if the product exceeds [`MAX_COMBINATIONS`].
    pub fn combinations(&self, entity: &str) -> Result<Vec<RequiredFieldCombination>> {
        let columns: Vec<(&String, &Vec<TypeExpression>)> = self.fields.iter().collect();
        if let Some((field, _)) = columns.iter().find(|(_, candidates)| candidates.is_empty()) {
            return Err(Error::InvalidMetadata {
                entity: entity.to_string(),
                field: (*field).clone(),
                reason: "required field has no candidate types".to_string(),
            });
        }
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut total = 1_usize;
        for (field, candidates) in &columns {
            total = total
                .checked_mul(candidates.len())
                .filter(|product| *product <= MAX_COMBINATIONS)
                .ok_or_else(|| Error::InvalidMetadata {
                    entity: entity.to_string(),
                    field: (*field).clone(),
                    reason: "too many constructor overloads".to_string(),
                })?;
        }
        let mut combinations = Vec::with_capacity(total);
        let mut odometer = vec![0_usize; columns.len()];

        loop {
            combinations.push(RequiredFieldCombination {
                values: columns
                    .iter()
                    .zip(&odometer)
                    .map(|((field, candidates), &index)| RequiredFieldValue {
                        field: (*field).clone(),
                        type_expression: candidates[index].clone(),
                    })
                    .collect(),
            });

            let mut position = columns.len();
            loop {
                if position == 0 {
                    return Ok(combinations);
                }
                position -= 1;
                odometer[position] += 1;
                if odometer[position] < columns[position].1.len() {
                    break;
                }
                odometer[position] = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn models(names: &[&str]) -> Vec<TypeExpression> {
        names
            .iter()
            .map(|name| TypeExpression::Model((*name).to_string()))
            .collect()
    }

    #[test]
    fn test_two_by_three_gives_six() {
        let mut required = RequiredFields::new();
        required.insert("a", models(&["x", "y"]));
        required.insert("b", models(&["p", "q", "r"]));

        let combinations = required.combinations("defect").unwrap();
        assert_eq!(combinations.len(), 6);
        let distinct: HashSet<_> = combinations.iter().collect();
        assert_eq!(distinct.len(), 6);

        for combination in &combinations {
            let fields: Vec<&str> = combination.values().iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, ["a", "b"]);
        }
    }

    #[test]
    fn test_overload_explosion_fails() {
        let mut required = RequiredFields::new();
        for i in 0..70 {
            required.insert(format!("field_{i:02}"), models(&["x", "y"]));
        }

        let err = required.combinations("defect").unwrap_err();
        assert!(err.is_metadata_error());
        assert!(err.to_string().contains("too many constructor overloads"));
    }

    #[test]
    fn test_product_at_limit_succeeds() {
        let mut required = RequiredFields::new();
        for i in 0..12 {
            required.insert(format!("field_{i:02}"), models(&["x", "y"]));
        }

        let combinations = required.combinations("defect").unwrap();
        assert_eq!(combinations.len(), MAX_COMBINATIONS);
    }

    #[test]
    fn test_iteration_order() {
        let mut required = RequiredFields::new();
        required.insert("b", models(&["p", "q"]));
        required.insert("a", models(&["x", "y"]));

        let combinations = required.combinations("defect").unwrap();
        let pairs: Vec<(String, String)> = combinations
            .iter()
            .map(|c| {
                let name = |field| match c.type_of(field) {
                    Some(TypeExpression::Model(name)) => name.clone(),
                    other => panic!("unexpected {other:?}"),
                };
                (name("a"), name("b"))
            })
            .collect();
        assert_eq!(
            pairs,
            [
                ("x".to_string(), "p".to_string()),
                ("x".to_string(), "q".to_string()),
                ("y".to_string(), "p".to_string()),
                ("y".to_string(), "q".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_required_fields() {
        let required = RequiredFields::new();
        assert!(required.is_empty());
        assert!(required.combinations("defect").unwrap().is_empty());
    }

    #[test]
    fn test_zero_candidates_fails() {
        let mut required = RequiredFields::new();
        required.insert("a", models(&["x"]));
        required.insert("owner", Vec::new());

        let err = required.combinations("defect").unwrap_err();
        assert!(err.is_metadata_error());
        assert!(err.to_string().contains("defect.owner"));
    }

    #[test]
    fn test_duplicate_candidates_collapse() {
        let mut required = RequiredFields::new();
        required.insert("a", models(&["x", "x", "y"]));
        assert_eq!(required.combinations("defect").unwrap().len(), 2);
    }

    #[test]
    fn test_single_field() {
        let mut required = RequiredFields::new();
        required.insert("name", vec![TypeExpression::Scalar("String")]);
        let combinations = required.combinations("defect").unwrap();
        assert_eq!(combinations.len(), 1);
        assert_eq!(
            combinations[0].type_of("name"),
            Some(&TypeExpression::Scalar("String"))
        );
        assert_eq!(required.len(), 1);
    }
}
