//! Entity type index.
//!
//! The catalog answers three questions for the generator: does a type exist,
//! which concrete types sit below it, and is it emitted at all.

use modelgen_core::EntityTypeDescriptor;
use std::collections::{BTreeMap, BTreeSet};

/// Entity types that never get model files.
const EXCLUDED_ENTITIES: &[&str] = &["run_history", "history_log", "audit", "ci_parameter"];

/// Name prefixes that never get model files.
const EXCLUDED_PREFIXES: &[&str] = &["field_metadata", "log"];

/// Returns `true` if `entity` is excluded from generation.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::is_excluded;
///
/// assert!(is_excluded("audit"));
/// assert!(is_excluded("log_entry"));
/// assert!(!is_excluded("defect"));
/// ```
#[must_use]
pub fn is_excluded(entity: &str) -> bool {
    EXCLUDED_ENTITIES.contains(&entity)
        || EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| entity.starts_with(prefix))
}

/// All entity types of a workspace, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: BTreeMap<String, EntityTypeDescriptor>,
    subtypes: BTreeMap<String, Vec<String>>,
}

impl EntityCatalog {
    /// Indexes `entities`.
    ///
    /// Subtype edges come from both the `subtypes` feature of a supertype and
    /// the `subtype_of` feature of a subtype. A later descriptor with the same
    /// name replaces an earlier one.
    #[must_use]
    pub fn new(entities: impl IntoIterator<Item = EntityTypeDescriptor>) -> Self {
        let entities: BTreeMap<String, EntityTypeDescriptor> = entities
            .into_iter()
            .map(|entity| (entity.name.as_str().to_string(), entity))
            .collect();

        let mut subtypes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, entity) in &entities {
            for child in entity.subtypes() {
                push_unique(subtypes.entry(name.clone()).or_default(), child);
            }
        }
        for (name, entity) in &entities {
            if let Some(parent) = entity.supertype() {
                push_unique(subtypes.entry(parent.to_string()).or_default(), name);
            }
        }

        Self { entities, subtypes }
    }

    /// Returns the descriptor of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntityTypeDescriptor> {
        self.entities.get(name)
    }

    /// Returns `true` if `name` is a known entity type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Returns `true` if a model is emitted for `name`.
    #[must_use]
    pub fn is_generated(&self, name: &str) -> bool {
        self.contains(name) && !is_excluded(name)
    }

    /// Returns the direct subtypes of `name`.
    #[must_use]
    pub fn subtypes(&self, name: &str) -> &[String] {
        self.subtypes.get(name).map_or(&[], Vec::as_slice)
    }

    /// Expands `name` to its concrete leaf subtypes.
    ///
    /// A type without subtypes expands to itself. Cycles in the subtype
    /// graph are cut at the first revisit.
    #[must_use]
    pub fn leaf_subtypes(&self, name: &str) -> Vec<String> {
        let mut leaves = Vec::new();
        let mut visited = BTreeSet::new();
        let mut stack = vec![name.to_string()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let children = self.subtypes(&current);
            if children.is_empty() {
                leaves.push(current);
            } else {
                stack.extend(children.iter().rev().cloned());
            }
        }
        leaves
    }

    /// Iterates over all entity types in name order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityTypeDescriptor> {
        self.entities.values()
    }

    /// Number of entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
