//! Phase enumeration builder.

use crate::naming::{assign_identifiers, to_type_identifier};
use modelgen_core::traits::MetadataClient;
use modelgen_core::{EntityRecord, PhaseRecord, Query, QueryRequest, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Collection holding workflow phases.
pub const PHASE_COLLECTION: &str = "phases";

const PHASE_FIELDS: &[&str] = &["id", "name", "entity"];

/// One constant of a phase enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEntry {
    /// Enum constant
    pub identifier: String,
    /// Server id
    pub id: String,
    /// Display name
    pub name: String,
}

/// Phases of one owning entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseGroup {
    /// Type identifier of the owning entity
    pub key: String,
    /// Owning entity type as reported by the server
    pub entity: String,
    /// Phases sorted by display name
    pub phases: Vec<PhaseEntry>,
}

impl PhaseGroup {
    /// Name of the generated enumeration.
    #[must_use]
    pub fn enum_name(&self) -> String {
        format!("{}Phase", self.key)
    }
}

/// Phase records grouped by owning entity type.
///
/// Groups only ever grow: merging a batch appends to existing groups.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::PhaseCatalog;
/// use modelgen_core::PhaseRecord;
///
/// let catalog = PhaseCatalog::default()
///     .merge([PhaseRecord::new("1", "New", "defect")])
///     .merge([PhaseRecord::new("2", "Closed", "defect")]);
///
/// let groups = catalog.groups();
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].phases[0].identifier, "CLOSED");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseCatalog {
    records: BTreeMap<String, Vec<PhaseRecord>>,
}

impl PhaseCatalog {
    /// Adds a batch of phase records.
    #[must_use]
    pub fn merge(mut self, batch: impl IntoIterator<Item = PhaseRecord>) -> Self {
        for record in batch {
            self.records
                .entry(to_type_identifier(&record.entity))
                .or_default()
                .push(record);
        }
        self
    }

    /// Keys of all phase groups.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<String> {
        self.records.keys().cloned().collect()
    }

    /// Returns `true` if a group exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no phases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the phase enumerations, ordered by key.
    #[must_use]
    pub fn groups(&self) -> Vec<PhaseGroup> {
        self.records
            .iter()
            .map(|(key, records)| {
                let mut records: Vec<&PhaseRecord> = records.iter().collect();
                records.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
                let identifiers = assign_identifiers(
                    records.iter().map(|r| (r.name.as_str(), r.id.as_str())),
                    None,
                );
                PhaseGroup {
                    key: key.clone(),
                    entity: records
                        .first()
                        .map(|r| r.entity.clone())
                        .unwrap_or_default(),
                    phases: records
                        .into_iter()
                        .zip(identifiers)
                        .map(|(record, identifier)| PhaseEntry {
                            identifier,
                            id: record.id.clone(),
                            name: record.name.clone(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

/// Fetches active phases.
///
/// # Errors
///
/// Returns an error if the query fails or a record is malformed.
pub async fn fetch_phases<C>(client: &C) -> Result<PhaseCatalog>
where
    C: MetadataClient + ?Sized,
{
    let request = QueryRequest::new()
        .fields(PHASE_FIELDS.iter().copied())
        .filter(Query::eq("activity_level", 0));
    let records = client
        .query(PHASE_COLLECTION, &request)
        .await?
        .iter()
        .map(EntityRecord::to_phase)
        .collect::<Result<Vec<_>>>()?;

    let catalog = PhaseCatalog::default().merge(records);
    info!("Fetched phases for {} entity types", catalog.len());
    Ok(catalog)
}
