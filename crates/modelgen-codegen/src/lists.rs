//! List enumeration builder.
//!
//! Every list root becomes one enumeration whose first constant is the root
//! itself, followed by its values. Removed values never appear; deprecated
//! values are kept and flagged.

use crate::naming::assign_identifiers;
use modelgen_core::traits::MetadataClient;
use modelgen_core::{ActivityLevel, EntityRecord, ListNode, Query, QueryRequest, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Collection holding list roots and list values.
pub const LIST_COLLECTION: &str = "list_nodes";

const LIST_FIELDS: &[&str] = &["name", "id", "logical_name", "activity_level", "list_root"];

/// One constant of a list enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Enum constant
    pub identifier: String,
    /// Server id
    pub id: String,
    /// Raw display name
    pub name: String,
    /// Lifecycle state
    pub activity_level: ActivityLevel,
}

impl ListItem {
    /// Returns `true` if the value is deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.activity_level.is_deprecated()
    }
}

/// Enumeration generated for one list root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEnum {
    /// Enumeration name, the root's identifier
    pub identifier: String,
    /// Logical name of the root
    pub logical_name: Option<String>,
    /// Root first, then its values
    pub items: Vec<ListItem>,
}

impl ListEnum {
    /// Returns the root constant.
    #[must_use]
    pub fn root(&self) -> Option<&ListItem> {
        self.items.first()
    }

    /// Iterates over deprecated values.
    pub fn deprecated(&self) -> impl Iterator<Item = &ListItem> {
        self.items.iter().filter(|item| item.is_deprecated())
    }
}

/// All list enumerations of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCatalog {
    lists: Vec<ListEnum>,
    logical_names: BTreeMap<String, String>,
}

impl ListCatalog {
    /// Enumerations sorted by identifier.
    #[must_use]
    pub fn lists(&self) -> &[ListEnum] {
        &self.lists
    }

    /// Logical name to enumeration identifier table.
    #[must_use]
    pub const fn logical_names(&self) -> &BTreeMap<String, String> {
        &self.logical_names
    }

    /// Returns the enumeration identifier for a logical name.
    #[must_use]
    pub fn identifier_for(&self, logical_name: &str) -> Option<&str> {
        self.logical_names.get(logical_name).map(String::as_str)
    }

    /// Number of enumerations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns `true` if there are no enumerations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Builds list enumerations from fetched nodes.
///
/// Roots listed in `ignored` are dropped together with their values. Values
/// whose root is unknown are dropped. Identifier collisions are resolved by
/// suffixing, both between roots and between the values of one root; a value
/// named like its root is suffixed as well.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::lists::build_lists;
/// use modelgen_core::{ActivityLevel, ListNode};
/// use std::collections::BTreeSet;
///
/// let roots = vec![ListNode::root("1", "Severity", "list_node.severity")];
/// let values = vec![ListNode::child("2", "High", "1", ActivityLevel::Active)];
///
/// let catalog = build_lists(roots, values, &BTreeSet::new());
/// let severity = &catalog.lists()[0];
/// assert_eq!(severity.identifier, "SEVERITY");
/// assert_eq!(severity.items[1].identifier, "HIGH");
/// assert_eq!(catalog.identifier_for("list_node.severity"), Some("SEVERITY"));
/// ```
#[must_use]
pub fn build_lists(
    roots: Vec<ListNode>,
    values: Vec<ListNode>,
    ignored: &BTreeSet<String>,
) -> ListCatalog {
    let roots: Vec<ListNode> = roots
        .into_iter()
        .filter(|root| !ignored.contains(&root.id))
        .filter(|root| root.activity_level != ActivityLevel::Removed)
        .collect();

    let mut members: BTreeMap<&str, Vec<ListNode>> =
        roots.iter().map(|root| (root.id.as_str(), Vec::new())).collect();
    for value in values {
        if value.activity_level == ActivityLevel::Removed {
            continue;
        }
        let Some(root_id) = value.list_root.as_deref() else {
            continue;
        };
        if let Some(group) = members.get_mut(root_id) {
            group.push(value);
        }
    }

    let root_identifiers =
        assign_identifiers(roots.iter().map(|root| (root.name.as_str(), root.id.as_str())), None);

    let mut lists = Vec::with_capacity(roots.len());
    let mut logical_names = BTreeMap::new();

    for (root, identifier) in roots.iter().zip(root_identifiers) {
        let mut values = members.remove(root.id.as_str()).unwrap_or_default();
        values.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));

        let value_identifiers = assign_identifiers(
            values.iter().map(|value| (value.name.as_str(), value.id.as_str())),
            Some(&identifier),
        );

        let mut items = Vec::with_capacity(values.len() + 1);
        items.push(ListItem {
            identifier: identifier.clone(),
            id: root.id.clone(),
            name: root.name.clone(),
            activity_level: root.activity_level,
        });
        items.extend(values.into_iter().zip(value_identifiers).map(|(value, identifier)| {
            ListItem {
                identifier,
                id: value.id,
                name: value.name,
                activity_level: value.activity_level,
            }
        }));

        if let Some(logical_name) = &root.logical_name {
            logical_names.insert(logical_name.clone(), identifier.clone());
        }
        lists.push(ListEnum {
            identifier,
            logical_name: root.logical_name.clone(),
            items,
        });
    }

    lists.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    ListCatalog {
        lists,
        logical_names,
    }
}

/// Fetches list roots and their values and builds the enumerations.
///
/// Deprecated values are logged once per list.
///
/// # Errors
///
/// Returns an error if a query fails or a record is malformed.
pub async fn fetch_lists<C>(client: &C, ignored: &BTreeSet<String>) -> Result<ListCatalog>
where
    C: MetadataClient + ?Sized,
{
    let root_request = QueryRequest::new()
        .fields(LIST_FIELDS.iter().copied())
        .filter(Query::is_null("list_root").and(Query::eq("activity_level", 0)));
    let roots = client
        .query(LIST_COLLECTION, &root_request)
        .await?
        .iter()
        .map(EntityRecord::to_list_node)
        .collect::<Result<Vec<_>>>()?;
    info!("Fetched {} list roots", roots.len());

    let mut values = Vec::new();
    for root in roots.iter().filter(|root| !ignored.contains(&root.id)) {
        let request = QueryRequest::new()
            .fields(LIST_FIELDS.iter().copied())
            .filter(
                Query::refers("list_root", Query::eq("id", root.id.as_str()))
                    .and(Query::lt("activity_level", 2)),
            );
        let records = client.query(LIST_COLLECTION, &request).await?;
        debug!("List {} has {} values", root.name, records.len());
        for record in &records {
            values.push(record.to_list_node()?);
        }
    }

    let catalog = build_lists(roots, values, ignored);
    for list in catalog.lists() {
        for item in list.deprecated() {
            info!("List {} entry is deprecated: {}", list.identifier, item.name);
        }
    }
    Ok(catalog)
}
