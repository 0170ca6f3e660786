//! Query filters for Octane entity collections.
//!
//! Filters render to the server's query syntax: comparisons are
//! `field OP value`, conjunction is `;`, and a nested filter on a
//! referenced collection is wrapped in braces.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::Query;
//!
//! let filter = Query::refers("list_root", Query::eq("id", "1001"))
//!     .and(Query::lt("activity_level", 2));
//!
//! assert_eq!(filter.to_string(), "list_root EQ {id EQ '1001'};activity_level LT 2");
//! ```

use std::fmt;

/// Value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// `null`
    Null,
    /// Unquoted number
    Number(i64),
    /// Quoted string
    Text(String),
    /// Cross filter on the referenced collection
    Nested(Box<Query>),
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Self::Nested(query) => write!(f, "{{{query}}}"),
        }
    }
}

/// Filter over a named entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `field EQ value`
    Equal {
        /// Field name
        field: String,
        /// Compared value
        value: QueryValue,
    },
    /// `field LT value`
    LessThan {
        /// Field name
        field: String,
        /// Compared value
        value: QueryValue,
    },
    /// Conjunction of all parts
    And(Vec<Self>),
}

impl Query {
    /// Equality comparison.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Less-than comparison.
    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::LessThan {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field EQ null`.
    #[must_use]
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::Equal {
            field: field.into(),
            value: QueryValue::Null,
        }
    }

    /// Matches records whose reference `field` satisfies `nested`.
    #[must_use]
    pub fn refers(field: impl Into<String>, nested: Self) -> Self {
        Self::Equal {
            field: field.into(),
            value: QueryValue::Nested(Box::new(nested)),
        }
    }

    /// Conjunction with another filter, flattening nested conjunctions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut parts = match self {
            Self::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Self::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Self::And(parts)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal { field, value } => write!(f, "{field} EQ {value}"),
            Self::LessThan { field, value } => write!(f, "{field} LT {value}"),
            Self::And(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// Request against an entity collection: projected fields plus filter.
///
/// # Examples
///
/// ```
/// use modelgen_core::{Query, QueryRequest};
///
/// let request = QueryRequest::new()
///     .fields(["id", "name", "entity"])
///     .filter(Query::eq("activity_level", 0));
///
/// assert_eq!(request.fields, vec!["id", "name", "entity"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// Fields to return, empty for the server default
    pub fields: Vec<String>,
    /// Optional filter
    pub filter: Option<Query>,
}

impl QueryRequest {
    /// Creates an unfiltered request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projected fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Query) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_comparison() {
        assert_eq!(Query::is_null("list_root").to_string(), "list_root EQ null");
    }

    #[test]
    fn test_text_values_are_escaped() {
        let query = Query::eq("name", "it's");
        assert_eq!(query.to_string(), "name EQ 'it\\'s'");
    }

    #[test]
    fn test_and_flattens() {
        let query = Query::is_null("list_root")
            .and(Query::eq("activity_level", 0))
            .and(Query::lt("id", 10));
        match &query {
            Query::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected conjunction, got {other:?}"),
        }
        assert_eq!(
            query.to_string(),
            "list_root EQ null;activity_level EQ 0;id LT 10"
        );
    }
}
