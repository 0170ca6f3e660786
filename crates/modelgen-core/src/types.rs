//! Strong domain types for Octane model generation.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::{ActivityLevel, EntityName};
//!
//! let name = EntityName::new("defect");
//! assert_eq!(name.as_str(), "defect");
//! assert!(ActivityLevel::from_level(1).unwrap().is_deprecated());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type name (newtype over String).
///
/// Server-side snake case name such as `defect` or `work_item_root`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Creates a new entity name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the entity name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `EntityName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of list nodes and phases.
///
/// The server encodes this as `activity_level`: 0 active, 1 deprecated,
/// 2 removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ActivityLevel {
    /// Usable value
    #[default]
    Active,
    /// Still valid but scheduled for removal
    Deprecated,
    /// Removed from the server
    Removed,
}

impl ActivityLevel {
    /// Converts the server encoding into an activity level.
    ///
    /// Returns `None` for levels the server does not define.
    #[must_use]
    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::Active),
            1 => Some(Self::Deprecated),
            2 => Some(Self::Removed),
            _ => None,
        }
    }

    /// Returns the server encoding.
    #[must_use]
    pub const fn level(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::Deprecated => 1,
            Self::Removed => 2,
        }
    }

    /// Returns `true` for deprecated values.
    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::Deprecated)
    }
}

impl Serialize for ActivityLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.level())
    }
}

impl<'de> Deserialize<'de> for ActivityLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = i64::deserialize(deserializer)?;
        Self::from_level(level)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown activity level {level}")))
    }
}
