//! Identifier normalization.
//!
//! Octane display names are free text. Everything emitted into Java source
//! passes through this module so that the same raw name always produces the
//! same identifier.
//!
//! # Examples
//!
//! ```
//! use modelgen_codegen::naming::{to_enum_identifier, to_type_identifier};
//!
//! assert_eq!(to_enum_identifier("Très Haute"), "TRES_HAUTE");
//! assert_eq!(to_enum_identifier("1st Priority"), "_1ST_PRIORITY");
//! assert_eq!(to_type_identifier("work_item_root"), "WorkItemRoot");
//! ```

use modelgen_core::FieldType;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static LEADING_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]").expect("valid regex"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// Identifiers that normalize to something Java cannot use as an enum constant.
const RESERVED_IDENTIFIERS: &[(&str, &str)] = &[("", "__"), ("_", "__")];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

/// Strips diacritics by decomposing to NFD and dropping combining marks.
///
/// ```
/// use modelgen_codegen::naming::remove_accents;
///
/// assert_eq!(remove_accents("Élevé"), "Eleve");
/// ```
#[must_use]
pub fn remove_accents(raw: &str) -> String {
    raw.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

/// Replaces identifiers Java rejects with their safe spelling.
#[must_use]
pub fn single_underscore_fix(identifier: String) -> String {
    RESERVED_IDENTIFIERS
        .iter()
        .find(|(reserved, _)| *reserved == identifier)
        .map_or(identifier, |(_, replacement)| (*replacement).to_string())
}

/// Normalizes a display name into an upper-snake enum constant.
///
/// The output only contains `[A-Z0-9_]`, never starts with a digit and is
/// never empty. Applying the function to its own output is a no-op.
#[must_use]
pub fn to_enum_identifier(raw: &str) -> String {
    let stripped = remove_accents(raw).replace(' ', "_");
    let prefixed = LEADING_DIGIT.replace(&stripped, "_$0");
    let word = NON_WORD.replace_all(&prefixed, "_");
    single_underscore_fix(word.to_ascii_uppercase())
}

/// Converts an entity or field name into a PascalCase Java type name.
///
/// ```
/// use modelgen_codegen::naming::to_type_identifier;
///
/// assert_eq!(to_type_identifier("defect"), "Defect");
/// assert_eq!(to_type_identifier("ci_parameter"), "CiParameter");
/// ```
#[must_use]
pub fn to_type_identifier(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut capitalize_next = true;

    for ch in remove_accents(raw).chars() {
        if ch.is_ascii_alphanumeric() {
            if capitalize_next {
                result.push(ch.to_ascii_uppercase());
                capitalize_next = false;
            } else {
                result.push(ch);
            }
        } else {
            capitalize_next = true;
        }
    }

    if result.starts_with(|ch: char| ch.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Converts a field name into a lowerCamel Java member name.
///
/// Java keywords get a trailing underscore.
///
/// ```
/// use modelgen_codegen::naming::to_member_identifier;
///
/// assert_eq!(to_member_identifier("release_version"), "releaseVersion");
/// assert_eq!(to_member_identifier("package"), "package_");
/// ```
#[must_use]
pub fn to_member_identifier(raw: &str) -> String {
    let pascal = to_type_identifier(raw);
    let mut chars = pascal.chars();
    let mut member = match chars.next() {
        None => return "field_".to_string(),
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
    };
    if JAVA_KEYWORDS.contains(&member.as_str()) {
        member.push('_');
    }
    member
}

/// Escapes text for use inside a Java string literal.
#[must_use]
pub fn java_string_literal(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Java type of a scalar field.
#[must_use]
pub const fn java_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String | FieldType::Memo | FieldType::Object => "String",
        FieldType::Integer => "Long",
        FieldType::Float => "Float",
        FieldType::Boolean => "Boolean",
        FieldType::Date | FieldType::DateTime => "java.time.ZonedDateTime",
        FieldType::Reference => "EntityModel",
        FieldType::Unknown => "Object",
    }
}

/// Assigns unique enum identifiers to a group of siblings.
///
/// Each sibling is a `(display name, id)` pair. Siblings whose normalized
/// names collide, or whose name equals `reserved`, receive `__1`, `__2`, ...
/// suffixes in order of display name then id. The result is aligned with the
/// input order.
///
/// ```
/// use modelgen_codegen::naming::assign_identifiers;
///
/// let ids = assign_identifiers([("N/A", "2"), ("N A", "1"), ("Low", "3")], None);
/// assert_eq!(ids, ["N_A__2", "N_A__1", "LOW"]);
/// ```
#[must_use]
pub fn assign_identifiers<'a, I>(siblings: I, reserved: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let siblings: Vec<(String, &str, &str)> = siblings
        .into_iter()
        .map(|(name, id)| (to_enum_identifier(name), name, id))
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (candidate, _, _) in &siblings {
        *counts.entry(candidate.as_str()).or_default() += 1;
    }

    let is_ambiguous = |candidate: &str| {
        counts.get(candidate).copied().unwrap_or(0) > 1 || reserved == Some(candidate)
    };

    let mut taken: BTreeSet<String> = counts
        .keys()
        .filter(|candidate| !is_ambiguous(candidate))
        .map(|candidate| (*candidate).to_string())
        .collect();
    if let Some(reserved) = reserved {
        taken.insert(reserved.to_string());
    }

    let mut order: Vec<usize> = (0..siblings.len()).collect();
    order.sort_by(|&a, &b| siblings[a].cmp(&siblings[b]));

    let mut counters: BTreeMap<&str, usize> = BTreeMap::new();
    let mut identifiers = vec![String::new(); siblings.len()];
    for index in order {
        let candidate = siblings[index].0.as_str();
        if !is_ambiguous(candidate) {
            identifiers[index] = candidate.to_string();
            continue;
        }
        let counter = counters.entry(candidate).or_default();
        identifiers[index] = loop {
            *counter += 1;
            let suffixed = format!("{candidate}__{counter}");
            if taken.insert(suffixed.clone()) {
                break suffixed;
            }
        };
    }
    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_identifier_basic() {
        assert_eq!(to_enum_identifier("High"), "HIGH");
        assert_eq!(to_enum_identifier("Very High"), "VERY_HIGH");
        assert_eq!(to_enum_identifier("N/A"), "N_A");
        assert_eq!(to_enum_identifier("In-Progress (QA)"), "IN_PROGRESS__QA_");
    }

    #[test]
    fn test_enum_identifier_accents() {
        assert_eq!(to_enum_identifier("Très Haute"), "TRES_HAUTE");
        assert_eq!(to_enum_identifier("Señor"), "SENOR");
    }

    #[test]
    fn test_enum_identifier_leading_digit() {
        assert_eq!(to_enum_identifier("1st Priority"), "_1ST_PRIORITY");
        assert_eq!(to_enum_identifier("42"), "_42");
    }

    #[test]
    fn test_enum_identifier_reserved() {
        assert_eq!(to_enum_identifier(""), "__");
        assert_eq!(to_enum_identifier("_"), "__");
        assert_eq!(to_enum_identifier(" "), "__");
        assert_eq!(to_enum_identifier("?"), "__");
    }

    #[test]
    fn test_enum_identifier_non_ascii_letters() {
        assert_eq!(to_enum_identifier("日本"), "__");
        assert_eq!(to_enum_identifier("Straße"), "STRA_E");
    }

    #[test]
    fn test_enum_identifier_idempotent() {
        for raw in ["Très Haute", "1st", "", "_", "N/A", "a b-c", "__", "_9", "ÀÉÎ õ"] {
            let once = to_enum_identifier(raw);
            assert_eq!(to_enum_identifier(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_enum_identifier_charset() {
        for raw in ["Ça va?", "3 Déc.", "x\ty", "→"] {
            let id = to_enum_identifier(raw);
            assert!(!id.is_empty());
            assert!(!id.starts_with(|ch: char| ch.is_ascii_digit()));
            assert!(id.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_'));
        }
    }

    #[test]
    fn test_type_identifier() {
        assert_eq!(to_type_identifier("work_item_root"), "WorkItemRoot");
        assert_eq!(to_type_identifier("defect"), "Defect");
        assert_eq!(to_type_identifier("team-member"), "TeamMember");
        assert_eq!(to_type_identifier("3d_model"), "_3dModel");
    }

    #[test]
    fn test_member_identifier() {
        assert_eq!(to_member_identifier("detected_by"), "detectedBy");
        assert_eq!(to_member_identifier("name"), "name");
        assert_eq!(to_member_identifier("class"), "class_");
        assert_eq!(to_member_identifier("__"), "field_");
    }

    #[test]
    fn test_java_string_literal() {
        assert_eq!(java_string_literal(r#"say "hi"\now"#), r#"say \"hi\"\\now"#);
        assert_eq!(java_string_literal("a\nb"), "a\\nb");
    }

    #[test]
    fn test_java_type() {
        assert_eq!(java_type(FieldType::Memo), "String");
        assert_eq!(java_type(FieldType::Integer), "Long");
        assert_eq!(java_type(FieldType::DateTime), "java.time.ZonedDateTime");
    }

    #[test]
    fn test_assign_identifiers_unique_names_untouched() {
        let ids = assign_identifiers([("High", "1"), ("Low", "2")], None);
        assert_eq!(ids, ["HIGH", "LOW"]);
    }

    #[test]
    fn test_assign_identifiers_collisions_suffixed() {
        let ids = assign_identifiers([("N A", "20"), ("N/A", "10")], None);
        // Ordered by display name: "N A" < "N/A".
        assert_eq!(ids, ["N_A__1", "N_A__2"]);
    }

    #[test]
    fn test_assign_identifiers_same_name_ordered_by_id() {
        let ids = assign_identifiers([("Open", "b"), ("Open", "a")], None);
        assert_eq!(ids, ["OPEN__2", "OPEN__1"]);
    }

    #[test]
    fn test_assign_identifiers_reserved() {
        let ids = assign_identifiers([("Severity", "1"), ("Low", "2")], Some("SEVERITY"));
        assert_eq!(ids, ["SEVERITY__1", "LOW"]);
    }

    #[test]
    fn test_assign_identifiers_avoids_existing_suffix() {
        let ids = assign_identifiers([("A", "1"), ("a", "2"), ("A__1", "3")], None);
        assert_eq!(ids, ["A__2", "A__3", "A__1"]);
    }
}
