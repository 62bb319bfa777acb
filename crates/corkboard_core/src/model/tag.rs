//! Tag domain model and name normalization.
//!
//! # Invariants
//! - Tags live in one global namespace; names are unique across all rows.
//! - Names are trimmed of surrounding whitespace and otherwise kept verbatim,
//!   so `Work` and `work` are distinct tags.
//! - Tags are never removed when their last note goes away.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage-assigned tag identifier.
pub type TagId = i64;

/// Maximum tag name length in characters, measured after trimming.
pub const TAG_NAME_MAX_CHARS: usize = 64;

/// Persisted tag row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Normalizes one tag name.
///
/// # Errors
/// - `EmptyTagName` when nothing is left after trimming.
/// - `TagNameTooLong` when the trimmed name exceeds `TAG_NAME_MAX_CHARS`.
pub fn normalize_tag_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    if trimmed.chars().count() > TAG_NAME_MAX_CHARS {
        return Err(ValidationError::TagNameTooLong {
            name: trimmed.to_string(),
            max_chars: TAG_NAME_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Normalizes and deduplicates tag names, keeping first-occurrence order.
///
/// Fails on the first invalid name; nothing is partially accepted.
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::with_capacity(names.len());
    let mut normalized = Vec::with_capacity(names.len());
    for name in names {
        let value = normalize_tag_name(name.as_ref())?;
        if seen.insert(value.clone()) {
            normalized.push(value);
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag_name, normalize_tag_names, TAG_NAME_MAX_CHARS};
    use crate::model::ValidationError;

    #[test]
    fn normalize_trims_but_keeps_case() {
        assert_eq!(normalize_tag_name("  Work ").unwrap(), "Work");
    }

    #[test]
    fn normalize_rejects_blank_and_oversized_names() {
        assert_eq!(
            normalize_tag_name(" \t ").unwrap_err(),
            ValidationError::EmptyTagName
        );
        let long = "x".repeat(TAG_NAME_MAX_CHARS + 1);
        assert!(matches!(
            normalize_tag_name(&long).unwrap_err(),
            ValidationError::TagNameTooLong { .. }
        ));
    }

    #[test]
    fn normalize_names_dedups_in_first_seen_order() {
        let names = normalize_tag_names(&["urgent", "work", " urgent", "Work"]).unwrap();
        assert_eq!(names, vec!["urgent", "work", "Work"]);
    }
}
