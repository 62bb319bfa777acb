//! Corkboard note model, creation input and partial-update patch.
//!
//! # Invariants
//! - `created_at` is assigned once by storage and never changes.
//! - `updated_at` is `None` until the first update, then `>= created_at`.
//! - `tags` holds no duplicates and is kept sorted by name for stable output.
//! - Geometry components are finite; `width`/`height` are positive.

use super::tag::Tag;
use super::user::UserId;
use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-assigned note identifier.
pub type NoteId = i64;

/// Persisted corkboard note with its resolved tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    /// Free text body; a note may be created without one.
    pub content: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds of the last update, if any.
    pub updated_at: Option<i64>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tags: Vec<Tag>,
}

impl Note {
    /// Returns tag names in stored (name) order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }

    /// Returns whether `user_id` owns this note.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Size applied to new notes that do not specify one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteDefaults {
    pub width: f64,
    pub height: f64,
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 150.0,
        }
    }
}

/// Input for creating a note. Absent geometry falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewNote {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub tags: Vec<String>,
}

impl NewNote {
    /// Creates input with only `content` set.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Replaces the requested tag names.
    pub fn tagged<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets position on the board.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Fills absent geometry and validates the result.
    pub fn placement(&self, defaults: NoteDefaults) -> Result<Placement, ValidationError> {
        Placement::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.width.unwrap_or(defaults.width),
            self.height.unwrap_or(defaults.height),
        )
    }
}

/// Validated position and size of a note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, ValidationError> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_size("width", width)?;
        check_size("height", height)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// Partial update: only `Some` fields are applied.
///
/// `content: None` covers both an omitted field and an explicit JSON `null`;
/// either leaves the stored content untouched. `Some(String::new())` stores
/// an empty body. `tags: Some(vec![])` clears every association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.tags.is_none()
    }

    /// Validates only the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(x) = self.x {
            check_finite("x", x)?;
        }
        if let Some(y) = self.y {
            check_finite("y", y)?;
        }
        if let Some(width) = self.width {
            check_size("width", width)?;
        }
        if let Some(height) = self.height {
            check_size("height", height)?;
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteGeometry { field })
    }
}

fn check_size(field: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveSize { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewNote, NoteDefaults, NotePatch, Placement};
    use crate::model::ValidationError;

    #[test]
    fn placement_uses_defaults_for_missing_geometry() {
        let defaults = NoteDefaults {
            width: 150.0,
            height: 100.0,
        };
        let placement = NewNote::with_content("hi").at(4.0, 8.0).placement(defaults).unwrap();
        assert_eq!(placement, Placement::new(4.0, 8.0, 150.0, 100.0).unwrap());
    }

    #[test]
    fn placement_rejects_nan_and_zero_size() {
        let err = Placement::new(f64::NAN, 0.0, 1.0, 1.0).unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteGeometry { field: "x" });

        let err = Placement::new(0.0, 0.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositiveSize { field: "width", .. }
        ));
    }

    #[test]
    fn patch_validation_ignores_absent_fields() {
        assert!(NotePatch::default().is_empty());
        NotePatch::default().validate().unwrap();

        let patch = NotePatch {
            height: Some(-3.0),
            ..NotePatch::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_treats_null_and_missing_content_alike() {
        let missing: NotePatch = serde_json::from_str(r#"{"x": 10.0}"#).unwrap();
        let null: NotePatch = serde_json::from_str(r#"{"x": 10.0, "content": null}"#).unwrap();
        assert_eq!(missing, null);
        assert_eq!(missing.content, None);

        let empty: NotePatch = serde_json::from_str(r#"{"content": ""}"#).unwrap();
        assert_eq!(empty.content.as_deref(), Some(""));
    }

    #[test]
    fn patch_distinguishes_missing_tags_from_empty_tags() {
        let missing: NotePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.tags, None);

        let cleared: NotePatch = serde_json::from_str(r#"{"tags": []}"#).unwrap();
        assert_eq!(cleared.tags, Some(Vec::new()));
    }
}
