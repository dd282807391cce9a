//! Tutorial domain model.
//!
//! # Responsibility
//! - Define the persisted tutorial record and its create/update input shapes.
//! - Apply field defaults for partial client payloads.
//!
//! # Invariants
//! - `id` is stable and never reused for another tutorial.
//! - A persisted `title` is never blank.
//! - `updated_at >= created_at` for every persisted record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a tutorial.
pub type TutorialId = Uuid;

/// Validation failures for tutorial write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialValidationError {
    /// `title` is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TutorialValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Content can not be empty!"),
        }
    }
}

impl Error for TutorialValidationError {}

/// Persisted tutorial record as returned by reads.
///
/// Serialized with camelCase timestamp names to match the REST wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: TutorialId,
    pub title: String,
    pub description: String,
    pub published: bool,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by storage on every update.
    pub updated_at: i64,
}

/// Create payload. Every field is optional; missing fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl TutorialDraft {
    /// Creates a draft with title and description set.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            published: None,
        }
    }
}

/// Partial update payload. Only present fields are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl TutorialPatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.published.is_none()
    }

    /// Rejects a patch that would blank out the title.
    pub fn validate(&self) -> Result<(), TutorialValidationError> {
        match self.title.as_deref() {
            Some(title) if title.trim().is_empty() => Err(TutorialValidationError::EmptyTitle),
            _ => Ok(()),
        }
    }
}

/// Validated insert shape with a pre-generated stable ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTutorial {
    pub id: TutorialId,
    pub title: String,
    pub description: String,
    pub published: bool,
}

impl NewTutorial {
    /// Creates an unpublished tutorial with a generated ID.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            published: false,
        }
    }

    /// Builds an insert shape from a draft, applying field defaults.
    ///
    /// Does not validate; callers go through [`NewTutorial::validate`] or the
    /// repository write path.
    pub fn from_draft(draft: TutorialDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            published: draft.published.unwrap_or(false),
        }
    }

    pub fn validate(&self) -> Result<(), TutorialValidationError> {
        if self.title.trim().is_empty() {
            return Err(TutorialValidationError::EmptyTitle);
        }
        Ok(())
    }
}
