//! Poem domain model.
//!
//! # Responsibility
//! - Define the write model (`Poem`) and the read model (`PoemRecord`).
//! - Validate title/content constraints before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused.
//! - `title` is non-blank and at most 255 characters.
//! - `content` is non-blank.
//! - `created_at` never changes after insert; `updated_at` follows edits.

use crate::model::tag::Tag;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type PoemId = Uuid;

/// Maximum title length in characters.
pub const POEM_TITLE_MAX_CHARS: usize = 255;

/// Write model for poem creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub id: PoemId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub is_published: bool,
}

impl Poem {
    /// Creates a published poem with a generated id.
    pub fn new(author_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            content: content.into(),
            is_published: true,
        }
    }

    pub fn validate(&self) -> Result<(), PoemValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoemPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

impl PoemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_published.is_none()
    }

    pub fn validate(&self) -> Result<(), PoemValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        Ok(())
    }
}

/// Read model joined with author name and tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRecord {
    pub id: PoemId,
    pub author_id: UserId,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    /// Sorted by name.
    pub tags: Vec<Tag>,
}

impl Display for PoemRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.author_username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoemValidationError {
    EmptyTitle,
    TitleTooLong { chars: usize },
    EmptyContent,
}

impl Display for PoemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "poem title cannot be empty"),
            Self::TitleTooLong { chars } => write!(
                f,
                "poem title has {chars} characters; maximum is {POEM_TITLE_MAX_CHARS}"
            ),
            Self::EmptyContent => write!(f, "poem content cannot be empty"),
        }
    }
}

impl Error for PoemValidationError {}

fn validate_title(title: &str) -> Result<(), PoemValidationError> {
    if title.trim().is_empty() {
        return Err(PoemValidationError::EmptyTitle);
    }
    let chars = title.chars().count();
    if chars > POEM_TITLE_MAX_CHARS {
        return Err(PoemValidationError::TitleTooLong { chars });
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), PoemValidationError> {
    if content.trim().is_empty() {
        return Err(PoemValidationError::EmptyContent);
    }
    Ok(())
}
