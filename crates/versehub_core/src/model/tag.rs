//! Tag domain model.
//!
//! # Invariants
//! - `name` is non-blank and at most 50 characters.
//! - `color` is a `#rrggbb` hex string; defaults to `#6c757d`.
//! - Name uniqueness is enforced by storage, not here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned tag key.
pub type TagId = i64;

/// Color applied when a tag is created without one.
pub const DEFAULT_TAG_COLOR: &str = "#6c757d";
/// Maximum tag name length in characters.
pub const TAG_NAME_MAX_CHARS: usize = 50;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Persisted tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Write model for tag creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

impl NewTag {
    /// Creates a tag draft with the default color.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_TAG_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Checks name and color constraints before persistence.
    pub fn validate(&self) -> Result<(), TagValidationError> {
        if self.name.trim().is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        let chars = self.name.chars().count();
        if chars > TAG_NAME_MAX_CHARS {
            return Err(TagValidationError::NameTooLong { chars });
        }
        if !is_hex_color(&self.color) {
            return Err(TagValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// Returns whether `value` is a 7-character `#rrggbb` color.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
    NameTooLong { chars: usize },
    InvalidColor(String),
}

impl Display for TagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "tag name cannot be empty"),
            Self::NameTooLong { chars } => write!(
                f,
                "tag name has {chars} characters; maximum is {TAG_NAME_MAX_CHARS}"
            ),
            Self::InvalidColor(value) => {
                write!(f, "tag color `{value}` is not a #rrggbb hex color")
            }
        }
    }
}

impl Error for TagValidationError {}
