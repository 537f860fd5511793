//! Tag use-case service.
//!
//! # Invariants
//! - Names are trimmed; case is preserved.
//! - Colors must be `#rrggbb`; missing colors fall back to the default.

use crate::model::tag::{NewTag, Tag, TagId, TagValidationError};
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TagServiceError {
    InvalidTag(TagValidationError),
    DuplicateName(String),
    TagNotFound(TagId),
    Repo(RepoError),
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "tag name already exists: `{name}`"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTag(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TagValidation(err) => Self::InvalidTag(err),
            RepoError::DuplicateTagName(name) => Self::DuplicateName(name),
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<TagValidationError> for TagServiceError {
    fn from(value: TagValidationError) -> Self {
        Self::InvalidTag(value)
    }
}

pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a tag; `color = None` uses the default gray.
    pub fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag, TagServiceError> {
        let mut tag = NewTag::new(name.trim());
        if let Some(color) = color {
            tag = tag.with_color(color.trim());
        }
        tag.validate()?;
        Ok(self.repo.create_tag(&tag)?)
    }

    pub fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        self.repo.get_tag(id)
    }

    pub fn get_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        self.repo.get_tag_by_name(name.trim())
    }

    pub fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        self.repo.list_tags()
    }

    pub fn delete_tag(&self, id: TagId) -> Result<(), TagServiceError> {
        self.repo.delete_tag(id)?;
        Ok(())
    }
}
