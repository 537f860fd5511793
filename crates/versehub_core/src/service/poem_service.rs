//! Poem use-case service.
//!
//! # Responsibility
//! - Provide poem create/update/get/list/delete APIs with read-back.
//! - Normalize titles and replace tag sets atomically.
//!
//! # Invariants
//! - Titles are trimmed before validation and persistence.
//! - Listing is always newest first.

use crate::model::poem::{Poem, PoemId, PoemPatch, PoemRecord, PoemValidationError};
use crate::model::tag::TagId;
use crate::model::user::UserId;
use crate::repo::poem_repo::{PoemListQuery, PoemRepository};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for poem use-cases.
#[derive(Debug)]
pub enum PoemServiceError {
    InvalidInput(PoemValidationError),
    PoemNotFound(PoemId),
    AuthorNotFound(UserId),
    TagNotFound(TagId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for PoemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::PoemNotFound(id) => write!(f, "poem not found: {id}"),
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent poem state: {details}"),
        }
    }
}

impl Error for PoemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PoemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PoemValidation(err) => Self::InvalidInput(err),
            RepoError::PoemNotFound(id) => Self::PoemNotFound(id),
            RepoError::UserNotFound(id) => Self::AuthorNotFound(id),
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<PoemValidationError> for PoemServiceError {
    fn from(value: PoemValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Poem service facade over repository implementations.
pub struct PoemService<R: PoemRepository> {
    repo: R,
}

impl<R: PoemRepository> PoemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one published poem and returns the stored record.
    pub fn create_poem(
        &self,
        author_id: UserId,
        title: &str,
        content: impl Into<String>,
    ) -> Result<PoemRecord, PoemServiceError> {
        self.create_poem_with_visibility(author_id, title, content, true)
    }

    /// Creates one poem with explicit publish state.
    pub fn create_poem_with_visibility(
        &self,
        author_id: UserId,
        title: &str,
        content: impl Into<String>,
        is_published: bool,
    ) -> Result<PoemRecord, PoemServiceError> {
        let mut poem = Poem::new(author_id, title.trim(), content);
        poem.is_published = is_published;
        poem.validate()?;

        let id = self.repo.create_poem(&poem)?;
        self.read_back(id, "created poem not found in read-back")
    }

    /// Applies a partial update and returns the refreshed record.
    pub fn update_poem(
        &self,
        id: PoemId,
        mut patch: PoemPatch,
    ) -> Result<PoemRecord, PoemServiceError> {
        patch.title = patch.title.map(|title| title.trim().to_string());
        patch.validate()?;
        self.repo.update_poem(id, &patch)?;
        self.read_back(id, "updated poem not found in read-back")
    }

    pub fn set_published(
        &self,
        id: PoemId,
        is_published: bool,
    ) -> Result<PoemRecord, PoemServiceError> {
        self.update_poem(
            id,
            PoemPatch {
                is_published: Some(is_published),
                ..PoemPatch::default()
            },
        )
    }

    /// Atomically replaces the full tag set for one poem.
    pub fn set_poem_tags(
        &self,
        id: PoemId,
        tag_ids: &[TagId],
    ) -> Result<PoemRecord, PoemServiceError> {
        self.repo.set_poem_tags(id, tag_ids)?;
        self.read_back(id, "poem missing after tag replacement")
    }

    pub fn get_poem(&self, id: PoemId) -> RepoResult<Option<PoemRecord>> {
        self.repo.get_poem(id)
    }

    pub fn delete_poem(&self, id: PoemId) -> Result<(), PoemServiceError> {
        self.repo.delete_poem(id)?;
        Ok(())
    }

    pub fn list_poems(&self, query: &PoemListQuery) -> Result<Vec<PoemRecord>, PoemServiceError> {
        Ok(self.repo.list_poems(query)?)
    }

    /// Lists the public feed: published poems, newest first.
    pub fn list_published(&self) -> Result<Vec<PoemRecord>, PoemServiceError> {
        self.list_poems(&PoemListQuery {
            published_only: true,
            ..PoemListQuery::default()
        })
    }

    fn read_back(
        &self,
        id: PoemId,
        details: &'static str,
    ) -> Result<PoemRecord, PoemServiceError> {
        self.repo
            .get_poem(id)?
            .ok_or(PoemServiceError::InconsistentState(details))
    }
}
