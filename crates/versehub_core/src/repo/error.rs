use crate::db::DbError;
use crate::model::poem::{PoemId, PoemValidationError};
use crate::model::tag::{TagId, TagValidationError};
use crate::model::user::{UserId, UserValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    PoemValidation(PoemValidationError),
    TagValidation(TagValidationError),
    UserValidation(UserValidationError),
    PoemNotFound(PoemId),
    TagNotFound(TagId),
    UserNotFound(UserId),
    /// Tag name already taken (storage uniqueness).
    DuplicateTagName(String),
    /// Username already taken (storage uniqueness).
    DuplicateUsername(String),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::PoemValidation(err) => write!(f, "{err}"),
            Self::TagValidation(err) => write!(f, "{err}"),
            Self::UserValidation(err) => write!(f, "{err}"),
            Self::PoemNotFound(id) => write!(f, "poem not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::DuplicateTagName(name) => write!(f, "tag name already exists: `{name}`"),
            Self::DuplicateUsername(name) => write!(f, "username already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::PoemValidation(err) => Some(err),
            Self::TagValidation(err) => Some(err),
            Self::UserValidation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PoemValidationError> for RepoError {
    fn from(value: PoemValidationError) -> Self {
        Self::PoemValidation(value)
    }
}

impl From<TagValidationError> for RepoError {
    fn from(value: TagValidationError) -> Self {
        Self::TagValidation(value)
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::UserValidation(value)
    }
}
