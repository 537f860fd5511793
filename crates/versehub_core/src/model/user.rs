//! Identity mirror and caller viewpoint.
//!
//! Users are owned by an external auth subsystem. This crate stores only the
//! stable id and username so that poems and likes can reference them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Stable identifier issued by the identity subsystem.
pub type UserId = Uuid;

/// Local mirror row for an external user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Checks a username before it is mirrored into storage.
    pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let chars = username.chars().count();
        if chars > USERNAME_MAX_CHARS {
            return Err(UserValidationError::UsernameTooLong { chars });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { chars: usize },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::UsernameTooLong { chars } => write!(
                f,
                "username has {chars} characters; maximum is {USERNAME_MAX_CHARS}"
            ),
        }
    }
}

impl Error for UserValidationError {}

/// Caller identity as seen by like queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "user_id")]
pub enum Viewer {
    /// Not signed in. Like operations are no-ops returning `false`.
    Anonymous,
    /// Signed in with a stable user id.
    Authenticated(UserId),
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the user id for authenticated viewers.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for Viewer {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}
