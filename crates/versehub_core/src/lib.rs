//! Core data model for the VerseHub poetry site.
//!
//! Poems, tags and per-user likes stored in SQLite, plus the atomic
//! like toggle. Identity and presentation live outside this crate.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::like::{LikeId, LikeRecord};
pub use model::poem::{Poem, PoemId, PoemPatch, PoemRecord, PoemValidationError};
pub use model::tag::{NewTag, Tag, TagId, TagValidationError, DEFAULT_TAG_COLOR};
pub use model::user::{User, UserId, UserValidationError, Viewer};
pub use repo::like_repo::{LikeRepository, SqliteLikeRepository};
pub use repo::poem_repo::{PoemListQuery, PoemRepository, SqlitePoemRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::like_service::{LikeService, LikeSummary};
pub use service::poem_service::{PoemService, PoemServiceError};
pub use service::tag_service::{TagService, TagServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
