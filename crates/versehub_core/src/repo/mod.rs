//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate model constraints before SQL mutations.
//! - Repositories are constructed with `try_new`, which rejects connections
//!   that are not fully migrated.
//! - Cascades are declared in the schema; repositories never delete
//!   dependent rows by hand.

mod error;
pub mod like_repo;
pub mod poem_repo;
mod schema;
pub mod tag_repo;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
