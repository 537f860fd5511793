//! Domain model for poems, tags, likes and the identity mirror.
//!
//! # Invariants
//! - Poems, likes and users are identified by stable UUIDs.
//! - Tags use an integer surrogate key and a unique name.
//! - Timestamps are epoch milliseconds assigned by storage.

pub mod like;
pub mod poem;
pub mod tag;
pub mod user;
