//! Like use-case service.
//!
//! Thin facade over `LikeRepository` that logs toggle outcomes and bundles
//! the two derived queries a poem view needs.

use crate::model::like::LikeRecord;
use crate::model::poem::PoemId;
use crate::model::user::Viewer;
use crate::repo::like_repo::LikeRepository;
use crate::repo::RepoResult;
use log::info;
use serde::Serialize;

/// Like state of one poem as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeSummary {
    pub likes_count: u64,
    pub liked_by_viewer: bool,
}

pub struct LikeService<R: LikeRepository> {
    repo: R,
}

impl<R: LikeRepository> LikeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Flips the viewer's like and returns whether the like now exists.
    ///
    /// Anonymous viewers get `false` here so the skip is logged;
    /// `LikeRepository::toggle_like` enforces the same guard on its own.
    pub fn toggle_like(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool> {
        if !viewer.is_authenticated() {
            info!("event=like_toggle module=service status=skipped reason=anonymous poem_id={poem_id}");
            return Ok(false);
        }
        let liked = self.repo.toggle_like(poem_id, viewer)?;
        info!(
            "event=like_toggle module=service status=ok poem_id={} action={}",
            poem_id,
            if liked { "added" } else { "removed" }
        );
        Ok(liked)
    }

    pub fn likes_count(&self, poem_id: PoemId) -> RepoResult<u64> {
        self.repo.likes_count(poem_id)
    }

    pub fn is_liked_by_user(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool> {
        self.repo.is_liked_by_user(poem_id, viewer)
    }

    pub fn list_likes(&self, poem_id: PoemId) -> RepoResult<Vec<LikeRecord>> {
        self.repo.list_likes(poem_id)
    }

    pub fn summary(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<LikeSummary> {
        Ok(LikeSummary {
            likes_count: self.repo.likes_count(poem_id)?,
            liked_by_viewer: self.repo.is_liked_by_user(poem_id, viewer)?,
        })
    }
}
