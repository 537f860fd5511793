//! Like read model.

use crate::model::poem::PoemId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type LikeId = Uuid;

/// One user's endorsement of one poem. At most one per (poem, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRecord {
    pub id: LikeId,
    pub poem_id: PoemId,
    pub poem_title: String,
    pub user_id: UserId,
    pub username: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Display for LikeRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Like by {} to {}", self.username, self.poem_title)
    }
}
