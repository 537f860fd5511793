//! Like repository: toggle, count and existence queries.
//!
//! # Responsibility
//! - Flip one user's like on one poem as a single atomic unit.
//! - Answer derived like queries by explicit indexed lookups.
//!
//! # Invariants
//! - At most one `poem_likes` row exists per `(poem_id, user_id)`.
//! - Anonymous viewers never read or write like rows; they see `false`.
//! - Like writes never touch `poems.updated_at`.

use crate::model::like::LikeRecord;
use crate::model::poem::PoemId;
use crate::model::user::Viewer;
use crate::repo::poem_repo::{poem_exists, user_exists};
use crate::repo::schema::{ensure_connection_ready, in_write_scope, parse_uuid, TableSpec};
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const LIKE_TABLES: &[TableSpec] = &[
    ("users", &["id", "username"]),
    ("poems", &["id", "title"]),
    ("poem_likes", &["id", "poem_id", "user_id", "created_at"]),
];

/// Repository interface for like operations.
pub trait LikeRepository {
    /// Adds the like when absent, removes it when present.
    ///
    /// Returns `true` when the like now exists, `false` when it was removed
    /// or the viewer is anonymous. Joins the caller's transaction when one
    /// is open on the connection.
    fn toggle_like(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool>;
    /// Counts like rows referencing the poem.
    fn likes_count(&self, poem_id: PoemId) -> RepoResult<u64>;
    /// Returns `false` for anonymous viewers without touching storage.
    fn is_liked_by_user(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool>;
    /// Lists likes referencing the poem, newest first.
    fn list_likes(&self, poem_id: PoemId) -> RepoResult<Vec<LikeRecord>>;
}

/// SQLite-backed like repository.
pub struct SqliteLikeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLikeRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, LIKE_TABLES)?;
        Ok(Self { conn })
    }
}

impl LikeRepository for SqliteLikeRepository<'_> {
    fn toggle_like(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool> {
        let Some(user_id) = viewer.user_id() else {
            return Ok(false);
        };
        let poem_text = poem_id.to_string();
        let user_text = user_id.to_string();

        let liked = in_write_scope(self.conn, "like_toggle", |conn| {
            if !poem_exists(conn, &poem_text)? {
                return Err(RepoError::PoemNotFound(poem_id));
            }
            if !user_exists(conn, &user_text)? {
                return Err(RepoError::UserNotFound(user_id));
            }

            let removed = conn.execute(
                "DELETE FROM poem_likes WHERE poem_id = ?1 AND user_id = ?2;",
                params![poem_text.as_str(), user_text.as_str()],
            )?;
            if removed > 0 {
                return Ok(false);
            }

            let inserted = conn.execute(
                "INSERT INTO poem_likes (id, poem_id, user_id)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (poem_id, user_id) DO NOTHING;",
                params![
                    Uuid::new_v4().to_string(),
                    poem_text.as_str(),
                    user_text.as_str()
                ],
            )?;
            if inserted == 1 {
                return Ok(true);
            }

            // Another writer stored the pair first; report what storage holds.
            warn!(
                "event=like_toggle module=repo status=conflict poem_id={poem_id} user_id={user_id}"
            );
            like_exists(conn, &poem_text, &user_text)
        })?;

        debug!("event=like_toggle module=repo status=ok poem_id={poem_id} liked={liked}");
        Ok(liked)
    }

    fn likes_count(&self, poem_id: PoemId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM poem_likes WHERE poem_id = ?1;",
            [poem_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative like count `{count}`")))
    }

    fn is_liked_by_user(&self, poem_id: PoemId, viewer: Viewer) -> RepoResult<bool> {
        match viewer.user_id() {
            None => Ok(false),
            Some(user_id) => like_exists(self.conn, &poem_id.to_string(), &user_id.to_string()),
        }
    }

    fn list_likes(&self, poem_id: PoemId) -> RepoResult<Vec<LikeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.id AS id,
                l.poem_id AS poem_id,
                p.title AS poem_title,
                l.user_id AS user_id,
                u.username AS username,
                l.created_at AS created_at
             FROM poem_likes l
             INNER JOIN poems p ON p.id = l.poem_id
             INNER JOIN users u ON u.id = l.user_id
             WHERE l.poem_id = ?1
             ORDER BY l.created_at DESC, l.id ASC;",
        )?;
        let mut rows = stmt.query([poem_id.to_string()])?;
        let mut likes = Vec::new();
        while let Some(row) = rows.next()? {
            likes.push(parse_like_row(row)?);
        }
        Ok(likes)
    }
}

fn like_exists(conn: &Connection, poem_id: &str, user_id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM poem_likes WHERE poem_id = ?1 AND user_id = ?2
        );",
        params![poem_id, user_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_like_row(row: &Row<'_>) -> RepoResult<LikeRecord> {
    let id_text: String = row.get("id")?;
    let poem_text: String = row.get("poem_id")?;
    let user_text: String = row.get("user_id")?;
    Ok(LikeRecord {
        id: parse_uuid(&id_text, "poem_likes.id")?,
        poem_id: parse_uuid(&poem_text, "poem_likes.poem_id")?,
        poem_title: row.get("poem_title")?,
        user_id: parse_uuid(&user_text, "poem_likes.user_id")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
    })
}
