//! Poem repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist poems and their tag links.
//! - Own tag-set replacement (`set_poem_tags`) with atomic semantics.
//!
//! # Invariants
//! - Listing order is `created_at DESC, id ASC`.
//! - `created_at` is written once by the insert default.
//! - Every poem mutation refreshes `updated_at`; like rows never do.

use crate::model::poem::{Poem, PoemId, PoemPatch, PoemRecord};
use crate::model::tag::TagId;
use crate::model::user::UserId;
use crate::repo::schema::{
    bool_to_int, ensure_connection_ready, in_write_scope, parse_bool, parse_uuid, TableSpec,
};
use crate::repo::tag_repo::load_tags_for_poem;
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const POEM_TABLES: &[TableSpec] = &[
    ("users", &["id", "username"]),
    (
        "poems",
        &[
            "id",
            "title",
            "content",
            "author_id",
            "created_at",
            "updated_at",
            "is_published",
        ],
    ),
    ("tags", &["id", "name", "color"]),
    ("poem_tags", &["poem_id", "tag_id"]),
];

const POEM_SELECT_SQL: &str = "SELECT
    p.id AS id,
    p.author_id AS author_id,
    u.username AS author_username,
    p.title AS title,
    p.content AS content,
    p.is_published AS is_published,
    p.created_at AS created_at,
    p.updated_at AS updated_at
FROM poems p
INNER JOIN users u ON u.id = p.author_id";

/// Filters for poem listing. All filters are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoemListQuery {
    pub author_id: Option<UserId>,
    /// Exact tag name match.
    pub tag: Option<String>,
    /// Hide unpublished poems.
    pub published_only: bool,
}

/// Repository interface for poem operations.
pub trait PoemRepository {
    /// Inserts one poem and returns its stable id.
    fn create_poem(&self, poem: &Poem) -> RepoResult<PoemId>;
    fn get_poem(&self, id: PoemId) -> RepoResult<Option<PoemRecord>>;
    /// Applies a partial update and refreshes `updated_at`.
    fn update_poem(&self, id: PoemId, patch: &PoemPatch) -> RepoResult<()>;
    /// Replaces the full tag set atomically, joining the caller's
    /// transaction when one is open.
    fn set_poem_tags(&self, id: PoemId, tag_ids: &[TagId]) -> RepoResult<()>;
    /// Deletes one poem; likes and tag links cascade.
    fn delete_poem(&self, id: PoemId) -> RepoResult<()>;
    /// Lists poems newest first.
    fn list_poems(&self, query: &PoemListQuery) -> RepoResult<Vec<PoemRecord>>;
}

/// SQLite-backed poem repository.
pub struct SqlitePoemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePoemRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, POEM_TABLES)?;
        Ok(Self { conn })
    }
}

impl PoemRepository for SqlitePoemRepository<'_> {
    fn create_poem(&self, poem: &Poem) -> RepoResult<PoemId> {
        poem.validate()?;
        if !user_exists(self.conn, &poem.author_id.to_string())? {
            return Err(RepoError::UserNotFound(poem.author_id));
        }

        self.conn.execute(
            "INSERT INTO poems (
                id,
                title,
                content,
                author_id,
                is_published
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                poem.id.to_string(),
                poem.title.as_str(),
                poem.content.as_str(),
                poem.author_id.to_string(),
                bool_to_int(poem.is_published),
            ],
        )?;

        info!(
            "event=poem_create module=repo status=ok poem_id={} author_id={}",
            poem.id, poem.author_id
        );
        Ok(poem.id)
    }

    fn get_poem(&self, id: PoemId) -> RepoResult<Option<PoemRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POEM_SELECT_SQL} WHERE p.id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_poem_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn update_poem(&self, id: PoemId, patch: &PoemPatch) -> RepoResult<()> {
        patch.validate()?;
        let id_text = id.to_string();

        if patch.is_empty() {
            return if poem_exists(self.conn, &id_text)? {
                Ok(())
            } else {
                Err(RepoError::PoemNotFound(id))
            };
        }

        let changed = self.conn.execute(
            "UPDATE poems
             SET
                title = COALESCE(?2, title),
                content = COALESCE(?3, content),
                is_published = COALESCE(?4, is_published),
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE id = ?1;",
            params![
                id_text,
                patch.title.as_deref(),
                patch.content.as_deref(),
                patch.is_published.map(bool_to_int),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::PoemNotFound(id));
        }
        Ok(())
    }

    fn set_poem_tags(&self, id: PoemId, tag_ids: &[TagId]) -> RepoResult<()> {
        let id_text = id.to_string();
        let unique: BTreeSet<TagId> = tag_ids.iter().copied().collect();

        in_write_scope(self.conn, "poem_set_tags", |conn| {
            if !poem_exists(conn, &id_text)? {
                return Err(RepoError::PoemNotFound(id));
            }
            for tag_id in &unique {
                if !tag_exists(conn, *tag_id)? {
                    return Err(RepoError::TagNotFound(*tag_id));
                }
            }

            conn.execute("DELETE FROM poem_tags WHERE poem_id = ?1;", [id_text.as_str()])?;
            for tag_id in &unique {
                conn.execute(
                    "INSERT INTO poem_tags (poem_id, tag_id) VALUES (?1, ?2);",
                    params![id_text.as_str(), tag_id],
                )?;
            }
            conn.execute(
                "UPDATE poems
                 SET updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
                 WHERE id = ?1;",
                [id_text.as_str()],
            )?;
            Ok(())
        })
    }

    fn delete_poem(&self, id: PoemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM poems WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PoemNotFound(id));
        }
        info!("event=poem_delete module=repo status=ok poem_id={id}");
        Ok(())
    }

    fn list_poems(&self, query: &PoemListQuery) -> RepoResult<Vec<PoemRecord>> {
        let mut sql = format!("{POEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.published_only {
            sql.push_str(" AND p.is_published = 1");
        }

        if let Some(author_id) = query.author_id {
            sql.push_str(" AND p.author_id = ?");
            bind_values.push(Value::Text(author_id.to_string()));
        }

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM poem_tags pt
                    INNER JOIN tags t ON t.id = pt.tag_id
                    WHERE pt.poem_id = p.id
                      AND t.name = ?
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut poems = Vec::new();
        while let Some(row) = rows.next()? {
            poems.push(parse_poem_row(self.conn, row)?);
        }
        Ok(poems)
    }
}

/// Returns whether a poem row exists. Shared with the like repository.
pub(crate) fn poem_exists(conn: &Connection, poem_id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM poems WHERE id = ?1);",
        [poem_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn user_exists(conn: &Connection, user_id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn tag_exists(conn: &Connection, tag_id: TagId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?1);",
        [tag_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_poem_row(conn: &Connection, row: &Row<'_>) -> RepoResult<PoemRecord> {
    let id_text: String = row.get("id")?;
    let author_text: String = row.get("author_id")?;
    let tags = load_tags_for_poem(conn, &id_text)?;
    Ok(PoemRecord {
        id: parse_uuid(&id_text, "poems.id")?,
        author_id: parse_uuid(&author_text, "poems.author_id")?,
        author_username: row.get("author_username")?,
        title: row.get("title")?,
        content: row.get("content")?,
        is_published: parse_bool(row.get("is_published")?, "poems.is_published")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags,
    })
}
