//! Tag repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Tag names are unique at storage level and compared case-sensitively.
//! - Deleting a tag removes its poem links through the schema cascade.

use crate::model::tag::{NewTag, Tag, TagId};
use crate::repo::schema::{ensure_connection_ready, is_unique_violation, TableSpec};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TAG_TABLES: &[TableSpec] = &[("tags", &["id", "name", "color"])];

/// Repository interface for tag operations.
pub trait TagRepository {
    /// Inserts one tag. Fails with `DuplicateTagName` when the name exists.
    fn create_tag(&self, tag: &NewTag) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn get_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Returns all tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TAG_TABLES)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, tag: &NewTag) -> RepoResult<Tag> {
        tag.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO tags (name, color) VALUES (?1, ?2);",
            params![tag.name.as_str(), tag.color.as_str()],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateTagName(tag.name.clone()));
            }
            Err(err) => return Err(err.into()),
        }

        let id = self.conn.last_insert_rowid();
        info!("event=tag_create module=repo status=ok tag_id={id}");
        Ok(Tag {
            id,
            name: tag.name.clone(),
            color: tag.color.clone(),
        })
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name, color FROM tags WHERE id = ?1;",
                [id],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn get_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name, color FROM tags WHERE name = ?1;",
                [name],
                parse_tag_row,
            )
            .optional()?;
        Ok(tag)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM tags ORDER BY name ASC, id ASC;")?;
        let tags = stmt
            .query_map([], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }
}

/// Loads the tag set of one poem, sorted by name.
pub(crate) fn load_tags_for_poem(conn: &Connection, poem_id: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id AS id, t.name AS name, t.color AS color
         FROM poem_tags pt
         INNER JOIN tags t ON t.id = pt.tag_id
         WHERE pt.poem_id = ?1
         ORDER BY t.name ASC, t.id ASC;",
    )?;
    let tags = stmt
        .query_map([poem_id], parse_tag_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}
