//! Identity mirror repository.
//!
//! # Responsibility
//! - Record external user identities so poems and likes can reference them.
//! - Remove identities; the schema cascades their poems and likes.

use crate::model::user::{User, UserId};
use crate::repo::schema::{ensure_connection_ready, is_unique_violation, parse_uuid, TableSpec};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_TABLES: &[TableSpec] = &[("users", &["id", "username", "created_at"])];

/// Repository interface for the identity mirror.
pub trait UserRepository {
    /// Registers one identity issued by the auth subsystem.
    fn create_user(&self, id: UserId, username: &str) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Removes one identity together with its poems and likes.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed identity mirror.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, USER_TABLES)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, id: UserId, username: &str) -> RepoResult<User> {
        let trimmed = username.trim();
        User::validate_username(trimmed)?;

        let inserted = self.conn.execute(
            "INSERT INTO users (id, username) VALUES (?1, ?2);",
            params![id.to_string(), trimmed],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateUsername(trimmed.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        self.get_user(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("user {id} missing after insert")))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?1;",
                [id.to_string()],
                |row| Ok(parse_user_row(row)),
            )
            .optional()?;
        user.transpose()
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(id));
        }
        info!("event=user_delete module=repo status=ok user_id={id}");
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
    })
}
