//! Connection readiness checks and row helpers shared by repositories.

use crate::db::migrations::latest_version;
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Table name plus the columns a repository reads or writes.
pub(crate) type TableSpec = (&'static str, &'static [&'static str]);

pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[TableSpec]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

/// Runs `body` as one atomic write unit.
///
/// In autocommit mode this opens an IMMEDIATE transaction, taking the write
/// lock at BEGIN. When the caller already holds an open transaction, `body`
/// runs inside the savepoint `name` and joins the caller's transaction; the
/// caller decides whether the outer work commits.
pub(crate) fn in_write_scope<T>(
    conn: &Connection,
    name: &'static str,
    body: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let value = body(&*tx)?;
        tx.commit()?;
        return Ok(value);
    }

    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    match body(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) =
                conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};"))
            {
                warn!(
                    "event=savepoint_rollback module=repo status=error savepoint={name} error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}

/// Returns whether `err` is a UNIQUE or PRIMARY KEY constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => {
            inner.code == ErrorCode::ConstraintViolation
                && matches!(
                    inner.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
