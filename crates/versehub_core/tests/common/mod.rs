#![allow(dead_code)]

use rusqlite::{params, Connection};
use uuid::Uuid;
use versehub_core::db::open_db_in_memory;
use versehub_core::{
    Poem, PoemId, PoemRepository, SqlitePoemRepository, SqliteUserRepository, UserId,
    UserRepository,
};

pub fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn create_user(conn: &Connection, username: &str) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(Uuid::new_v4(), username).unwrap().id
}

pub fn create_poem(conn: &Connection, author: UserId, title: &str) -> PoemId {
    let repo = SqlitePoemRepository::try_new(conn).unwrap();
    repo.create_poem(&Poem::new(author, title, "line one\nline two"))
        .unwrap()
}

pub fn set_timestamps(conn: &Connection, poem_id: PoemId, created_at: i64, updated_at: i64) {
    conn.execute(
        "UPDATE poems SET created_at = ?2, updated_at = ?3 WHERE id = ?1;",
        params![poem_id.to_string(), created_at, updated_at],
    )
    .unwrap();
}

pub fn count_rows(conn: &Connection, sql: &str, poem_id: PoemId) -> i64 {
    conn.query_row(sql, [poem_id.to_string()], |row| row.get(0))
        .unwrap()
}
