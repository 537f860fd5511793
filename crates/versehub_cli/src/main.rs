//! CLI smoke entry point.
//!
//! Opens (and migrates) a database file, then prints the core version and
//! store totals. Usage: `versehub_cli [DB_PATH]`.
//! Set `VERSEHUB_LOG_DIR` to an absolute path to enable file logging.

use std::process::ExitCode;
use versehub_core::db::open_db;
use versehub_core::{
    core_version, default_log_level, init_logging, LikeRepository, PoemListQuery, PoemRepository,
    SqliteLikeRepository, SqlitePoemRepository, SqliteTagRepository, TagRepository,
};

const DEFAULT_DB_PATH: &str = "versehub.sqlite3";
const LOG_DIR_ENV: &str = "VERSEHUB_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("versehub_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let poems = SqlitePoemRepository::try_new(&conn)?.list_poems(&PoemListQuery::default())?;
    let tags = SqliteTagRepository::try_new(&conn)?.list_tags()?;
    let likes = SqliteLikeRepository::try_new(&conn)?;

    let mut total_likes = 0;
    for poem in &poems {
        total_likes += likes.likes_count(poem.id)?;
    }
    let published = poems.iter().filter(|poem| poem.is_published).count();

    println!("versehub_core version={}", core_version());
    println!("db={db_path}");
    println!(
        "poems={} published={} tags={} likes={}",
        poems.len(),
        published,
        tags.len(),
        total_likes
    );
    Ok(())
}
