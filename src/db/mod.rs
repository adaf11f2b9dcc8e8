use rusqlite::{Connection, Result};
use std::path::{Path, PathBuf};

pub mod history;

pub use history::SqliteHistoryStore;

fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\spelling-drill")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/spelling-drill")
    }
}

pub fn get_db_path() -> PathBuf {
    get_data_dir().join("history.db")
}

pub fn open_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        log::warn!("Could not create {}: {}", parent.display(), e);
    }

    let conn = Connection::open(db_path)?;
    run_migrations(&conn)?;
    log::info!("Opened history database at {}", db_path.display());

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at INTEGER NOT NULL,
            list_name TEXT NOT NULL,
            score INTEGER NOT NULL,
            total INTEGER NOT NULL,
            missed_words TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_history_created ON history(created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_history_list ON history(list_name)",
        [],
    )?;

    Ok(())
}
