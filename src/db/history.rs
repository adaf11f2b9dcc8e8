use crate::error::HistoryError;
use crate::history::HistoryStore;
use crate::models::HistoryEntry;
use rusqlite::Connection;
use std::path::Path;

/// History kept in a SQLite table, one row per finished session.
#[derive(Debug)]
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    pub fn open(db_path: &Path) -> Result<Self, HistoryError> {
        Ok(Self {
            conn: super::open_db(db_path)?,
        })
    }

    pub fn from_connection(conn: Connection) -> Result<Self, HistoryError> {
        super::run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        let missed_json = serde_json::to_string(&entry.missed_words)?;
        self.conn.execute(
            "INSERT INTO history (created_at, list_name, score, total, missed_words)
             VALUES (?, ?, ?, ?, ?)",
            rusqlite::params![
                entry.timestamp,
                entry.list_name,
                entry.score,
                entry.total,
                missed_json
            ],
        )?;
        log::info!(
            "Saved history for '{}': {}/{}",
            entry.list_name,
            entry.score,
            entry.total
        );
        Ok(())
    }

    fn read_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT created_at, list_name, score, total, missed_words
             FROM history ORDER BY created_at DESC, id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit], |row| {
            let missed_json: String = row.get(4)?;
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, usize>(2)?,
                row.get::<_, usize>(3)?,
                missed_json,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (timestamp, list_name, score, total, missed_json) = row?;
            entries.push(HistoryEntry {
                timestamp,
                list_name,
                score,
                total,
                missed_words: serde_json::from_str(&missed_json)?,
            });
        }

        Ok(entries)
    }
}
