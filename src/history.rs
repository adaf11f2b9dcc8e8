use crate::error::HistoryError;
use crate::models::HistoryEntry;

/// Append-only record of finished sessions.
pub trait HistoryStore {
    fn append(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError>;

    /// Up to `limit` entries, newest first.
    fn read_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError>;
}

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn read_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.iter().rev().take(limit).cloned().collect())
    }
}
