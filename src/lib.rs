pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod input;
pub mod logger;
pub mod models;
pub mod narration;
pub mod quiz;
pub mod ui;
pub mod utils;
pub mod word_source;

#[cfg(test)]
mod session_flow_tests;

// Re-exports for convenience
pub use config::AppConfig;
pub use db::SqliteHistoryStore;
pub use error::{ConfigError, HistoryError, NarrationError, QuizError, WordSourceError};
pub use history::{HistoryStore, MemoryHistoryStore};
pub use input::{
    QuizEffect, finish_session, handle_confirm_input, handle_menu_input, handle_quiz_input,
    handle_summary_input,
};
pub use models::{AppState, HistoryEntry, MenuState, QuizView, WordItem};
pub use narration::{NarrationRequest, Narrator, spawn_narration_worker};
pub use quiz::{
    Mode, ModePolicy, Outcome, Progress, QuizConfig, QuizSession, RetryScoring, Round,
    resolve_mode,
};
pub use ui::{draw_menu, draw_quit_confirmation, draw_quiz, draw_summary};
pub use word_source::{CsvWordSource, StaticWordSource, WordSource};
