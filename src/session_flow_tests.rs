use crate::db::SqliteHistoryStore;
use crate::error::HistoryError;
use crate::history::HistoryStore;
use crate::input::{
    QuizEffect, SummaryAction, finish_session, handle_quiz_input, handle_summary_input,
    restart_view,
};
use crate::models::{AppState, HistoryEntry, QuizView, SaveStatus};
use crate::quiz::{Mode, QuizConfig, QuizSession, RetryScoring, Round};
use crate::word_source::{CsvWordSource, WordSource};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs;

fn press(view: &mut QuizView, code: KeyCode, app_state: &mut AppState) -> QuizEffect {
    handle_quiz_input(view, KeyEvent::new(code, KeyModifiers::empty()), app_state)
}

/// Answers the current word with `text` and moves on. Multiple-choice words
/// pick the listed choice that matches `text`.
fn answer(view: &mut QuizView, text: &str, app_state: &mut AppState) -> QuizEffect {
    if view.session.current_mode() == Mode::MultipleChoice {
        let index = view
            .session
            .choices()
            .iter()
            .position(|c| c == text)
            .unwrap();
        let digit = char::from_digit(index as u32 + 1, 10).unwrap();
        press(view, KeyCode::Char(digit), app_state);
    } else {
        for c in text.chars() {
            press(view, KeyCode::Char(c), app_state);
        }
        press(view, KeyCode::Enter, app_state);
    }
    press(view, KeyCode::Enter, app_state)
}

fn write_list(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(format!("{name}.csv")), content).unwrap();
}

fn load_view(source: &CsvWordSource, list: &str, retry_scoring: RetryScoring) -> QuizView {
    let items = source.load(list).unwrap();
    let config = QuizConfig {
        shuffle: false,
        retry_scoring,
        ..QuizConfig::default()
    };
    QuizView::new(QuizSession::start(list, items, config).unwrap())
}

#[test]
fn test_two_round_session_is_saved_to_sqlite() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_list(temp_dir.path(), "animals", "word\ncat\ngiraffe\ndog\n");
    let source = CsvWordSource::new(temp_dir.path());
    let mut store = SqliteHistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    let mut view = load_view(&source, "animals", RetryScoring::FirstAttempt);
    let app_state = &mut AppState::Quiz;

    answer(&mut view, "cat", app_state);
    answer(&mut view, "jiraf", app_state);
    let effect = answer(&mut view, "dog", app_state);
    assert!(matches!(effect, QuizEffect::Speak(_)));
    assert_eq!(view.session.round(), Round::Second);
    assert_eq!(view.session.items().len(), 1);
    assert_eq!(view.session.score(), 0);

    let effect = answer(&mut view, "Giraffe ", app_state);
    assert_eq!(effect, QuizEffect::Finished);
    assert_eq!(*app_state, AppState::Summary);
    assert!(view.session.still_missed().is_empty());

    let entry = finish_session(&mut view, &mut store).unwrap();
    assert_eq!(entry.score, 2);
    assert_eq!(entry.total, 3);
    assert_eq!(entry.missed_words, vec!["giraffe"]);
    assert_eq!(view.save_status, SaveStatus::Saved);

    let history = store.read_recent(10).unwrap();
    assert_eq!(history, vec![entry]);
}

#[test]
fn test_recoveries_count_toward_recorded_score() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_list(temp_dir.path(), "tricky", "their,thier|theyr\nnecessary\nrhythm\n");
    let source = CsvWordSource::new(temp_dir.path());
    let mut store = SqliteHistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    let mut view = load_view(&source, "tricky", RetryScoring::CountRecoveries);
    let app_state = &mut AppState::Quiz;

    answer(&mut view, "thier", app_state);
    answer(&mut view, "neccessary", app_state);
    answer(&mut view, "rhythm", app_state);

    assert_eq!(view.session.round(), Round::Second);
    assert_eq!(view.session.first_round_score(), 1);

    assert_eq!(view.session.current_item().unwrap().word, "their");
    answer(&mut view, "their", app_state);
    let effect = answer(&mut view, "necesary", app_state);
    assert_eq!(effect, QuizEffect::Finished);

    let entry = finish_session(&mut view, &mut store).unwrap();
    assert_eq!(entry.score, 2);
    assert_eq!(entry.total, 3);
    assert_eq!(entry.missed_words, vec!["their", "necessary"]);
    assert_eq!(view.session.still_missed().len(), 1);
}

#[test]
fn test_restart_from_summary_runs_again_and_appends() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_list(temp_dir.path(), "short", "cat\n");
    let source = CsvWordSource::new(temp_dir.path());
    let mut store = SqliteHistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    let mut view = load_view(&source, "short", RetryScoring::FirstAttempt);
    let app_state = &mut AppState::Quiz;
    answer(&mut view, "cat", app_state);
    finish_session(&mut view, &mut store).unwrap();
    assert!(finish_session(&mut view, &mut store).is_err());

    let restart = handle_summary_input(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::empty()));
    assert_eq!(restart, SummaryAction::Restart);
    let effect = restart_view(&mut view, app_state);
    assert!(matches!(effect, QuizEffect::Speak(_)));
    assert_eq!(*app_state, AppState::Quiz);
    assert_eq!(view.save_status, SaveStatus::Pending);

    answer(&mut view, "kat", app_state);
    assert_eq!(view.session.round(), Round::Second);
    answer(&mut view, "kat", app_state);
    let entry = finish_session(&mut view, &mut store).unwrap();
    assert_eq!(entry.score, 0);
    assert_eq!(view.session.still_missed().len(), 1);

    let history = store.read_recent(10).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], entry);
}

struct BrokenStore;

impl HistoryStore for BrokenStore {
    fn append(&mut self, _entry: &HistoryEntry) -> Result<(), HistoryError> {
        Err(HistoryError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    fn read_recent(&self, _limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_failed_history_write_keeps_summary_usable() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_list(temp_dir.path(), "short", "cat\n");
    let source = CsvWordSource::new(temp_dir.path());
    let mut store = BrokenStore;

    let mut view = load_view(&source, "short", RetryScoring::FirstAttempt);
    let app_state = &mut AppState::Quiz;
    answer(&mut view, "cat", app_state);
    assert!(finish_session(&mut view, &mut store).is_err());
    assert!(matches!(view.save_status, SaveStatus::Failed(_)));
    assert_eq!(view.session.final_score(), 1);
    assert_eq!(*app_state, AppState::Summary);
}
