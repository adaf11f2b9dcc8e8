use crate::quiz::{QuizConfig, QuizSession, normalize};
use serde::{Deserialize, Serialize};

/// One word to spell, plus the distractor spellings and syllable hints that
/// some lists carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub word: String,
    #[serde(default)]
    pub alternate_spellings: Vec<String>,
    #[serde(default)]
    pub syllable_hints: Vec<String>,
}

impl WordItem {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            alternate_spellings: Vec::new(),
            syllable_hints: Vec::new(),
        }
    }

    pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_spellings = alternates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_syllables<I, S>(mut self, syllables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.syllable_hints = syllables.into_iter().map(Into::into).collect();
        self
    }

    /// True when at least one alternate is a different spelling of the word.
    /// Blank alternates and ones that only differ by case don't count.
    pub fn has_alternates(&self) -> bool {
        let word = normalize(&self.word);
        self.alternate_spellings
            .iter()
            .map(|alt| normalize(alt))
            .any(|alt| !alt.is_empty() && alt != word)
    }
}

/// Summary of a finished session, as written to the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: u64,
    pub list_name: String,
    pub score: usize,
    pub total: usize,
    pub missed_words: Vec<String>,
}

impl HistoryEntry {
    pub fn missed_words_summary(&self) -> String {
        if self.missed_words.is_empty() {
            "none".to_string()
        } else {
            self.missed_words.join(", ")
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
    Summary,
}

/// Whether the finished session made it into the history store.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Pending,
    Saved,
    Failed(String),
}

/// Terminal-side state wrapped around one quiz session.
#[derive(Debug)]
pub struct QuizView {
    pub session: QuizSession,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub selected_choice: usize,
    pub status_message: Option<String>,
    pub save_status: SaveStatus,
}

impl QuizView {
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            input_buffer: String::new(),
            cursor_position: 0,
            selected_choice: 0,
            status_message: None,
            save_status: SaveStatus::Pending,
        }
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
        self.selected_choice = 0;
    }
}

pub const MENU_PANEL_LISTS: usize = 0;
pub const MENU_PANEL_HISTORY: usize = 1;

/// Main menu: word lists, recent history and quiz settings.
#[derive(Debug, Default)]
pub struct MenuState {
    pub list_names: Vec<String>,
    pub selected_list: usize,
    pub history: Vec<HistoryEntry>,
    pub selected_history: usize,
    pub focused_panel: usize,
    pub quiz_config: QuizConfig,
    pub status_message: Option<String>,
}

impl MenuState {
    pub fn new(list_names: Vec<String>, quiz_config: QuizConfig) -> Self {
        Self {
            list_names,
            quiz_config,
            ..Self::default()
        }
    }

    pub fn selected_list_name(&self) -> Option<&str> {
        self.list_names.get(self.selected_list).map(String::as_str)
    }

    pub fn set_history(&mut self, history: Vec<HistoryEntry>) {
        self.selected_history = self.selected_history.min(history.len().saturating_sub(1));
        self.history = history;
    }
}
