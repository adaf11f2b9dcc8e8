//! Quiz session controller: walks a word list one item at a time, scores
//! answers and re-queues misses for a second round.

use crate::error::QuizError;
use crate::models::{HistoryEntry, WordItem};
use crate::narration::NarrationRequest;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// How the current word is asked. `None` until the item's mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    None,
    Text,
    MultipleChoice,
    FillBlank,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::None => "-",
            Mode::Text => "Spell it",
            Mode::MultipleChoice => "Pick the spelling",
            Mode::FillBlank => "Fill in the blanks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    First,
    Second,
}

impl Round {
    pub fn number(self) -> u8 {
        match self {
            Round::First => 1,
            Round::Second => 2,
        }
    }
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NextItem,
    RoundTwoStarted,
    Done,
}

/// How round-2 answers count toward the recorded score.
///
/// The live `score` is always per round and restarts at zero when round 2
/// begins. This only affects the score written to history:
///
/// | Variant           | Recorded score                          |
/// |-------------------|-----------------------------------------|
/// | `FirstAttempt`    | round-1 correct answers                 |
/// | `CountRecoveries` | round-1 correct + round-2 corrections   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryScoring {
    #[default]
    FirstAttempt,
    CountRecoveries,
}

impl RetryScoring {
    pub fn label(self) -> &'static str {
        match self {
            RetryScoring::FirstAttempt => "first attempt",
            RetryScoring::CountRecoveries => "count recoveries",
        }
    }

    pub fn next(self) -> Self {
        match self {
            RetryScoring::FirstAttempt => RetryScoring::CountRecoveries,
            RetryScoring::CountRecoveries => RetryScoring::FirstAttempt,
        }
    }
}

/// Relative weights for picking a mode for words that carry alternate
/// spellings. Words without alternates are always asked as `Text`.
///
/// The probability of a mode is its weight divided by the sum of all three.
/// The default table is uniform: 1/3 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub text: u32,
    pub multiple_choice: u32,
    pub fill_blank: u32,
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            text: 1,
            multiple_choice: 1,
            fill_blank: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub shuffle: bool,
    pub retry_scoring: RetryScoring,
    pub mode_policy: ModePolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            retry_scoring: RetryScoring::default(),
            mode_policy: ModePolicy::default(),
        }
    }
}

/// Case-insensitive, whitespace-trimmed form used for every comparison.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub fn resolve_mode<R: Rng + ?Sized>(item: &WordItem, policy: &ModePolicy, rng: &mut R) -> Mode {
    if !item.has_alternates() {
        return Mode::Text;
    }

    let text = u64::from(policy.text);
    let multiple_choice = u64::from(policy.multiple_choice);
    let total = text + multiple_choice + u64::from(policy.fill_blank);
    if total == 0 {
        return Mode::Text;
    }

    let roll = rng.gen_range(0..total);
    if roll < text {
        Mode::Text
    } else if roll < text + multiple_choice {
        Mode::MultipleChoice
    } else {
        Mode::FillBlank
    }
}

/// The word and its alternates, without case-insensitive duplicates, in
/// random order.
pub fn build_choices<R: Rng + ?Sized>(item: &WordItem, rng: &mut R) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut choices: Vec<String> = std::iter::once(&item.word)
        .chain(item.alternate_spellings.iter())
        .filter(|s| !s.trim().is_empty() && seen.insert(normalize(s)))
        .cloned()
        .collect();
    choices.shuffle(rng);
    choices
}

/// Hides a third of the letters (at least one) behind `_`. Non-letters stay.
pub fn mask_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let letters: Vec<usize> = word
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .collect();
    if letters.is_empty() {
        return word.to_string();
    }

    let hide = (letters.len() / 3).max(1);
    let hidden: HashSet<usize> = letters
        .into_iter()
        .choose_multiple(rng, hide)
        .into_iter()
        .collect();

    word.chars()
        .enumerate()
        .map(|(i, c)| if hidden.contains(&i) { '_' } else { c })
        .collect()
}

fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[derive(Debug)]
pub struct QuizSession {
    list_name: String,
    source_items: Vec<WordItem>,
    items: Vec<WordItem>,
    cursor: usize,
    score: usize,
    missed: Vec<WordItem>,
    still_missed: Vec<WordItem>,
    mode: Mode,
    choices: Vec<String>,
    masked: Option<String>,
    submitted: bool,
    last_outcome: Option<Outcome>,
    round: Round,
    first_round_score: usize,
    first_round_total: usize,
    done: bool,
    finalized: bool,
    config: QuizConfig,
    rng: StdRng,
}

impl QuizSession {
    /// Starts round 1 over `items`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyWordList` when `items` is empty.
    pub fn start(
        list_name: impl Into<String>,
        items: Vec<WordItem>,
        config: QuizConfig,
    ) -> Result<Self, QuizError> {
        Self::start_with_rng(list_name, items, config, StdRng::from_entropy())
    }

    /// Same as [`QuizSession::start`] with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyWordList` when `items` is empty.
    pub fn start_with_rng(
        list_name: impl Into<String>,
        items: Vec<WordItem>,
        config: QuizConfig,
        rng: StdRng,
    ) -> Result<Self, QuizError> {
        if items.is_empty() {
            return Err(QuizError::EmptyWordList);
        }

        let mut session = Self {
            list_name: list_name.into(),
            source_items: items,
            items: Vec::new(),
            cursor: 0,
            score: 0,
            missed: Vec::new(),
            still_missed: Vec::new(),
            mode: Mode::None,
            choices: Vec::new(),
            masked: None,
            submitted: false,
            last_outcome: None,
            round: Round::First,
            first_round_score: 0,
            first_round_total: 0,
            done: false,
            finalized: false,
            config,
            rng,
        };
        session.begin();
        log::info!(
            "Started session on '{}' with {} words (shuffle: {})",
            session.list_name,
            session.items.len(),
            session.config.shuffle
        );
        Ok(session)
    }

    fn begin(&mut self) {
        self.items = self.source_items.clone();
        if self.config.shuffle {
            self.items.shuffle(&mut self.rng);
        }
        self.cursor = 0;
        self.score = 0;
        self.missed.clear();
        self.still_missed.clear();
        self.round = Round::First;
        self.first_round_score = 0;
        self.first_round_total = self.items.len();
        self.done = false;
        self.finalized = false;
        self.clear_item_state();
    }

    fn clear_item_state(&mut self) {
        self.mode = Mode::None;
        self.choices.clear();
        self.masked = None;
        self.submitted = false;
        self.last_outcome = None;
    }

    /// Discards all progress and starts round 1 again over the original list.
    pub fn reset(&mut self) {
        self.begin();
        log::info!("Reset session on '{}'", self.list_name);
    }

    /// Resolves the current item's mode on first call and returns the same
    /// mode until the item is advanced past.
    pub fn current_mode(&mut self) -> Mode {
        if self.mode != Mode::None || self.done {
            return self.mode;
        }
        let Some(item) = self.items.get(self.cursor) else {
            return Mode::None;
        };

        let mode = resolve_mode(item, &self.config.mode_policy, &mut self.rng);
        match mode {
            Mode::MultipleChoice => self.choices = build_choices(item, &mut self.rng),
            Mode::FillBlank => self.masked = Some(mask_word(&item.word, &mut self.rng)),
            Mode::Text | Mode::None => {}
        }
        log::debug!("Resolved mode {:?} for word {}", mode, self.cursor + 1);
        self.mode = mode;
        mode
    }

    /// Scores `response` against the current word.
    ///
    /// A blank response counts as incorrect but changes nothing, so the user
    /// can try again.
    ///
    /// # Errors
    ///
    /// `SessionFinished` once the session is done, `InvalidModeTransition` if
    /// the current word was already answered.
    pub fn submit_answer(&mut self, response: &str) -> Result<Outcome, QuizError> {
        if self.done {
            return Err(QuizError::SessionFinished);
        }
        if self.submitted {
            return Err(QuizError::InvalidModeTransition);
        }
        if response.trim().is_empty() {
            return Ok(Outcome::Incorrect);
        }

        self.current_mode();
        let Some(item) = self.items.get(self.cursor) else {
            return Err(QuizError::SessionFinished);
        };

        let outcome = if normalize(response) == normalize(&item.word) {
            self.score += 1;
            Outcome::Correct
        } else {
            match self.round {
                Round::First => self.missed.push(item.clone()),
                Round::Second => self.still_missed.push(item.clone()),
            }
            Outcome::Incorrect
        };

        log::debug!(
            "Round {} word {}: {:?}",
            self.round.number(),
            self.cursor + 1,
            outcome
        );
        self.submitted = true;
        self.last_outcome = Some(outcome);
        Ok(outcome)
    }

    /// Submits the multiple-choice option at `index`.
    ///
    /// # Errors
    ///
    /// `InvalidChoice` when the current word isn't multiple choice or the
    /// index is out of range, plus everything `submit_answer` returns.
    pub fn select_choice(&mut self, index: usize) -> Result<Outcome, QuizError> {
        if self.done {
            return Err(QuizError::SessionFinished);
        }
        if self.current_mode() != Mode::MultipleChoice {
            return Err(QuizError::InvalidChoice(index));
        }
        let option = self
            .choices
            .get(index)
            .cloned()
            .ok_or(QuizError::InvalidChoice(index))?;
        self.submit_answer(&option)
    }

    /// Moves past the answered word. Starts round 2 over the missed words
    /// when round 1 runs out, or finishes the session.
    ///
    /// # Errors
    ///
    /// `SessionFinished` once done, `InvalidModeTransition` if the current
    /// word hasn't been answered.
    pub fn advance(&mut self) -> Result<Progress, QuizError> {
        if self.done {
            return Err(QuizError::SessionFinished);
        }
        if !self.submitted {
            return Err(QuizError::InvalidModeTransition);
        }

        self.cursor += 1;
        self.clear_item_state();
        if self.cursor < self.items.len() {
            return Ok(Progress::NextItem);
        }

        if self.round == Round::First && !self.missed.is_empty() {
            self.first_round_score = self.score;
            self.items = self.missed.clone();
            if self.config.shuffle {
                self.items.shuffle(&mut self.rng);
            }
            self.cursor = 0;
            self.score = 0;
            self.round = Round::Second;
            log::info!(
                "Round 1 on '{}' finished {}/{}, retrying {} missed words",
                self.list_name,
                self.first_round_score,
                self.first_round_total,
                self.items.len()
            );
            return Ok(Progress::RoundTwoStarted);
        }

        if self.round == Round::First {
            self.first_round_score = self.score;
        }
        self.done = true;
        log::info!(
            "Session on '{}' done with score {}/{}",
            self.list_name,
            self.final_score(),
            self.first_round_total
        );
        Ok(Progress::Done)
    }

    /// Builds the history record for a finished session. Only succeeds once.
    ///
    /// # Errors
    ///
    /// `NotFinished` before the session is done, `AlreadyFinalized` after the
    /// first successful call.
    pub fn finalize(&mut self) -> Result<HistoryEntry, QuizError> {
        if !self.done {
            return Err(QuizError::NotFinished);
        }
        if self.finalized {
            return Err(QuizError::AlreadyFinalized);
        }
        self.finalized = true;

        Ok(HistoryEntry {
            timestamp: now(),
            list_name: self.list_name.clone(),
            score: self.final_score(),
            total: self.first_round_total,
            missed_words: self.missed.iter().map(|item| item.word.clone()).collect(),
        })
    }

    /// Score as it will be recorded, according to the retry scoring option.
    pub fn final_score(&self) -> usize {
        let (first, recovered) = match self.round {
            Round::First => (self.score, 0),
            Round::Second => (self.first_round_score, self.score),
        };
        match self.config.retry_scoring {
            RetryScoring::FirstAttempt => first,
            RetryScoring::CountRecoveries => first + recovered,
        }
    }

    pub fn narration_request(&self) -> Option<NarrationRequest> {
        self.current_item().map(NarrationRequest::from)
    }

    pub fn current_item(&self) -> Option<&WordItem> {
        if self.done {
            None
        } else {
            self.items.get(self.cursor)
        }
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    pub fn items(&self) -> &[WordItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Words answered so far in the current round.
    pub fn processed(&self) -> usize {
        self.cursor + usize::from(self.submitted)
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    pub fn missed(&self) -> &[WordItem] {
        &self.missed
    }

    pub fn still_missed(&self) -> &[WordItem] {
        &self.still_missed
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn masked(&self) -> Option<&str> {
        self.masked.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn first_round_score(&self) -> usize {
        if self.round == Round::First {
            self.score
        } else {
            self.first_round_score
        }
    }

    pub fn first_round_total(&self) -> usize {
        self.first_round_total
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }
}
