use crate::error::ConfigError;
use crate::quiz::{QuizConfig, RetryScoring};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

pub const WORDS_DIR_VAR: &str = "SPELLING_DRILL_WORDS_DIR";
pub const DB_PATH_VAR: &str = "SPELLING_DRILL_DB";
pub const TTS_VAR: &str = "SPELLING_DRILL_TTS";
pub const SHUFFLE_VAR: &str = "SPELLING_DRILL_SHUFFLE";
pub const RETRY_SCORING_VAR: &str = "SPELLING_DRILL_RETRY_SCORING";
pub const LOG_LEVEL_VAR: &str = "SPELLING_DRILL_LOG";
pub const LOG_FILE_VAR: &str = "SPELLING_DRILL_LOG_FILE";

pub const DEFAULT_WORDS_DIR: &str = "wordlists";
pub const DEFAULT_LOG_FILE: &str = "spelling-drill.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub words_dir: PathBuf,
    pub db_path: PathBuf,
    pub tts_command: Option<String>,
    pub quiz: QuizConfig,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let shuffle = match get(SHUFFLE_VAR) {
            Some(value) => parse_bool(SHUFFLE_VAR, &value)?,
            None => true,
        };
        let retry_scoring = match get(RETRY_SCORING_VAR) {
            Some(value) => parse_retry_scoring(&value)?,
            None => RetryScoring::default(),
        };
        let log_level = match get(LOG_LEVEL_VAR) {
            Some(value) => LevelFilter::from_str(value.trim()).map_err(|_| {
                ConfigError::InvalidValue {
                    key: LOG_LEVEL_VAR,
                    value,
                }
            })?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            words_dir: get(WORDS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_DIR)),
            db_path: get(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(crate::db::get_db_path),
            tts_command: get(TTS_VAR),
            quiz: QuizConfig {
                shuffle,
                retry_scoring,
                ..QuizConfig::default()
            },
            log_level,
            log_file: get(LOG_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_retry_scoring(value: &str) -> Result<RetryScoring, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "first-attempt" | "reset" => Ok(RetryScoring::FirstAttempt),
        "count-recoveries" | "keep" => Ok(RetryScoring::CountRecoveries),
        _ => Err(ConfigError::InvalidValue {
            key: RETRY_SCORING_VAR,
            value: value.to_string(),
        }),
    }
}
