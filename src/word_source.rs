use crate::error::WordSourceError;
use crate::models::WordItem;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const ALTERNATE_SEPARATOR: char = '|';
const SYLLABLE_SEPARATOR: char = '-';

/// Somewhere word lists come from.
pub trait WordSource {
    fn list_names(&self) -> Vec<String>;
    fn load(&self, list_name: &str) -> Result<Vec<WordItem>, WordSourceError>;
}

/// A directory of `*.csv` files, one word list per file.
///
/// Each line is `word[,alternates[,syllables]]`, with alternates separated by
/// `|` and syllables by `-`. Blank lines, `#` comments and a leading `word`
/// header are skipped.
#[derive(Debug, Clone)]
pub struct CsvWordSource {
    dir: PathBuf,
}

impl CsvWordSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn csv_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if self.dir.is_dir()
            && let Ok(entries) = fs::read_dir(&self.dir)
        {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "csv") {
                    files.push(path);
                }
            }
        }

        files.sort();
        files
    }
}

impl WordSource for CsvWordSource {
    fn list_names(&self) -> Vec<String> {
        self.csv_files()
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .collect()
    }

    fn load(&self, list_name: &str) -> Result<Vec<WordItem>, WordSourceError> {
        let path = self.dir.join(format!("{list_name}.csv"));
        if !path.is_file() {
            return Err(WordSourceError::UnknownList(list_name.to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|source| WordSourceError::Io {
            path: path.clone(),
            source,
        })?;
        let items = parse_word_list(&content);
        log::info!("Loaded {} words from {}", items.len(), path.display());
        Ok(items)
    }
}

/// Word lists held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticWordSource {
    lists: BTreeMap<String, Vec<WordItem>>,
}

impl StaticWordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, name: impl Into<String>, items: Vec<WordItem>) -> Self {
        self.lists.insert(name.into(), items);
        self
    }

    /// A small list so the app has something to quiz on first run.
    pub fn starter() -> Self {
        Self::new().with_list(
            "starter",
            vec![
                WordItem::new("because").with_alternates(["becuase", "becaus"]),
                WordItem::new("friend").with_alternates(["freind", "frend"]),
                WordItem::new("necessary")
                    .with_alternates(["neccessary", "necesary"])
                    .with_syllables(["nec", "es", "sar", "y"]),
                WordItem::new("rhythm").with_alternates(["rythm", "rhythem"]),
                WordItem::new("separate")
                    .with_alternates(["seperate", "separete"])
                    .with_syllables(["sep", "a", "rate"]),
                WordItem::new("beautiful").with_syllables(["beau", "ti", "ful"]),
                WordItem::new("library").with_syllables(["li", "brar", "y"]),
                WordItem::new("island"),
            ],
        )
    }
}

impl WordSource for StaticWordSource {
    fn list_names(&self) -> Vec<String> {
        self.lists.keys().cloned().collect()
    }

    fn load(&self, list_name: &str) -> Result<Vec<WordItem>, WordSourceError> {
        self.lists
            .get(list_name)
            .cloned()
            .ok_or_else(|| WordSourceError::UnknownList(list_name.to_string()))
    }
}

pub fn parse_word_list(content: &str) -> Vec<WordItem> {
    let mut items = Vec::new();
    let mut first_row = true;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let is_header = first_row;
        first_row = false;
        if let Some(item) = parse_word_line(trimmed) {
            if is_header && item.word.eq_ignore_ascii_case("word") {
                continue;
            }
            items.push(item);
        }
    }

    items
}

pub fn parse_word_line(line: &str) -> Option<WordItem> {
    let fields = parse_csv_fields(line);
    let word = fields.first()?.trim();
    if word.is_empty() {
        return None;
    }

    let split = |index: usize, separator: char| -> Vec<String> {
        fields
            .get(index)
            .map(|field| {
                field
                    .split(separator)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    Some(
        WordItem::new(word)
            .with_alternates(split(1, ALTERNATE_SEPARATOR))
            .with_syllables(split(2, SYLLABLE_SEPARATOR)),
    )
}

/// Splits one CSV line into fields. Quoted fields may contain commas and
/// `""` escapes.
pub fn parse_csv_fields(line: &str) -> Vec<String> {
    let mut chars = line.chars().peekable();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => {
                current.push(c);
            }
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_simple() {
        assert_eq!(parse_csv_fields("cat,kat"), vec!["cat", "kat"]);
    }

    #[test]
    fn test_parse_csv_with_quotes() {
        assert_eq!(
            parse_csv_fields("\"o'clock\",\"oclock|o clock\""),
            vec!["o'clock", "oclock|o clock"]
        );
    }

    #[test]
    fn test_parse_csv_with_commas_in_field() {
        assert_eq!(
            parse_csv_fields("\"well, actually\",x,y"),
            vec!["well, actually", "x", "y"]
        );
    }

    #[test]
    fn test_parse_csv_with_escaped_quotes() {
        assert_eq!(
            parse_csv_fields("\"say \"\"cheese\"\"\",b"),
            vec!["say \"cheese\"", "b"]
        );
    }

    #[test]
    fn test_parse_csv_empty_fields() {
        assert_eq!(parse_csv_fields(","), vec!["", ""]);
        assert_eq!(parse_csv_fields(""), vec![""]);
    }

    #[test]
    fn test_parse_word_line_all_fields() {
        let item = parse_word_line("necessary,neccessary|necesary,nec-es-sar-y").unwrap();
        assert_eq!(item.word, "necessary");
        assert_eq!(item.alternate_spellings, vec!["neccessary", "necesary"]);
        assert_eq!(item.syllable_hints, vec!["nec", "es", "sar", "y"]);
    }

    #[test]
    fn test_parse_word_line_only_word() {
        let item = parse_word_line("  island ").unwrap();
        assert_eq!(item, WordItem::new("island"));
    }

    #[test]
    fn test_parse_word_line_blank_alternates() {
        let item = parse_word_line("rhythm,,rhy-thm").unwrap();
        assert!(item.alternate_spellings.is_empty());
        assert_eq!(item.syllable_hints, vec!["rhy", "thm"]);
    }

    #[test]
    fn test_parse_word_line_rejects_empty_word() {
        assert!(parse_word_line(",alt").is_none());
    }

    #[test]
    fn test_parse_word_list_skips_header_comments_and_blanks() {
        let content = "word,alternates,syllables\n# animals\n\ncat\n\ndog,dgo\n";
        let items = parse_word_list(content);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].word, "cat");
        assert_eq!(items[1].alternate_spellings, vec!["dgo"]);
    }

    #[test]
    fn test_parse_word_list_header_after_comment() {
        let items = parse_word_list("# tricky words\nWord\nword\n");
        assert_eq!(items, vec![WordItem::new("word")]);
    }

    #[test]
    fn test_csv_source_lists_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("birds.csv"), "owl\nheron,herron\n").unwrap();
        fs::write(dir.path().join("animals.csv"), "cat\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = CsvWordSource::new(dir.path());
        assert_eq!(source.list_names(), vec!["animals", "birds"]);

        let birds = source.load("birds").unwrap();
        assert_eq!(birds.len(), 2);
        assert_eq!(birds[1].alternate_spellings, vec!["herron"]);
    }

    #[test]
    fn test_csv_source_unknown_list() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvWordSource::new(dir.path());
        assert!(matches!(
            source.load("missing"),
            Err(WordSourceError::UnknownList(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_csv_source_missing_dir_has_no_lists() {
        let source = CsvWordSource::new("/definitely/not/a/real/dir");
        assert!(source.list_names().is_empty());
    }

    #[test]
    fn test_static_source() {
        let source = StaticWordSource::starter();
        assert_eq!(source.list_names(), vec!["starter"]);
        assert!(!source.load("starter").unwrap().is_empty());
        assert!(source.load("other").is_err());
    }
}
