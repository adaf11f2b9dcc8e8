use std::time::{Duration, UNIX_EPOCH};
use unicode_width::UnicodeWidthChar;

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn format_session_date(timestamp: u64) -> String {
    let session_time = UNIX_EPOCH + Duration::from_secs(timestamp);
    let datetime: chrono::DateTime<chrono::Local> = session_time.into();

    let today = chrono::Local::now().date_naive();
    let session_date = datetime.date_naive();

    if session_date == today {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if session_date == today - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

/// Byte offset of the `char_index`-th character, or the end of the string.
pub fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len())
}

/// Terminal columns taken by the first `char_index` characters of `s`.
pub fn display_width_before(s: &str, char_index: usize) -> usize {
    s.chars()
        .take(char_index)
        .map(|ch| ch.width().unwrap_or(1))
        .sum()
}
