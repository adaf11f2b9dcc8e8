use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub prompt_area: Rect,
    pub answer_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        prompt_area: chunks[1],
        answer_area: chunks[2],
        status_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}
