use crate::models::{QuizView, SaveStatus};
use crate::quiz::{RetryScoring, Round};
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_summary(f: &mut Frame, view: &QuizView) {
    let layout = calculate_summary_chunks(f.area());
    let session = &view.session;

    let title_text = format!("Test Results - {}", session.list_name());
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let mut summary_text = Text::default();
    summary_text.push_line(Line::from(Span::styled(
        format!(
            "Score: {} / {}",
            session.final_score(),
            session.first_round_total()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if session.config().retry_scoring == RetryScoring::CountRecoveries {
        summary_text.push_line(Line::from(format!(
            "First attempt: {} / {}",
            session.first_round_score(),
            session.first_round_total()
        )));
    }
    summary_text.push_line(Line::from(""));

    if session.missed().is_empty() {
        summary_text.push_line(Line::from(Span::styled(
            "Every word spelled correctly!",
            Style::default().fg(Color::Green),
        )));
    } else {
        summary_text.push_line(Line::from("Missed in round 1:"));
        for item in session.missed() {
            let still_missed = session.still_missed().iter().any(|m| m.word == item.word);
            let (mark, color) = if still_missed {
                ("[ ]", Color::Red)
            } else {
                ("[x]", Color::Green)
            };
            summary_text.push_line(Line::from(Span::styled(
                format!("{} {}", mark, truncate_string(&item.word, 60)),
                Style::default().fg(color),
            )));
        }
        if session.round() == Round::Second {
            summary_text.push_line(Line::from(""));
            summary_text.push_line(Line::from(format!(
                "Fixed in round 2: {} / {}",
                session.missed().len() - session.still_missed().len(),
                session.missed().len()
            )));
        }
    }

    summary_text.push_line(Line::from(""));
    let (save_text, save_color) = match &view.save_status {
        SaveStatus::Saved => ("Saved to history".to_string(), Color::DarkGray),
        SaveStatus::Pending => ("Not saved yet".to_string(), Color::DarkGray),
        SaveStatus::Failed(e) => (format!("History not saved: {}", e), Color::Red),
    };
    summary_text.push_line(Line::from(Span::styled(
        save_text,
        Style::default().fg(save_color),
    )));

    let summary = Paragraph::new(summary_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, layout.content_area);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![Line::from(vec![
        Span::styled("n", key_style),
        Span::from(" New Test  "),
        Span::styled("m", key_style),
        Span::from(" Main Menu  "),
        Span::styled("Esc", key_style),
        Span::from(" Quit  "),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordItem;
    use crate::quiz::{QuizConfig, QuizSession};
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_draw_summary_after_retry() {
        let config = QuizConfig {
            shuffle: false,
            ..QuizConfig::default()
        };
        let items = vec![WordItem::new("cat"), WordItem::new("giraffe")];
        let mut view = QuizView::new(QuizSession::start("animals", items, config).unwrap());
        view.session.submit_answer("cat").unwrap();
        view.session.advance().unwrap();
        view.session.submit_answer("jiraf").unwrap();
        view.session.advance().unwrap();
        view.session.submit_answer("giraffe").unwrap();
        view.session.advance().unwrap();
        view.save_status = SaveStatus::Failed("disk full".to_string());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_summary(f, &view)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(content.contains("Test Results - animals"));
        assert!(content.contains("Score: 1 / 2"));
        assert!(content.contains("[x] giraffe"));
        assert!(content.contains("Fixed in round 2: 1 / 1"));
        assert!(content.contains("History not saved: disk full"));
    }
}
