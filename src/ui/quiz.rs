use crate::models::QuizView;
use crate::quiz::{Mode, Outcome, Round};
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::display_width_before;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn key_span(label: &str) -> Span<'_> {
    Span::styled(
        label,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn prompt_text(view: &mut QuizView) -> Text<'static> {
    let mode = view.session.current_mode();
    let mut text = Text::default();

    text.push_line(Line::from(Span::styled(
        mode.label().to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(""));

    match mode {
        Mode::Text => {
            text.push_line(Line::from("Listen to the word and type its spelling."));
        }
        Mode::FillBlank => {
            let masked = view.session.masked().unwrap_or_default();
            let spaced: Vec<String> = masked.chars().map(|c| c.to_string()).collect();
            text.push_line(Line::from(Span::styled(
                spaced.join(" "),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(""));
            text.push_line(Line::from("Type the whole word."));
        }
        Mode::MultipleChoice => {
            let submitted = view.session.is_submitted();
            for (i, choice) in view.session.choices().iter().enumerate() {
                let style = if i == view.selected_choice && !submitted {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                text.push_line(Line::from(Span::styled(
                    format!(" {}. {} ", i + 1, choice),
                    style,
                )));
            }
        }
        Mode::None => {}
    }

    if let Some(item) = view.session.current_item()
        && !item.syllable_hints.is_empty()
    {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            format!("Syllables: {}", item.syllable_hints.len()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    text
}

fn answer_text(view: &QuizView) -> Text<'static> {
    let mut text = Text::default();
    if !view.session.is_submitted() {
        if view.session.mode() != Mode::MultipleChoice {
            text.push_line(Line::from(if view.input_buffer.is_empty() {
                "[Type your spelling here...]".to_string()
            } else {
                view.input_buffer.clone()
            }));
        }
        return text;
    }

    let word = view
        .session
        .current_item()
        .map(|item| item.word.clone())
        .unwrap_or_default();
    match view.session.last_outcome() {
        Some(Outcome::Correct) => {
            text.push_line(Line::from(Span::styled(
                format!("Correct! {}", word),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Some(Outcome::Incorrect) | None => {
            text.push_line(Line::from(Span::styled(
                "Not quite.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(format!("The spelling is: {}", word)));
            if !view.input_buffer.is_empty() {
                text.push_line(Line::from(format!("You wrote:       {}", view.input_buffer)));
            }
        }
    }
    text
}

pub fn draw_quiz(f: &mut Frame, view: &mut QuizView) {
    let layout = calculate_quiz_chunks(f.area());

    let session = &view.session;
    let round = match session.round() {
        Round::First => "Round 1".to_string(),
        Round::Second => "Round 2 (missed words)".to_string(),
    };
    let progress = format!(
        "{} - Word {} / {} ({} left) - Score {} - {}",
        round,
        (session.cursor() + 1).min(session.items().len()),
        session.items().len(),
        session.remaining(),
        session.score(),
        session.list_name()
    );

    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let prompt = Paragraph::new(prompt_text(view))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Word"));
    f.render_widget(prompt, layout.prompt_area);

    let submitted = view.session.is_submitted();
    let typing = !submitted && view.session.mode() != Mode::MultipleChoice;
    let answer_title = if submitted { "Result" } else { "Your Spelling" };
    let answer = Paragraph::new(answer_text(view))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(answer_title));
    f.render_widget(answer, layout.answer_area);

    if typing {
        let width = display_width_before(&view.input_buffer, view.cursor_position);
        let max_col = layout.answer_area.width.saturating_sub(3);
        let cursor_x = layout.answer_area.x + 1 + (width as u16).min(max_col);
        f.set_cursor_position((cursor_x, layout.answer_area.y + 1));
    }

    if let Some(message) = &view.status_message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(status, layout.status_area);
    }

    let mut basic_spans = Vec::new();
    if submitted {
        basic_spans.extend([key_span("Enter"), Span::from(" Next word  ")]);
    } else if view.session.mode() == Mode::MultipleChoice {
        basic_spans.extend([
            key_span("↑/↓"),
            Span::from(" Select  "),
            key_span("1-9/Enter"),
            Span::from(" Choose  "),
        ]);
    } else {
        basic_spans.extend([key_span("Enter"), Span::from(" Check  ")]);
    }
    basic_spans.extend([
        key_span("Tab"),
        Span::from(" Hear again  "),
        key_span("Esc"),
        Span::from(" Quit to Menu"),
    ]);

    let ctrl_spans = vec![
        key_span("Ctrl+R"),
        Span::from(" Restart test  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ];

    let help = Paragraph::new(vec![Line::from(basic_spans), Line::from(ctrl_spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Leave this test? Progress will not be saved.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue)  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
