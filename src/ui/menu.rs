use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::models::{HistoryEntry, MENU_PANEL_HISTORY, MENU_PANEL_LISTS, MenuState};
use crate::utils::{format_session_date, truncate_string};

fn format_history_item(entry: &HistoryEntry) -> String {
    let date = format_session_date(entry.timestamp);
    let missed = if entry.missed_words.is_empty() {
        "perfect".to_string()
    } else {
        format!("missed: {}", truncate_string(&entry.missed_words_summary(), 40))
    };
    format!(
        "{} - {} ({}/{}, {})",
        date, entry.list_name, entry.score, entry.total, missed
    )
}

fn draw_panel_header(area: Rect, title: &str, focused: bool, f: &mut Frame) {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let header = Paragraph::new(title)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default());

    f.render_widget(header, area);
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn empty_item(message: &str) -> ListItem<'_> {
    ListItem::new(message).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub fn draw_menu(f: &mut Frame, menu: &MenuState, narration_enabled: bool) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    let title = Paragraph::new("Spelling Drill v0.1.0")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let lists_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[1]);

    let history_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[2]);

    let lists_focused = menu.focused_panel == MENU_PANEL_LISTS;
    let history_focused = menu.focused_panel == MENU_PANEL_HISTORY;

    draw_panel_header(lists_chunks[0], "[1] Word Lists", lists_focused, f);

    let list_items: Vec<ListItem> = if menu.list_names.is_empty() {
        vec![empty_item("No word lists found")]
    } else {
        menu.list_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ListItem::new(name.as_str())
                    .style(selected_style(i == menu.selected_list && lists_focused))
            })
            .collect()
    };

    let word_lists = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(lists_focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(word_lists, lists_chunks[1]);

    draw_panel_header(history_chunks[0], "[2] History", history_focused, f);

    let history_items: Vec<ListItem> = if menu.history.is_empty() {
        vec![empty_item("No finished tests yet")]
    } else {
        menu.history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                ListItem::new(format_history_item(entry))
                    .style(selected_style(i == menu.selected_history && history_focused))
            })
            .collect()
    };

    let history = List::new(history_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(history_focused)),
    );
    f.render_widget(history, history_chunks[1]);

    if let Some(message) = &menu.status_message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[3]);
    }

    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[4]);

    let settings_content = vec![
        Line::from(format!(
            "Shuffle: {}  Retry score: {}",
            if menu.quiz_config.shuffle { "on" } else { "off" },
            menu.quiz_config.retry_scoring.label()
        )),
        Line::from(if narration_enabled {
            "Narration: on"
        } else {
            "Narration: off (set SPELLING_DRILL_TTS)"
        }),
    ];
    let settings = Paragraph::new(settings_content)
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Settings"));
    f.render_widget(settings, footer_chunks[0]);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![
            Span::styled("1/2", key_style),
            Span::from(" Focus Panel  "),
            Span::styled("↑/↓", key_style),
            Span::from(" Navigate  "),
            Span::styled("Enter", key_style),
            Span::from(" Start Test"),
        ]),
        Line::from(vec![
            Span::styled("s", key_style),
            Span::from(" Shuffle  "),
            Span::styled("r", key_style),
            Span::from(" Retry Scoring  "),
            Span::styled("Esc/Ctrl+C", key_style),
            Span::from(" Quit"),
        ]),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, footer_chunks[1]);
}
