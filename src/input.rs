use crate::error::QuizError;
use crate::history::HistoryStore;
use crate::models::{
    AppState, HistoryEntry, MENU_PANEL_HISTORY, MENU_PANEL_LISTS, MenuState, QuizView, SaveStatus,
};
use crate::narration::NarrationRequest;
use crate::quiz::{Mode, Progress};
use crate::utils::byte_offset;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the event loop should do after a quiz key press.
#[derive(Debug, PartialEq)]
pub enum QuizEffect {
    None,
    Speak(NarrationRequest),
    Finished,
}

#[derive(Debug, PartialEq)]
pub enum MenuAction {
    None,
    Start(String),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum SummaryAction {
    None,
    Restart,
    Menu,
    Quit,
}

pub fn handle_menu_input(menu: &mut MenuState, key: KeyEvent) -> MenuAction {
    match key.code {
        KeyCode::Char('1') => menu.focused_panel = MENU_PANEL_LISTS,
        KeyCode::Char('2') => menu.focused_panel = MENU_PANEL_HISTORY,
        KeyCode::Up => {
            if menu.focused_panel == MENU_PANEL_LISTS {
                menu.selected_list = menu.selected_list.saturating_sub(1);
            } else {
                menu.selected_history = menu.selected_history.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if menu.focused_panel == MENU_PANEL_LISTS {
                if menu.selected_list < menu.list_names.len().saturating_sub(1) {
                    menu.selected_list += 1;
                }
            } else if menu.selected_history < menu.history.len().saturating_sub(1) {
                menu.selected_history += 1;
            }
        }
        KeyCode::Char('s') => {
            menu.quiz_config.shuffle = !menu.quiz_config.shuffle;
        }
        KeyCode::Char('r') => {
            menu.quiz_config.retry_scoring = menu.quiz_config.retry_scoring.next();
        }
        KeyCode::Enter => {
            if menu.focused_panel == MENU_PANEL_LISTS
                && let Some(name) = menu.selected_list_name()
            {
                return MenuAction::Start(name.to_string());
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => return MenuAction::Quit,
        _ => {}
    }
    MenuAction::None
}

pub fn handle_quiz_input(
    view: &mut QuizView,
    key: KeyEvent,
    app_state: &mut AppState,
) -> QuizEffect {
    if key.code == KeyCode::Esc {
        *app_state = AppState::QuizQuitConfirm;
        return QuizEffect::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            view.session.reset();
            view.clear_input();
            view.save_status = SaveStatus::Pending;
            view.status_message = Some("Test restarted".to_string());
            return speak_current(view);
        }
        return QuizEffect::None;
    }
    if key.code == KeyCode::Tab {
        return speak_current(view);
    }

    if view.session.is_submitted() {
        if key.code == KeyCode::Enter {
            return advance(view, app_state);
        }
        return QuizEffect::None;
    }

    match view.session.current_mode() {
        Mode::MultipleChoice => handle_choice_key(view, key),
        Mode::Text | Mode::FillBlank => handle_typing_key(view, key),
        Mode::None => {}
    }
    QuizEffect::None
}

fn handle_choice_key(view: &mut QuizView, key: KeyEvent) {
    let count = view.session.choices().len();
    match key.code {
        KeyCode::Up => view.selected_choice = view.selected_choice.saturating_sub(1),
        KeyCode::Down => {
            if view.selected_choice < count.saturating_sub(1) {
                view.selected_choice += 1;
            }
        }
        KeyCode::Enter => {
            let index = view.selected_choice;
            submit_choice(view, index);
        }
        KeyCode::Char(c) => {
            if let Some(digit) = c.to_digit(10)
                && digit >= 1
            {
                let index = digit as usize - 1;
                if index < count {
                    view.selected_choice = index;
                }
                submit_choice(view, index);
            }
        }
        _ => {}
    }
}

fn submit_choice(view: &mut QuizView, index: usize) {
    match view.session.select_choice(index) {
        Ok(_) => view.status_message = None,
        Err(e) => view.status_message = Some(e.to_string()),
    }
}

fn handle_typing_key(view: &mut QuizView, key: KeyEvent) {
    let len = view.input_buffer.chars().count();
    match key.code {
        KeyCode::Enter => {
            if view.input_buffer.trim().is_empty() {
                view.status_message = Some("Type a spelling first".to_string());
                return;
            }
            match view.session.submit_answer(&view.input_buffer) {
                Ok(_) => view.status_message = None,
                Err(e) => view.status_message = Some(e.to_string()),
            }
        }
        KeyCode::Left => {
            view.cursor_position = view.cursor_position.saturating_sub(1).min(len);
        }
        KeyCode::Right => {
            if view.cursor_position < len {
                view.cursor_position += 1;
            }
        }
        KeyCode::Home => view.cursor_position = 0,
        KeyCode::End => view.cursor_position = len,
        KeyCode::Backspace => {
            if view.cursor_position > 0 {
                let offset = byte_offset(&view.input_buffer, view.cursor_position - 1);
                view.input_buffer.remove(offset);
                view.cursor_position -= 1;
            }
        }
        KeyCode::Char(c) => {
            let offset = byte_offset(&view.input_buffer, view.cursor_position);
            view.input_buffer.insert(offset, c);
            view.cursor_position += 1;
        }
        _ => {}
    }
}

fn advance(view: &mut QuizView, app_state: &mut AppState) -> QuizEffect {
    match view.session.advance() {
        Ok(Progress::NextItem) => {
            view.clear_input();
            view.status_message = None;
            speak_current(view)
        }
        Ok(Progress::RoundTwoStarted) => {
            view.clear_input();
            view.status_message = Some(format!(
                "Round 2: let's retry the {} missed word(s)",
                view.session.items().len()
            ));
            speak_current(view)
        }
        Ok(Progress::Done) => {
            view.clear_input();
            *app_state = AppState::Summary;
            QuizEffect::Finished
        }
        Err(e) => {
            view.status_message = Some(e.to_string());
            QuizEffect::None
        }
    }
}

fn speak_current(view: &QuizView) -> QuizEffect {
    match view.session.narration_request() {
        Some(request) => QuizEffect::Speak(request),
        None => QuizEffect::None,
    }
}

/// Finalizes a finished session and appends it to `store`. A failed write
/// is recorded on the view; the session itself stays usable.
pub fn finish_session(
    view: &mut QuizView,
    store: &mut dyn HistoryStore,
) -> Result<HistoryEntry, QuizError> {
    let entry = view.session.finalize()?;
    match store.append(&entry) {
        Ok(()) => {
            view.save_status = SaveStatus::Saved;
            Ok(entry)
        }
        Err(e) => {
            let error = QuizError::from(e);
            log::error!("Failed to save history for '{}': {}", entry.list_name, error);
            view.save_status = SaveStatus::Failed(error.to_string());
            Err(error)
        }
    }
}

pub fn handle_confirm_input(key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => *app_state = AppState::Menu,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => *app_state = AppState::Quiz,
        _ => {}
    }
}

pub fn handle_summary_input(key: KeyEvent) -> SummaryAction {
    match key.code {
        KeyCode::Char('n') => SummaryAction::Restart,
        KeyCode::Char('m') => SummaryAction::Menu,
        KeyCode::Esc | KeyCode::Char('q') => SummaryAction::Quit,
        _ => SummaryAction::None,
    }
}

/// Starts the same list again from the summary screen.
pub fn restart_view(view: &mut QuizView, app_state: &mut AppState) -> QuizEffect {
    view.session.reset();
    view.clear_input();
    view.status_message = None;
    view.save_status = SaveStatus::Pending;
    *app_state = AppState::Quiz;
    speak_current(view)
}
