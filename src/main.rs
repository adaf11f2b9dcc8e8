use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

use spelling_drill::config::AppConfig;
use spelling_drill::db::SqliteHistoryStore;
use spelling_drill::history::{HistoryStore, MemoryHistoryStore};
use spelling_drill::input::{
    MenuAction, QuizEffect, SummaryAction, finish_session, handle_confirm_input,
    handle_menu_input, handle_quiz_input, handle_summary_input, restart_view,
};
use spelling_drill::logger;
use spelling_drill::models::{AppState, MenuState, QuizView};
use spelling_drill::narration::{NarrationHandle, narrator_for, spawn_narration_worker};
use spelling_drill::quiz::QuizSession;
use spelling_drill::ui::{draw_menu, draw_quit_confirmation, draw_quiz, draw_summary};
use spelling_drill::word_source::{CsvWordSource, StaticWordSource, WordSource};

const HISTORY_LIMIT: usize = 20;

fn main() -> io::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("spelling-drill: {}", e);
            std::process::exit(2);
        }
    };

    logger::init(&config.log_file, config.log_level);
    log::info!("Starting spelling-drill");

    let word_source = open_word_source(&config);
    let mut startup_notes = Vec::new();
    let mut history_store = open_history_store(&config, &mut startup_notes);

    let narration_enabled = config.tts_command.is_some();
    let narration = spawn_narration_worker(narrator_for(config.tts_command.as_deref()))?;

    let mut menu = MenuState::new(word_source.list_names(), config.quiz);
    refresh_history(&mut menu, history_store.as_ref());
    if !startup_notes.is_empty() {
        menu.status_message = Some(startup_notes.join("; "));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &mut menu,
        word_source.as_ref(),
        history_store.as_mut(),
        &narration,
        narration_enabled,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Terminal error: {}", e);
    }
    log::info!("Exiting spelling-drill");
    result
}

fn open_word_source(config: &AppConfig) -> Box<dyn WordSource> {
    let csv_source = CsvWordSource::new(&config.words_dir);
    if csv_source.list_names().is_empty() {
        log::info!(
            "No word lists in {}, using the starter list",
            config.words_dir.display()
        );
        Box::new(StaticWordSource::starter())
    } else {
        Box::new(csv_source)
    }
}

fn open_history_store(config: &AppConfig, notes: &mut Vec<String>) -> Box<dyn HistoryStore> {
    match SqliteHistoryStore::open(&config.db_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!(
                "Could not open history at {}: {}",
                config.db_path.display(),
                e
            );
            notes.push("History is not saved this run".to_string());
            Box::new(MemoryHistoryStore::new())
        }
    }
}

fn refresh_history(menu: &mut MenuState, store: &dyn HistoryStore) {
    match store.read_recent(HISTORY_LIMIT) {
        Ok(history) => menu.set_history(history),
        Err(e) => {
            log::warn!("Could not read history: {}", e);
            menu.status_message = Some(format!("Could not read history: {}", e));
        }
    }
}

fn speak(narration: &NarrationHandle, effect: QuizEffect) -> QuizEffect {
    match effect {
        QuizEffect::Speak(request) => {
            if let Err(e) = narration.say(request) {
                log::warn!("{}", e);
            }
            QuizEffect::None
        }
        other => other,
    }
}

fn start_quiz(
    menu: &mut MenuState,
    word_source: &dyn WordSource,
    list_name: &str,
) -> Option<QuizView> {
    let items = match word_source.load(list_name) {
        Ok(items) => items,
        Err(e) => {
            menu.status_message = Some(e.to_string());
            return None;
        }
    };
    match QuizSession::start(list_name, items, menu.quiz_config) {
        Ok(session) => {
            menu.status_message = None;
            Some(QuizView::new(session))
        }
        Err(e) => {
            menu.status_message = Some(format!("Cannot start '{}': {}", list_name, e));
            None
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    menu: &mut MenuState,
    word_source: &dyn WordSource,
    history_store: &mut dyn HistoryStore,
    narration: &NarrationHandle,
    narration_enabled: bool,
) -> io::Result<()> {
    let mut app_state = AppState::Menu;
    let mut quiz_view: Option<QuizView> = None;

    loop {
        if let Some(failure) = narration.latest_failure()
            && let Some(view) = quiz_view.as_mut()
        {
            view.status_message = Some(failure);
        }

        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(f, menu, narration_enabled),
            AppState::Quiz => {
                if let Some(view) = quiz_view.as_mut() {
                    draw_quiz(f, view);
                }
            }
            AppState::QuizQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(view) = &quiz_view {
                    draw_summary(f, view);
                }
            }
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        match app_state {
            AppState::Menu => match handle_menu_input(menu, key) {
                MenuAction::Start(list_name) => {
                    if let Some(view) = start_quiz(menu, word_source, &list_name) {
                        if let Some(request) = view.session.narration_request() {
                            speak(narration, QuizEffect::Speak(request));
                        }
                        quiz_view = Some(view);
                        app_state = AppState::Quiz;
                    }
                }
                MenuAction::Quit => return Ok(()),
                MenuAction::None => {}
            },
            AppState::Quiz => {
                if let Some(view) = quiz_view.as_mut() {
                    let effect = handle_quiz_input(view, key, &mut app_state);
                    if speak(narration, effect) == QuizEffect::Finished {
                        // The failure is shown on the summary screen via save_status.
                        let _ = finish_session(view, history_store);
                        refresh_history(menu, history_store);
                    }
                }
            }
            AppState::QuizQuitConfirm => {
                handle_confirm_input(key, &mut app_state);
                if app_state == AppState::Menu {
                    if let Some(view) = &quiz_view {
                        log::info!("Abandoned test on '{}'", view.session.list_name());
                    }
                    quiz_view = None;
                }
            }
            AppState::Summary => match handle_summary_input(key) {
                SummaryAction::Restart => {
                    if let Some(view) = quiz_view.as_mut() {
                        speak(narration, restart_view(view, &mut app_state));
                    }
                }
                SummaryAction::Menu => {
                    quiz_view = None;
                    refresh_history(menu, history_store);
                    app_state = AppState::Menu;
                }
                SummaryAction::Quit => return Ok(()),
                SummaryAction::None => {}
            },
        }
    }
}
