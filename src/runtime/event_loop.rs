use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: handles input and UI drawing. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &mut config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Re-read the config file and apply the parts that can change at runtime.
/// A display format that fails to compile leaves the live one in place.
fn reload_settings(settings: &mut config::Settings, app: &mut App) {
    let mut fresh = match config::Settings::load() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("config reload failed: {e}");
            app.set_status(format!("config reload: {e}"));
            return;
        }
    };

    app.ignore_colors = fresh.ui.ignore_colors;
    app.set_filter_case_insensitive(fresh.ui.filter_case_insensitive);
    if fresh.ui.playlist_display_format == app.format.template() {
        app.set_status("config reload: settings reloaded");
    } else if app
        .apply_display_format("config reload", &fresh.ui.playlist_display_format)
        .is_err()
    {
        fresh.ui.playlist_display_format = app.format.template().to_string();
    }
    tracing::info!("settings reloaded");
    *settings = fresh;
}

/// Apply one key press. Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &mut config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    if app.format_prompt.is_some() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_format_prompt(),
            KeyCode::Enter => app.submit_format_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.next()
            }
            KeyCode::Char('k') | KeyCode::Char('p')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.prev()
            }
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc if app.help_window => app.toggle_help_window(),
        KeyCode::Char('?') => app.toggle_help_window(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('f') => app.open_format_prompt(),
        KeyCode::Char('R') => reload_settings(settings, app),
        KeyCode::Char('s') => app.toggle_sorted(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                if let Some(&first) = app.display_indices().first() {
                    app.set_selected(first);
                }
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            if let Some(&last) = app.display_indices().last() {
                app.set_selected(last);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DEFAULT_DISPLAY_FORMAT, SongFormat};
    use crate::library::Track;

    struct Harness {
        settings: config::Settings,
        app: App,
        state: EventLoopState,
    }

    impl Harness {
        fn new() -> Self {
            let tracks = ["Alpha", "Beta", "Gamma"]
                .iter()
                .map(|title| Track {
                    title: title.to_string(),
                    ..Track::default()
                })
                .collect();
            Self {
                settings: config::Settings::default(),
                app: App::new(tracks, SongFormat::parse(DEFAULT_DISPLAY_FORMAT).unwrap()),
                state: EventLoopState::default(),
            }
        }

        /// Feed `keys` in order; true if any of them asked to quit.
        fn feed(&mut self, keys: &[KeyCode]) -> bool {
            keys.iter().any(|&code| {
                let key = KeyEvent::new(code, KeyModifiers::NONE);
                handle_key_event(key, &mut self.settings, &mut self.app, &mut self.state)
            })
        }
    }

    #[test]
    fn q_quits_only_outside_of_text_input() {
        let mut h = Harness::new();
        assert!(!h.feed(&[KeyCode::Char('/'), KeyCode::Char('q')]));
        assert_eq!(h.app.filter_query, "q");
        assert!(!h.feed(&[KeyCode::Enter]));
        assert!(h.feed(&[KeyCode::Char('q')]));
    }

    #[test]
    fn gg_and_shift_g_jump_to_the_ends() {
        let mut h = Harness::new();
        h.feed(&[KeyCode::Char('G')]);
        assert_eq!(h.app.selected, 2);

        // A stray key between the two g's cancels the prefix.
        h.feed(&[KeyCode::Char('g'), KeyCode::Char('k'), KeyCode::Char('g')]);
        assert_eq!(h.app.selected, 1);
        assert!(h.state.pending_gg);

        h.feed(&[KeyCode::Char('g')]);
        assert_eq!(h.app.selected, 0);
    }

    #[test]
    fn ctrl_j_moves_while_filtering() {
        let mut h = Harness::new();
        h.feed(&[KeyCode::Char('/'), KeyCode::Char('a')]);
        assert_eq!(h.app.display_indices(), vec![0, 1, 2]);

        let ctrl_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL);
        handle_key_event(ctrl_j, &mut h.settings, &mut h.app, &mut h.state);
        assert_eq!(h.app.selected, 1);
        assert_eq!(h.app.filter_query, "a");
    }

    #[test]
    fn format_prompt_edits_and_applies_the_template() {
        let mut h = Harness::new();
        h.feed(&[KeyCode::Char('f')]);
        h.app.format_prompt = Some(String::from("[c:1:0]$"));
        h.feed(&[
            KeyCode::Char('x'),
            KeyCode::Backspace,
            KeyCode::Char('t'),
            KeyCode::Enter,
        ]);

        assert!(h.app.format_prompt.is_none());
        assert_eq!(h.app.format.template(), "[c:1:0]$t");
    }

    #[test]
    fn esc_in_filter_mode_clears_the_filter() {
        let mut h = Harness::new();
        h.feed(&[KeyCode::Char('/'), KeyCode::Char('z'), KeyCode::Char('z')]);
        assert!(h.app.display_indices().is_empty());

        h.feed(&[KeyCode::Esc]);
        assert!(!h.app.filter_mode);
        assert_eq!(h.app.display_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn help_window_closes_with_question_mark_or_esc() {
        let mut h = Harness::new();
        h.feed(&[KeyCode::Char('?')]);
        assert!(h.app.help_window);
        h.feed(&[KeyCode::Esc]);
        assert!(!h.app.help_window);
        h.feed(&[KeyCode::Char('?'), KeyCode::Char('?')]);
        assert!(!h.app.help_window);
    }
}
