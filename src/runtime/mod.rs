use std::env;
use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::format::{DEFAULT_DISPLAY_FORMAT, SongFormat};
use crate::library::scan;

mod event_loop;
mod settings;

/// Compile the configured display format, falling back to the built-in one.
fn initial_format(template: &str) -> SongFormat {
    SongFormat::parse(template).unwrap_or_else(|e| {
        tracing::warn!("display format {:?} rejected, using default: {}", template, e);
        SongFormat::parse(DEFAULT_DISPLAY_FORMAT).unwrap_or_default()
    })
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    let tracks = scan(Path::new(&dir), &settings.library);
    let mut app = App::new(tracks, initial_format(&settings.ui.playlist_display_format));

    app.ignore_colors = settings.ui.ignore_colors;
    app.set_filter_case_insensitive(settings.ui.filter_case_insensitive);
    app.set_current_dir(dir.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &mut settings, &mut app, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!("event loop failed: {}", e);
    }
    run_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_format_falls_back_to_default() {
        assert_eq!(initial_format("[l:1:0]{").template(), DEFAULT_DISPLAY_FORMAT);
        assert_eq!(initial_format("[l:1:0]$t").template(), "[l:1:0]$t");
    }
}
