//! Application model: `App`.
//!
//! The `App` struct holds the current library, the live display format,
//! the selection and the filter/prompt state used by the UI and runtime.

use regex::{Regex, RegexBuilder};

use crate::format::{FormatError, SongFormat};
use crate::library::Track;

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    /// Display format used to paint, sort and filter rows.
    pub format: SongFormat,
    pub ignore_colors: bool,
    pub filter_case_insensitive: bool,

    pub filter_mode: bool,
    pub filter_query: String,
    filter: Option<Regex>,

    /// Sort the view by the text of the first format column.
    pub sorted: bool,
    /// Template being edited in the display format prompt, if open.
    pub format_prompt: Option<String>,
    /// Character offset the last rejected prompt template failed at.
    pub prompt_error: Option<usize>,
    pub help_window: bool,
    /// Last notification shown on the status line.
    pub status: Option<String>,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` showing `tracks` with `format`.
    pub fn new(tracks: Vec<Track>, format: SongFormat) -> Self {
        Self {
            tracks,
            selected: 0,
            format,
            ignore_colors: false,
            filter_case_insensitive: true,

            filter_mode: false,
            filter_query: String::new(),
            filter: None,

            sorted: false,
            format_prompt: None,
            prompt_error: None,
            help_window: false,
            status: None,
            current_dir: None,
        }
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn toggle_help_window(&mut self) {
        self.help_window = !self.help_window;
    }

    /// Compile `template` and make it the live display format. On failure
    /// the old format stays and the error is reported on the status line,
    /// prefixed with `source`.
    pub fn apply_display_format(&mut self, source: &str, template: &str) -> Result<(), FormatError> {
        match self.format.set_display_format(template) {
            Ok(()) => {
                self.set_status(format!("{source}: display format updated"));
                self.ensure_selected_visible();
                Ok(())
            }
            Err(e) => {
                self.set_status(format!("{source}: {e}"));
                Err(e)
            }
        }
    }

    /// Return the display order of track indices, taking into account
    /// sorting and the active filter.
    pub fn display_indices(&self) -> Vec<usize> {
        let mut base: Vec<usize> = (0..self.tracks.len()).collect();
        if self.sorted {
            base.sort_by_cached_key(|&i| {
                self.format
                    .formatted_string(&self.tracks[i], 0)
                    .to_lowercase()
            });
        }

        match &self.filter {
            Some(re) => base
                .into_iter()
                .filter(|&i| self.format.match_formatted_string(&self.tracks[i], re))
                .collect(),
            None => base,
        }
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Toggle sorting by the first column's text.
    pub fn toggle_sorted(&mut self) {
        self.sorted = !self.sorted;
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Switch the filter's case mode and recompile the active pattern with it.
    pub fn set_filter_case_insensitive(&mut self, on: bool) {
        if self.filter_case_insensitive != on {
            self.filter_case_insensitive = on;
            self.refresh_filter();
        }
    }

    /// Recompile the filter regex from `filter_query`. An invalid pattern
    /// keeps the previous regex and reports on the status line.
    fn refresh_filter(&mut self) {
        let query = self.filter_query.trim();
        if query.is_empty() {
            self.filter = None;
            return;
        }

        match RegexBuilder::new(query)
            .case_insensitive(self.filter_case_insensitive)
            .build()
        {
            Ok(re) => {
                self.filter = Some(re);
                self.status = None;
            }
            Err(_) => self.set_status(format!("filter: invalid pattern {query:?}")),
        }
        self.ensure_selected_visible();
    }

    /// Enter filter mode.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }
    /// Leave filter mode, keeping the current filter applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.refresh_filter();
        self.ensure_selected_visible();
    }
    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.refresh_filter();
    }
    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.refresh_filter();
    }

    /// Open the display format prompt pre-filled with the live template.
    pub fn open_format_prompt(&mut self) {
        self.format_prompt = Some(self.format.template().to_string());
        self.prompt_error = None;
    }
    pub fn cancel_format_prompt(&mut self) {
        self.format_prompt = None;
        self.prompt_error = None;
    }
    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.format_prompt.as_mut() {
            p.push(c);
            self.prompt_error = None;
        }
    }
    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.format_prompt.as_mut() {
            p.pop();
            self.prompt_error = None;
        }
    }
    /// Apply the prompt's template. The prompt stays open when it is
    /// rejected so the template can be fixed.
    pub fn submit_format_prompt(&mut self) {
        let Some(template) = self.format_prompt.clone() else {
            return;
        };
        match self.apply_display_format("display format", &template) {
            Ok(()) => self.cancel_format_prompt(),
            Err(e) => self.prompt_error = e.position(),
        }
    }

    /// Ensure that `selected` is part of the current filtered/sorted view,
    /// otherwise move selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }
    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }
}
