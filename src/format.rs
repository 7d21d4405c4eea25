//! Song display format language.
//!
//! A display format describes how a track is laid out on one terminal row:
//!
//! ```text
//! [l:1:0]%4c{$a - $t}|{$t}|{$f}[r:0:10]{%3c($l)}
//! ```
//!
//! - `[align:factor:size]` starts a column. `align` is `l`, `c` or `r`;
//!   a `factor` of 0 makes a fixed column `size` wide, otherwise the column
//!   gets a share of the remaining width proportional to `factor`.
//! - `$x` inserts a track field (see [`VARIABLES`]).
//! - `%Nc` switches to palette color `N` (1-8).
//! - `{...}` is only shown when all of its variables are non-empty;
//!   `{...}|{...}` shows the first alternative that qualifies.
//! - `\x` inserts `x` literally; `[ $ % { } | \` need escaping.
//!
//! Templates are compiled once into [`Column`]s and evaluated against each
//! track on every repaint.

mod compile;
mod error;
mod layout;
mod render;
mod section;
mod types;
mod variable;

use std::str::FromStr;

use ratatui::layout::Rect;
use regex::Regex;

use crate::library::Track;

pub use compile::compile;
pub use error::{FormatError, LayoutError};
use layout::layout;
pub use render::Surface;
pub use types::{Alignment, Color, Column};
pub use variable::VARIABLES;

/// Format used for the playlist when none is configured.
pub const DEFAULT_DISPLAY_FORMAT: &str = "[l:1:0]%4c{$a - $t}|{$t}|{$f}[r:0:10]{%3c($l)}";

/// A compiled display format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFormat {
    template: String,
    columns: Vec<Column>,
}

impl SongFormat {
    /// Compile `template` into a new format.
    pub fn parse(template: &str) -> Result<Self, FormatError> {
        Ok(Self {
            template: template.to_string(),
            columns: compile(template)?,
        })
    }

    /// Replace the current format with `template`.
    ///
    /// The template is compiled in full before anything is swapped in, so on
    /// error the previous format stays in effect.
    pub fn set_display_format(&mut self, template: &str) -> Result<(), FormatError> {
        match Self::parse(template) {
            Ok(parsed) => {
                tracing::debug!("display format set to {:?}", template);
                *self = parsed;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("rejected display format {:?}: {}", template, e);
                Err(e)
            }
        }
    }

    /// The template this format was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Fit the columns into a row `width` characters wide.
    pub fn layout(&mut self, width: usize) -> Result<(), LayoutError> {
        layout(&mut self.columns, width)
    }

    /// Lay the columns out for `line` and paint `track` onto it.
    pub fn paint(
        &mut self,
        track: &Track,
        surface: &mut dyn Surface,
        line: Rect,
        ignore_colors: bool,
    ) -> Result<(), LayoutError> {
        self.layout(line.width as usize)?;
        render::paint(&self.columns, track, surface, line, ignore_colors);
        Ok(())
    }

    /// True when the text of any variable shown for `track` matches
    /// `pattern`. Literal characters are left out, so a pattern that only
    /// hits separators such as `" - "` never matches.
    pub fn match_formatted_string(&self, track: &Track, pattern: &Regex) -> bool {
        render::matches(&self.columns, track, pattern)
    }

    /// Plain text of column `column` for `track`; empty when there is no
    /// such column.
    pub fn formatted_string(&self, track: &Track, column: usize) -> String {
        self.columns
            .get(column)
            .map(|c| render::formatted_string(c, track))
            .unwrap_or_default()
    }

    /// Number of code points column `column` renders for `track`.
    pub fn calculate_content_size(&self, track: &Track, column: usize) -> usize {
        self.columns
            .get(column)
            .map_or(0, |c| render::content_size(c, track))
    }
}

impl FromStr for SongFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests;
