//! Painting, measuring and matching of compiled columns.

use ratatui::layout::Rect;
use regex::Regex;

use crate::library::Track;

use super::section::resolve_tokens;
use super::types::{Alignment, Color, Column, Token};

/// Column-addressed output sink the painter writes to.
///
/// Printing advances the cursor by one cell per code point.
pub trait Surface {
    fn move_to(&mut self, x: u16, y: u16);

    fn print_char(&mut self, ch: char);

    fn print_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.print_char(ch);
        }
    }

    /// `None` restores the default color.
    fn set_color(&mut self, color: Option<Color>);
}

/// Number of code points `column` renders for `track`.
pub fn content_size(column: &Column, track: &Track) -> usize {
    resolve_tokens(&column.tokens, track)
        .into_iter()
        .map(|token| match token {
            Token::Char(_) => 1,
            Token::Variable(var) => var.size(track),
            _ => 0,
        })
        .sum()
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Paint already laid out `columns` on the row `line.y`, starting at `line.x`.
pub fn paint(
    columns: &[Column],
    track: &Track,
    surface: &mut dyn Surface,
    line: Rect,
    ignore_colors: bool,
) {
    let mut left = line.x;
    for column in columns {
        let offset = match column.alignment {
            Alignment::Left => 0,
            Alignment::Center => column.width.saturating_sub(content_size(column, track)) / 2,
            Alignment::Right => column.width.saturating_sub(content_size(column, track)),
        };
        surface.move_to(left.saturating_add(to_cells(offset)), line.y);
        if !ignore_colors {
            surface.set_color(None);
        }

        let mut budget = column.width - offset;
        for token in resolve_tokens(&column.tokens, track) {
            if budget == 0 {
                break;
            }
            match token {
                Token::Char(ch) => {
                    surface.print_char(*ch);
                    budget -= 1;
                }
                Token::Variable(var) => budget -= var.render(track, surface, budget),
                Token::Color(color) if !ignore_colors => surface.set_color(Some(*color)),
                _ => {}
            }
        }

        left = left.saturating_add(to_cells(column.width));
    }
}

/// True when the rendered text of any variable in `columns` matches
/// `pattern`. Literal characters take no part in matching.
pub fn matches(columns: &[Column], track: &Track, pattern: &Regex) -> bool {
    columns.iter().any(|column| {
        resolve_tokens(&column.tokens, track)
            .into_iter()
            .any(|token| match token {
                Token::Variable(var) => pattern.is_match(&var.text(track)),
                _ => false,
            })
    })
}

/// The plain text `column` renders for `track`, colors dropped.
pub fn formatted_string(column: &Column, track: &Track) -> String {
    let mut out = String::new();
    for token in resolve_tokens(&column.tokens, track) {
        match token {
            Token::Char(ch) => out.push(*ch),
            Token::Variable(var) => out.push_str(&var.text(track)),
            _ => {}
        }
    }
    out
}
