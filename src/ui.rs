//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. Track
//! rows are painted by the display format engine through [`BufferSurface`].

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{self, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::UiSettings;
use crate::format::{self, Surface, VARIABLES};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("/", "filter (regex)");
    map.insert("f", "edit display format");
    map.insert("R", "reload config");
    map.insert("s", "sort");
    map.insert("?", "format help");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "gg/G", "/", "s", "f", "R", "?", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn palette(color: format::Color) -> style::Color {
    match color {
        format::Color::Black => style::Color::Black,
        format::Color::Red => style::Color::Red,
        format::Color::Green => style::Color::Green,
        format::Color::Yellow => style::Color::Yellow,
        format::Color::Blue => style::Color::Blue,
        format::Color::Magenta => style::Color::Magenta,
        format::Color::Cyan => style::Color::Cyan,
        format::Color::White => style::Color::White,
    }
}

/// A [`Surface`] writing into a ratatui [`Buffer`], clipped to `area`.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    x: u16,
    y: u16,
    fg: style::Color,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self {
            buf,
            area,
            x: area.x,
            y: area.y,
            fg: style::Color::Reset,
        }
    }
}

impl Surface for BufferSurface<'_> {
    fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    fn print_char(&mut self, ch: char) {
        let inside = self.x >= self.area.left()
            && self.x < self.area.right()
            && self.y >= self.area.top()
            && self.y < self.area.bottom();
        if inside {
            if let Some(cell) = self.buf.cell_mut((self.x, self.y)) {
                cell.set_char(ch).set_fg(self.fg);
            }
        }
        self.x = self.x.saturating_add(1);
    }

    fn set_color(&mut self, color: Option<format::Color>) {
        self.fg = color.map_or(style::Color::Reset, palette);
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Text of the help popup: the variable table, the color palette and the
/// columns of the live format as last laid out.
fn format_help_text(app: &App) -> String {
    let mut lines: Vec<String> = VARIABLES
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|(key, name)| format!("${key}  {name:<16}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect();
    lines.push(String::new());
    lines.push("%1c..%8c  black red green yellow blue magenta cyan white".to_string());
    lines.push("{...}|{...}  first section whose variables are all set".to_string());
    lines.push("[l|c|r:factor:size]  new column (factor 0 = fixed size)".to_string());

    lines.push(String::new());
    lines.push(format!("format: {}", app.format.template()));
    let track = app.tracks.get(app.selected);
    for (i, column) in app.format.columns().iter().enumerate() {
        let align = match column.alignment {
            format::Alignment::Left => "left",
            format::Alignment::Center => "center",
            format::Alignment::Right => "right",
        };
        let kind = if column.is_proportional() {
            format!("factor {}", column.factor)
        } else {
            format!("fixed {}", column.size)
        };
        let content = track.map_or(0, |t| app.format.calculate_content_size(t, i));
        lines.push(format!(
            "  #{i} {align:<6} {kind:<10} width {:<4} content {content}",
            column.width
        ));
    }
    lines.join("\n")
}

/// The format prompt, with the character a rejected template failed at
/// highlighted.
fn prompt_line<'a>(prompt: &'a str, error: Option<usize>, status: Option<&'a str>) -> Line<'a> {
    let mut spans = vec![Span::raw(" FORMAT: ")];
    match error.and_then(|pos| prompt.char_indices().nth(pos)) {
        Some((start, ch)) => {
            let end = start + ch.len_utf8();
            spans.push(Span::raw(&prompt[..start]));
            spans.push(Span::styled(
                &prompt[start..end],
                Style::default().add_modifier(Modifier::REVERSED),
            ));
            spans.push(Span::raw(&prompt[end..]));
        }
        None => {
            spans.push(Span::raw(prompt));
            spans.push(Span::raw("_"));
        }
    }
    if let Some(msg) = status {
        spans.push(Span::raw(" • "));
        spans.push(Span::raw(msg));
    }
    Line::from(spans)
}

/// Status line: prompt, filter, notifications and library summary.
fn status_text(app: &App, shown: usize) -> String {
    let mut parts: Vec<String> = Vec::new();

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from(" FILTER:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        if app.filter_mode {
            filter_part.push('_');
        }
        parts.push(filter_part);
    }

    parts.push(format!("Tracks: {}/{}", shown, app.tracks.len()));
    if app.sorted {
        parts.push("Sorted".to_string());
    }
    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir));
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Paint the visible window of `display` into `area`, selected row reversed.
fn draw_tracks(frame: &mut Frame, app: &mut App, display: &[usize], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Two cells on the left hold the selection marker.
    let row_width = inner.width.saturating_sub(2);
    if let Err(e) = app.format.layout(row_width as usize) {
        tracing::debug!("skipping track rows: {}", e);
        let msg = Paragraph::new(e.to_string()).alignment(Alignment::Center);
        frame.render_widget(msg, inner);
        return;
    }

    // Center the selected item when possible by creating a visible window.
    let total = display.len();
    let list_height = inner.height as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let start = if total <= list_height || list_height == 0 {
        0
    } else {
        let half = list_height / 2;
        let start = sel_pos.saturating_sub(half);
        start.min(total - list_height)
    };
    let end = (start + list_height).min(total);

    let buf = frame.buffer_mut();
    for (row, &i) in display[start..end].iter().enumerate() {
        let y = inner.y + row as u16;
        let line = Rect::new(inner.x + 2, y, row_width, 1);
        let mut surface = BufferSurface::new(buf, line);
        if let Err(e) = app
            .format
            .paint(&app.tracks[i], &mut surface, line, app.ignore_colors)
        {
            tracing::debug!("row {} not painted: {}", row, e);
            break;
        }
        if i == app.selected {
            buf.set_string(inner.x, y, "> ", Style::default());
            buf.set_style(
                Rect::new(inner.x, y, inner.width, 1),
                Style::default().add_modifier(Modifier::REVERSED),
            );
        }
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &mut App, display: &[usize], ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_line = match &app.format_prompt {
        Some(prompt) => prompt_line(prompt, app.prompt_error, app.status.as_deref()),
        None => Line::from(status_text(app, display.len())),
    };
    let status_par = Paragraph::new(status_line)
        .block(Block::bordered().title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    draw_tracks(frame, app, display, chunks[2]);

    // Overlay format help popup (keeps list visible under it)
    if app.help_window {
        let help_text = format_help_text(app);
        let height = help_text.lines().count() as u16 + 2;
        let popup_area = centered_rect_sized(72, height, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let help = Paragraph::new(help_text).block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(" display format (? closes) "),
        );
        frame.render_widget(help, popup_area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
