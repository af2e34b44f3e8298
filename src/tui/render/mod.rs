pub mod footer;
pub mod header;
pub mod key_debug;
pub mod preferences;
pub mod todo_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::keymap::dispatch::Mode;

use super::app::App;

/// Main render function. Dispatches to sub-renderers.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let input_rows = if app.mode == Mode::View { 0 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),          // date + separator
            Constraint::Min(1),             // todo list
            Constraint::Length(input_rows), // add/edit line
            Constraint::Length(1),          // footer
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    todo_list::render_todo_list(frame, app, chunks[1]);
    if input_rows > 0 {
        render_input_line(frame, app, chunks[2]);
    }
    footer::render_footer(frame, app, chunks[3]);

    // Overlays on top of everything
    if app.preferences_open {
        preferences::render_preferences(frame, app, area);
    }
    if app.show_key_debug {
        key_debug::render_key_debug(frame, app, area);
    }
}

/// The add/edit prompt with a terminal cursor
fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let prompt = match app.mode {
        Mode::Edit => " edit: ",
        _ => " new: ",
    };
    let prompt_w = prompt.width();
    let avail = (area.width as usize).saturating_sub(prompt_w + 1);

    // Scroll horizontally so the cursor stays visible
    let text = app.input.as_str();
    let cursor_col = app.input.cursor_col();
    let skip_cols = cursor_col.saturating_sub(avail);
    let visible = skip_width(text, skip_cols);

    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            truncate_to_width(visible, avail + 1),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);

    if !app.preferences_open {
        let x = area.x + (prompt_w + cursor_col - skip_cols) as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}

/// Drop leading graphemes until at least `cols` cells are skipped
fn skip_width(s: &str, cols: usize) -> &str {
    let mut skipped = 0;
    for (i, g) in s.grapheme_indices(true) {
        if skipped >= cols {
            return &s[i..];
        }
        skipped += g.width();
    }
    ""
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if s.width() <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for g in s.graphemes(true) {
        let gw = g.width();
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(g);
    }
    result.push('\u{2026}');
    result
}

/// Pad `left` and `right` apart to fill `width` cells
pub(super) fn spread<'a>(left: Vec<Span<'a>>, right: Vec<Span<'a>>, width: usize, fill: Style) -> Line<'a> {
    let lw: usize = left.iter().map(|s| s.content.width()).sum();
    let rw: usize = right.iter().map(|s| s.content.width()).sum();
    let mut spans = left;
    if lw + rw < width {
        spans.push(Span::styled(" ".repeat(width - lw - rw), fill));
        spans.extend(right);
    }
    Line::from(spans)
}

/// A centered rect using percentages of `area`
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
