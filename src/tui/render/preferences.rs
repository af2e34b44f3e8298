use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::settings::BindingId;
use crate::tui::app::App;

use super::centered_rect;

/// Render the keyboard shortcut preferences panel
pub fn render_preferences(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default().fg(app.theme.highlight).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    let mut last_ns = None;
    for (i, id) in BindingId::ALL.into_iter().enumerate() {
        if last_ns != Some(id.namespace()) {
            if last_ns.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!(" {}", capitalize(id.namespace().as_str())),
                header_style,
            )));
            last_ns = Some(id.namespace());
        }

        let selected = i == app.prefs_cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let bound = app.registry.get(id);
        let value = if app.recording == Some(id) {
            Span::styled(
                "press keys... (Esc cancel, Backspace unbind)",
                key_style.bg(row_bg).add_modifier(Modifier::SLOW_BLINK),
            )
        } else if bound.is_empty() {
            Span::styled("unbound", dim_style.bg(row_bg))
        } else {
            Span::styled(bound.to_string(), key_style.bg(row_bg))
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { " \u{25B8} " } else { "   " }, key_style.bg(row_bg)),
            Span::styled(format!("{:<20}", id.label()), label_style.bg(row_bg)),
            value,
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " \u{2191}\u{2193} select  Enter record  r reset defaults  Esc close",
        dim_style,
    )));

    // Keep the cursor row visible on short terminals
    let inner_height = overlay_area.height.saturating_sub(2) as usize;
    let cursor_line = cursor_line_index(app.prefs_cursor);
    let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1)) as u16;

    let block = Block::default()
        .title(" Preferences ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll, 0)),
        overlay_area,
    );
}

/// Line index of binding row `cursor`, counting namespace headers and gaps
fn cursor_line_index(cursor: usize) -> usize {
    let mut line = 0;
    let mut last_ns = None;
    for (i, id) in BindingId::ALL.into_iter().enumerate() {
        if last_ns != Some(id.namespace()) {
            line += if last_ns.is_some() { 2 } else { 1 };
            last_ns = Some(id.namespace());
        }
        if i == cursor {
            return line;
        }
        line += 1;
    }
    line
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
