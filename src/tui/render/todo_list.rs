use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::settings::BindingId;
use crate::model::todo::TodoStatus;
use crate::tui::app::App;

use super::truncate_to_width;

/// Render the current day's todos
pub fn render_todo_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    let width = area.width as usize;

    if app.todos.is_empty() {
        let hint = match app.registry.get(BindingId::NewTodo) {
            "" => " Nothing here yet.".to_string(),
            key => format!(" Nothing here yet. Press {} to add a todo.", key),
        };
        let line = Line::from(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the selection on screen
    let offset = app.selected.saturating_sub(height.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    for (i, todo) in app.todos.iter().enumerate().skip(offset).take(height) {
        let selected = i == app.selected;
        let row_bg = if selected { app.theme.selection_bg } else { bg };

        let marker = if selected { "\u{258E}" } else { " " };
        let glyph = format!("[{}] ", todo.status.glyph());

        let mut text_style = Style::default().fg(app.theme.text).bg(row_bg);
        match todo.status {
            TodoStatus::Completed | TodoStatus::Cancelled => {
                text_style = text_style
                    .fg(app.theme.dim)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            TodoStatus::Important => text_style = text_style.add_modifier(Modifier::BOLD),
            _ => {}
        }
        if selected {
            text_style = text_style.fg(app.theme.text_bright);
        }

        let avail = width.saturating_sub(1 + glyph.len());
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(
                glyph,
                Style::default()
                    .fg(app.theme.status_color(todo.status))
                    .bg(row_bg),
            ),
            Span::styled(truncate_to_width(&todo.text, avail), text_style),
        ];
        if selected {
            let used: usize = spans.iter().map(|s| s.width()).sum();
            if used < width {
                spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(row_bg)));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn glyphs_per_status() {
        let mut app = app_with_todos(&["plain", "urgent", "doing", "waiting"]);
        app.todos[1].status = TodoStatus::Important;
        app.todos[2].status = TodoStatus::InProgress;
        app.todos[3].status = TodoStatus::OnHold;
        let output = render_to_string(TERM_W, 6, |frame, area| render_todo_list(frame, &app, area));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0].trim_start_matches('\u{258E}'), "[ ] plain");
        assert!(lines[1].ends_with("[!] urgent"));
        assert!(lines[2].ends_with("[>] doing"));
        assert!(lines[3].ends_with("[~] waiting"));
    }

    #[test]
    fn empty_day_hint_uses_binding() {
        let app = app_with_todos(&[]);
        let output = render_to_string(TERM_W, 3, |frame, area| render_todo_list(frame, &app, area));
        assert!(output.contains("Press n to add a todo."));
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "x".repeat(200);
        let app = app_with_todos(&[long.as_str()]);
        let output = render_to_string(40, 2, |frame, area| render_todo_list(frame, &app, area));
        assert!(output.lines().next().unwrap().ends_with('\u{2026}'));
    }

    #[test]
    fn scrolls_to_selection() {
        let texts: Vec<String> = (0..10).map(|i| format!("todo {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut app = app_with_todos(&refs);
        app.selected = 9;
        let output = render_to_string(TERM_W, 3, |frame, area| render_todo_list(frame, &app, area));
        assert!(output.contains("todo 9"));
        assert!(!output.contains("todo 0"));
    }
}
