use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::update::UpdateStatus;

use super::spread;

/// Render the footer: progress on the left, messages and version on the right
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let left = vec![Span::styled(
        format!(" {}/{} done", app.completed_count(), app.todos.len()),
        dim,
    )];

    let mut right = Vec::new();
    if let Some(msg) = &app.status_message {
        right.push(Span::styled(
            format!("{}  ", msg),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    } else if let Some(label) = app.update_tracker.status().label() {
        let color = match app.update_tracker.status() {
            UpdateStatus::Available => app.theme.green,
            UpdateStatus::Error => app.theme.red,
            _ => app.theme.dim,
        };
        right.push(Span::styled(
            format!("{}  ", label),
            Style::default().fg(color).bg(bg),
        ));
    }
    right.push(Span::styled(format!("v{} ", app.version()), dim));

    let line = spread(left, right, area.width as usize, Style::default().bg(bg));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use std::time::Instant;

    #[test]
    fn shows_progress_and_version() {
        let mut app = app_with_todos(&["a", "b"]);
        app.todos[1].status = crate::model::todo::TodoStatus::Completed;
        let output = render_to_string(TERM_W, 1, |frame, area| render_footer(frame, &app, area));
        assert!(output.starts_with(" 1/2 done"));
        assert!(output.ends_with(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn update_status_label() {
        let mut app = app_with_todos(&[]);
        app.update_tracker.report(UpdateStatus::Available, Instant::now());
        let output = render_to_string(TERM_W, 1, |frame, area| render_footer(frame, &app, area));
        assert!(output.contains("Update available"));
    }

    #[test]
    fn status_message_wins_over_update_label() {
        let mut app = app_with_todos(&[]);
        app.update_tracker.report(UpdateStatus::Available, Instant::now());
        app.status_message = Some("Save failed: disk full".into());
        let output = render_to_string(TERM_W, 1, |frame, area| render_footer(frame, &app, area));
        assert!(output.contains("Save failed: disk full"));
        assert!(!output.contains("Update available"));
    }
}
