use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::spread;

/// Render the date line and a separator
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let date = app.current_date.format(" %A, %B %-d, %Y").to_string();
    let left = vec![Span::styled(
        date,
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let right = if app.is_today() {
        vec![Span::styled(
            "Today ",
            Style::default().fg(app.theme.highlight).bg(bg),
        )]
    } else {
        vec![Span::styled(
            format!("{} ", app.current_date.format("%Y-%m-%d")),
            Style::default().fg(app.theme.dim).bg(bg),
        )]
    };

    let lines = vec![
        spread(left, right, width, Style::default().bg(bg)),
        Line::from(Span::styled(
            "\u{2500}".repeat(width),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use chrono::Days;

    #[test]
    fn today_marker() {
        let app = app_with_todos(&[]);
        let output = render_to_string(TERM_W, 2, |frame, area| render_header(frame, &app, area));
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" Friday, May 2, 2025"));
        assert!(first.ends_with("Today"));
    }

    #[test]
    fn other_day_shows_iso_date() {
        let mut app = app_with_todos(&[]);
        app.go_to_date(test_today().checked_sub_days(Days::new(1)).unwrap());
        let output = render_to_string(TERM_W, 2, |frame, area| render_header(frame, &app, area));
        assert!(output.contains("Thursday, May 1, 2025"));
        assert!(output.contains("2025-05-01"));
        assert!(!output.contains("Today"));
    }
}
