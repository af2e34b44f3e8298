use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::keymap::shortcut::{RecordOutcome, record};
use crate::tui::app::App;

const WIDTH: u16 = 44;
const HEIGHT: u16 = 7;

/// Small box in the bottom right corner describing the last key press
pub fn render_key_debug(frame: &mut Frame, app: &App, area: Rect) {
    let w = WIDTH.min(area.width);
    let h = HEIGHT.min(area.height);
    let rect = Rect {
        x: area.right().saturating_sub(w),
        y: area.bottom().saturating_sub(h + 1),
        width: w,
        height: h,
    };
    frame.render_widget(Clear, rect);

    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text_bright).bg(bg);

    let row = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(format!(" {:<9}", name), label), Span::styled(v, value)])
    };

    let lines = match &app.last_key {
        Some(press) => {
            let m = press.modifiers;
            let mut mods = Vec::new();
            if m.ctrl {
                mods.push("ctrl");
            }
            if m.meta {
                mods.push("meta");
            }
            if m.alt {
                mods.push("alt");
            }
            if m.shift {
                mods.push("shift");
            }
            let shortcut = match record(press, app.platform) {
                RecordOutcome::Captured(s) => s,
                _ => "-".to_string(),
            };
            let command = app
                .last_command
                .as_ref()
                .map_or_else(|| "none".to_string(), |c| format!("{:?}", c));
            vec![
                row("key", format!("{:?}", press.key)),
                row("code", press.code.clone()),
                row("mods", if mods.is_empty() { "-".into() } else { mods.join("+") }),
                row("shortcut", shortcut),
                row("command", command),
            ]
        }
        None => vec![Line::from(Span::styled(" press any key", label))],
    };

    let block = Block::default()
        .title(" Key debug ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.purple).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::dispatch::Command;
    use crate::keymap::shortcut::{KeyPress, Modifiers};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn empty_until_a_key_arrives() {
        let app = app_with_todos(&[]);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| render_key_debug(frame, &app, area));
        assert!(output.contains("Key debug"));
        assert!(output.contains("press any key"));
    }

    #[test]
    fn describes_last_key_and_command() {
        let mut app = app_with_todos(&[]);
        app.last_key = Some(KeyPress::from_key("i", Modifiers::ctrl()));
        app.last_command = Some(Command::OpenPreferences);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| render_key_debug(frame, &app, area));
        assert!(output.contains("KeyI"));
        assert!(output.contains("ctrl"));
        assert!(output.contains("Ctrl+I"));
        assert!(output.contains("OpenPreferences"));
    }
}
