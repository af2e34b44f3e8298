use ratatui::style::Color;

use crate::model::todo::TodoStatus;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x16, 0x18, 0x1D),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xF4, 0xF5, 0xF7),
            highlight: Color::Rgb(0xF2, 0xA6, 0x3B),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            red: Color::Rgb(0xE5, 0x5C, 0x5C),
            yellow: Color::Rgb(0xE8, 0xC5, 0x4A),
            green: Color::Rgb(0x7B, 0xC6, 0x7E),
            cyan: Color::Rgb(0x5F, 0xB3, 0xD9),
            purple: Color::Rgb(0xB4, 0x8E, 0xE0),
            selection_bg: Color::Rgb(0x2A, 0x2E, 0x37),
        }
    }
}

impl Theme {
    /// Color for a todo's status glyph
    pub fn status_color(&self, status: TodoStatus) -> Color {
        match status {
            TodoStatus::Pending => self.text,
            TodoStatus::Important => self.red,
            TodoStatus::InProgress => self.cyan,
            TodoStatus::OnHold => self.yellow,
            TodoStatus::Completed => self.green,
            TodoStatus::Cancelled => self.dim,
        }
    }
}
