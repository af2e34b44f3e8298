use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::settings_store::MemorySettingsStore;
use crate::io::todo_store::{MemoryTodoStore, TodoStore};
use crate::model::settings::Platform;
use crate::model::todo::{Todo, parse_date};
use crate::tui::app::App;
use crate::update::DisabledUpdates;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// The day every test app opens on
pub fn test_today() -> NaiveDate {
    parse_date("2025-05-02").unwrap()
}

/// App over in-memory stores with one todo per text on `test_today()`
pub fn app_with_todos(texts: &[&str]) -> App {
    let mut store = MemoryTodoStore::new();
    let todos: Vec<Todo> = texts.iter().map(|t| Todo::new(t, test_today())).collect();
    store.set_bucket(test_today(), &todos).unwrap();
    let mut app = App::new(
        Box::new(store),
        Box::new(MemorySettingsStore::new(Platform::Linux)),
        Box::new(DisabledUpdates::default()),
        Platform::Linux,
        test_today(),
    );
    app.clock = test_today;
    app
}
