use serde::Serialize;

use crate::model::todo::{Todo, TodoStatus, date_key};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub position: usize,
    pub id: String,
    pub text: String,
    pub status: TodoStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: String,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct DateSummaryJson {
    pub date: String,
    pub total: usize,
    pub completed: usize,
}

#[derive(Serialize)]
pub struct BindingJson {
    pub path: String,
    pub label: String,
    pub shortcut: String,
}

// ---------------------------------------------------------------------------
// Conversion / formatting
// ---------------------------------------------------------------------------

/// `position` is 1-based, as accepted back by `<target>` arguments
pub fn todo_to_json(position: usize, todo: &Todo) -> TodoJson {
    TodoJson {
        position,
        id: todo.id.to_string(),
        text: todo.text.clone(),
        status: todo.status,
        created_at: date_key(todo.created_at),
        completed_at: todo.completed_at.map(|t| t.to_rfc3339()),
    }
}

/// `  1  [x] 3f2a9c1b buy milk`
pub fn format_todo_line(position: usize, todo: &Todo) -> String {
    format!(
        "{:>3}  [{}] {} {}",
        position,
        todo.status.glyph(),
        todo.id.short(),
        todo.text
    )
}
