use chrono::{DateTime, NaiveDate, Utc};

use crate::model::todo::{Todo, TodoId, TodoStatus};
use crate::ops::ordering::sort_todos;
use crate::ops::status;

/// Error type for todo operations
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo not found: {0}")]
    NotFound(String),
    #[error("'{0}' matches more than one todo; use more of the id")]
    Ambiguous(String),
}

/// Result of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Text replaced; the todo now sits at this index
    Edited(usize),
    /// The new text was empty, so the todo was removed
    Deleted,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Add a todo for `date`. Blank text is a no-op and returns `None`;
/// otherwise returns the new todo's index after re-sorting. The new todo
/// goes in front, so it heads the unfinished todos of its day.
pub fn add_todo(todos: &mut Vec<Todo>, text: &str, date: NaiveDate) -> Option<usize> {
    if text.trim().is_empty() {
        return None;
    }
    let todo = Todo::new(text, date);
    let id = todo.id.clone();
    todos.insert(0, todo);
    sort_todos(todos);
    find_index(todos, &id)
}

/// Replace a todo's text. Emptying the text deletes the todo instead.
pub fn edit_todo(todos: &mut Vec<Todo>, id: &TodoId, text: &str) -> Result<EditOutcome, TodoError> {
    let idx = find_index(todos, id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        todos.remove(idx);
        return Ok(EditOutcome::Deleted);
    }
    todos[idx].text = trimmed.to_string();
    sort_todos(todos);
    Ok(EditOutcome::Edited(find_index(todos, id).unwrap_or(idx)))
}

pub fn delete_todo(todos: &mut Vec<Todo>, id: &TodoId) -> Result<Todo, TodoError> {
    let idx = find_index(todos, id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    Ok(todos.remove(idx))
}

// ---------------------------------------------------------------------------
// Status changes with selection follow-up
// ---------------------------------------------------------------------------

/// Toggle completion and re-sort. Returns where the selection should go.
///
/// Completing moves the todo to the bottom, so the cursor stays on the next
/// unfinished todo at or after `selected` (or the last unfinished one).
/// Un-completing moves it up, so the cursor lands on the item after it.
pub fn toggle_completed(
    todos: &mut [Todo],
    id: &TodoId,
    selected: usize,
    now: DateTime<Utc>,
) -> Result<usize, TodoError> {
    let idx = find_index(todos, id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    let was_completed = todos[idx].is_completed();
    status::toggle_completed(&mut todos[idx], now);
    sort_todos(todos);

    let next = if !was_completed {
        todos
            .iter()
            .enumerate()
            .position(|(i, t)| i >= selected && !t.is_completed())
            .or_else(|| todos.iter().rposition(|t| !t.is_completed()))
            .unwrap_or(0)
    } else {
        match find_index(todos, id) {
            Some(new_idx) if new_idx + 1 < todos.len() => new_idx + 1,
            _ => selected,
        }
    };
    Ok(clamp_selection(next, todos.len()))
}

/// Toggle `target` on a todo (`target` again → pending) and re-sort.
/// The selection follows the todo.
pub fn toggle_status(
    todos: &mut [Todo],
    id: &TodoId,
    target: TodoStatus,
    now: DateTime<Utc>,
) -> Result<usize, TodoError> {
    let idx = find_index(todos, id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    status::toggle_status(&mut todos[idx], target, now);
    sort_todos(todos);
    Ok(find_index(todos, id).unwrap_or(idx))
}

/// Set a status directly and re-sort. Returns the todo's new index.
pub fn set_status(
    todos: &mut [Todo],
    id: &TodoId,
    target: TodoStatus,
    now: DateTime<Utc>,
) -> Result<usize, TodoError> {
    let idx = find_index(todos, id).ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    status::set_status(&mut todos[idx], target, now);
    sort_todos(todos);
    Ok(find_index(todos, id).unwrap_or(idx))
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

pub fn find_index(todos: &[Todo], id: &TodoId) -> Option<usize> {
    todos.iter().position(|t| &t.id == id)
}

/// Clamp a selection index into `[0, len - 1]` (0 for an empty list)
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

/// Resolve a user-typed target: a 1-based position in display order, or a
/// unique id prefix.
pub fn resolve_target(todos: &[Todo], target: &str) -> Result<usize, TodoError> {
    let target = target.trim();
    if let Ok(pos) = target.parse::<usize>()
        && pos >= 1
        && pos <= todos.len()
    {
        return Ok(pos - 1);
    }
    let matches: Vec<usize> = todos
        .iter()
        .enumerate()
        .filter(|(_, t)| !target.is_empty() && t.id.as_str().starts_with(target))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [one] => Ok(*one),
        [] => Err(TodoError::NotFound(target.to_string())),
        _ => Err(TodoError::Ambiguous(target.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::parse_date;
    use crate::ops::ordering::is_sorted;

    fn day() -> NaiveDate {
        parse_date("2025-05-01").unwrap()
    }

    fn list(texts: &[&str]) -> Vec<Todo> {
        texts.iter().map(|t| Todo::new(t, day())).collect()
    }

    fn texts(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn add_blank_is_noop() {
        let mut todos = list(&["a"]);
        assert_eq!(add_todo(&mut todos, "   ", day()), None);
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn add_goes_first_among_same_day() {
        let mut todos = list(&["a", "b"]);
        let id = todos[0].id.clone();
        toggle_completed(&mut todos, &id, 0, Utc::now()).unwrap();
        let idx = add_todo(&mut todos, "c", day()).unwrap();
        assert_eq!(texts(&todos), vec!["c", "b", "a"]);
        assert_eq!(idx, 0);
        assert!(is_sorted(&todos));
    }

    #[test]
    fn add_stays_behind_older_unfinished() {
        let mut todos = vec![Todo::new("old", parse_date("2025-04-30").unwrap())];
        todos.extend(list(&["a"]));
        let idx = add_todo(&mut todos, "new", day()).unwrap();
        assert_eq!(texts(&todos), vec!["old", "new", "a"]);
        assert_eq!(idx, 1);
    }

    #[test]
    fn add_then_empty_edit_removes_todo() {
        let mut todos = Vec::new();
        let idx = add_todo(&mut todos, "buy milk", day()).unwrap();
        let id = todos[idx].id.clone();
        assert_eq!(edit_todo(&mut todos, &id, "  ").unwrap(), EditOutcome::Deleted);
        assert!(todos.is_empty());
        assert!(!todos.iter().any(|t| t.text.is_empty()));
    }

    #[test]
    fn edit_trims_text() {
        let mut todos = list(&["a"]);
        let id = todos[0].id.clone();
        assert_eq!(edit_todo(&mut todos, &id, "  b ").unwrap(), EditOutcome::Edited(0));
        assert_eq!(todos[0].text, "b");
    }

    #[test]
    fn edit_unknown_id_fails() {
        let mut todos = list(&["a"]);
        let err = edit_todo(&mut todos, &TodoId::from("nope"), "x").unwrap_err();
        assert!(matches!(err, TodoError::NotFound(_)));
    }

    #[test]
    fn delete_removes_only_target() {
        let mut todos = list(&["a", "b", "c"]);
        let id = todos[1].id.clone();
        let removed = delete_todo(&mut todos, &id).unwrap();
        assert_eq!(removed.text, "b");
        assert_eq!(texts(&todos), vec!["a", "c"]);
    }

    #[test]
    fn completing_keeps_cursor_on_next_unfinished() {
        let mut todos = list(&["a", "b", "c"]);
        let id = todos[1].id.clone();
        let sel = toggle_completed(&mut todos, &id, 1, Utc::now()).unwrap();
        assert_eq!(texts(&todos), vec!["a", "c", "b"]);
        assert_eq!(sel, 1);
        assert_eq!(todos[sel].text, "c");
    }

    #[test]
    fn completing_last_unfinished_selects_previous_unfinished() {
        let mut todos = list(&["a", "b"]);
        let id = todos[1].id.clone();
        let sel = toggle_completed(&mut todos, &id, 1, Utc::now()).unwrap();
        assert_eq!(sel, 0);
        assert_eq!(todos[sel].text, "a");
    }

    #[test]
    fn completing_everything_selects_top() {
        let mut todos = list(&["a"]);
        let id = todos[0].id.clone();
        let sel = toggle_completed(&mut todos, &id, 0, Utc::now()).unwrap();
        assert_eq!(sel, 0);
    }

    #[test]
    fn uncompleting_selects_item_after_it() {
        let mut todos = list(&["a", "b", "c"]);
        let id = todos[0].id.clone();
        toggle_completed(&mut todos, &id, 0, Utc::now()).unwrap();
        assert_eq!(texts(&todos), vec!["b", "c", "a"]);
        let sel = toggle_completed(&mut todos, &id, 2, Utc::now()).unwrap();
        assert_eq!(texts(&todos), vec!["b", "c", "a"]);
        // "a" moved back among unfinished items but same created_at: stable order
        assert!(is_sorted(&todos));
        // nothing after it, so the cursor stays put
        assert_eq!(sel, 2);
    }

    #[test]
    fn uncompleting_older_todo_selects_next() {
        let mut todos = vec![Todo::new("a", parse_date("2025-04-30").unwrap())];
        todos.extend(list(&["b", "c"]));
        let id = todos[0].id.clone();
        toggle_completed(&mut todos, &id, 0, Utc::now()).unwrap();
        assert_eq!(texts(&todos), vec!["b", "c", "a"]);
        let sel = toggle_completed(&mut todos, &id, 2, Utc::now()).unwrap();
        assert_eq!(texts(&todos), vec!["a", "b", "c"]);
        assert_eq!(sel, 1);
    }

    #[test]
    fn toggle_status_follows_todo() {
        let mut todos = list(&["a", "b"]);
        let id = todos[0].id.clone();
        let sel = toggle_status(&mut todos, &id, TodoStatus::Important, Utc::now()).unwrap();
        assert_eq!(todos[sel].status, TodoStatus::Important);
        let sel = toggle_status(&mut todos, &id, TodoStatus::Important, Utc::now()).unwrap();
        assert_eq!(todos[sel].status, TodoStatus::Pending);
    }

    #[test]
    fn set_status_completed_resorts() {
        let mut todos = list(&["a", "b"]);
        let id = todos[0].id.clone();
        let idx = set_status(&mut todos, &id, TodoStatus::Completed, Utc::now()).unwrap();
        assert_eq!(idx, 1);
        assert!(todos[1].is_completed());
        assert!(todos[1].completed_at.is_some());
    }

    #[test]
    fn clamp_handles_empty_and_overflow() {
        assert_eq!(clamp_selection(5, 0), 0);
        assert_eq!(clamp_selection(5, 3), 2);
        assert_eq!(clamp_selection(1, 3), 1);
    }

    #[test]
    fn resolve_target_by_position_and_prefix() {
        let mut todos = list(&["a", "b"]);
        todos[0].id = TodoId::from("abc-1");
        todos[1].id = TodoId::from("abd-2");
        assert_eq!(resolve_target(&todos, "2").unwrap(), 1);
        assert_eq!(resolve_target(&todos, "abd").unwrap(), 1);
        assert!(matches!(resolve_target(&todos, "ab"), Err(TodoError::Ambiguous(_))));
        assert!(matches!(resolve_target(&todos, "zz"), Err(TodoError::NotFound(_))));
        assert!(matches!(resolve_target(&todos, ""), Err(TodoError::NotFound(_))));
    }
}
