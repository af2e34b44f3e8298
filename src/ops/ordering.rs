use std::cmp::Ordering;

use crate::model::todo::Todo;

/// Display order: unfinished before completed, then by creation day.
/// Cancelled todos count as unfinished here; only `completed` sinks.
pub fn compare(a: &Todo, b: &Todo) -> Ordering {
    a.is_completed()
        .cmp(&b.is_completed())
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Stable sort by [`compare`]. Equal keys keep their relative order.
pub fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(compare);
}

/// Check the ordering invariant (used by tests and debug assertions)
pub fn is_sorted(todos: &[Todo]) -> bool {
    todos
        .windows(2)
        .all(|w| compare(&w[0], &w[1]) != Ordering::Greater)
}
