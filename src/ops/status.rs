use chrono::{DateTime, Utc};

use crate::model::todo::{Todo, TodoStatus};

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Direct status set. Handles `completed_at` bookkeeping; setting the current
/// status again is a no-op.
pub fn set_status(todo: &mut Todo, new_status: TodoStatus, now: DateTime<Utc>) {
    if todo.status == new_status {
        return;
    }
    todo.status = new_status;
    todo.completed_at = if new_status == TodoStatus::Completed {
        Some(now)
    } else {
        None
    };
}

/// Pure form of [`set_status`]: returns the transitioned copy
pub fn transition(todo: &Todo, target: TodoStatus, now: DateTime<Utc>) -> Todo {
    let mut next = todo.clone();
    set_status(&mut next, target, now);
    next
}

/// completed → pending, anything else → completed
pub fn toggle_completed(todo: &mut Todo, now: DateTime<Utc>) {
    toggle_status(todo, TodoStatus::Completed, now);
}

/// status == `target` → pending, anything else → `target`
pub fn toggle_status(todo: &mut Todo, target: TodoStatus, now: DateTime<Utc>) {
    let next = if todo.status == target {
        TodoStatus::Pending
    } else {
        target
    };
    set_status(todo, next, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::parse_date;
    use chrono::TimeZone;

    fn sample() -> Todo {
        Todo::new("write report", parse_date("2025-05-01").unwrap())
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn every_transition_is_legal() {
        for from in TodoStatus::ALL {
            for to in TodoStatus::ALL {
                let mut t = sample();
                set_status(&mut t, from, at(8));
                let next = transition(&t, to, at(9));
                assert_eq!(next.status, to);
                assert_eq!(next.is_completed(), to == TodoStatus::Completed);
                assert_eq!(next.completed_at.is_some(), to == TodoStatus::Completed);
            }
        }
    }

    #[test]
    fn entering_completed_stamps_time() {
        let t = transition(&sample(), TodoStatus::Completed, at(10));
        assert_eq!(t.completed_at, Some(at(10)));
    }

    #[test]
    fn leaving_completed_clears_time() {
        let t = transition(&sample(), TodoStatus::Completed, at(10));
        let t = transition(&t, TodoStatus::OnHold, at(11));
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn same_status_keeps_original_timestamp() {
        let t = transition(&sample(), TodoStatus::Completed, at(10));
        let t = transition(&t, TodoStatus::Completed, at(12));
        assert_eq!(t.completed_at, Some(at(10)));
    }

    #[test]
    fn transition_leaves_source_untouched() {
        let original = sample();
        let next = transition(&original, TodoStatus::Important, at(9));
        assert_eq!(original.status, TodoStatus::Pending);
        assert_eq!(next.id, original.id);
    }

    #[test]
    fn toggle_completed_round_trip() {
        let mut t = sample();
        toggle_completed(&mut t, at(9));
        assert_eq!(t.status, TodoStatus::Completed);
        toggle_completed(&mut t, at(10));
        assert_eq!(t.status, TodoStatus::Pending);
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn toggle_completed_from_other_status_completes() {
        let mut t = sample();
        set_status(&mut t, TodoStatus::Cancelled, at(8));
        toggle_completed(&mut t, at(9));
        assert_eq!(t.status, TodoStatus::Completed);
    }

    #[test]
    fn toggle_status_laws() {
        for x in TodoStatus::ALL {
            for original in TodoStatus::ALL {
                let mut t = sample();
                set_status(&mut t, original, at(8));
                toggle_status(&mut t, x, at(9));
                if original == x {
                    assert_eq!(t.status, TodoStatus::Pending, "toggle {x} from {x}");
                    toggle_status(&mut t, x, at(10));
                    assert_eq!(t.status, x, "double toggle {x}");
                } else {
                    assert_eq!(t.status, x, "toggle {x} from {original}");
                }
                assert_eq!(t.is_completed(), t.status == TodoStatus::Completed);
            }
        }
    }
}
