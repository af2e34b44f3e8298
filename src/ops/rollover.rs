use chrono::NaiveDate;

use crate::io::todo_store::{StoreError, TodoStore};
use crate::model::todo::{Todo, TodoId};

/// What a rollover run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverReport {
    /// "Last accessed" was already today; nothing was touched
    AlreadyRan,
    /// No earlier bucket had todos, or none of them were unfinished
    NothingToCarry { source: Option<NaiveDate> },
    /// `carried` new todos were appended to today's bucket
    Carried { source: NaiveDate, carried: usize },
}

/// Copy unfinished todos from the most recent populated day into `today`.
///
/// Runs at most once per calendar day: the "last accessed" marker gates it.
/// The source bucket is never written. Copies get fresh ids and today's date
/// and are appended after anything already in today's bucket; a repeated
/// partial run can therefore produce duplicates.
pub fn rollover<S: TodoStore + ?Sized>(
    store: &mut S,
    today: NaiveDate,
) -> Result<RolloverReport, StoreError> {
    if store.last_accessed()? == Some(today) {
        return Ok(RolloverReport::AlreadyRan);
    }

    let mut source = None;
    for date in store.list_dates()? {
        if date == today {
            continue;
        }
        let bucket = store.get_bucket(date)?;
        if !bucket.is_empty() {
            source = Some((date, bucket));
            break;
        }
    }

    let report = match source {
        Some((source_date, bucket)) => {
            let carried: Vec<Todo> = bucket
                .iter()
                .filter(|t| t.status.is_carry_forward())
                .map(|t| carry_forward(t, today))
                .collect();
            if carried.is_empty() {
                RolloverReport::NothingToCarry {
                    source: Some(source_date),
                }
            } else {
                let mut today_todos = store.get_bucket(today)?;
                let count = carried.len();
                today_todos.extend(carried);
                store.set_bucket(today, &today_todos)?;
                log::info!(
                    "rolled over {} unfinished todo(s) from {} to {}",
                    count,
                    source_date,
                    today
                );
                RolloverReport::Carried {
                    source: source_date,
                    carried: count,
                }
            }
        }
        None => RolloverReport::NothingToCarry { source: None },
    };

    store.set_last_accessed(today)?;
    Ok(report)
}

/// New todo for `today` with the same text and status
fn carry_forward(todo: &Todo, today: NaiveDate) -> Todo {
    Todo {
        id: TodoId::generate(),
        text: todo.text.clone(),
        status: todo.status,
        created_at: today,
        completed_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::todo_store::MemoryTodoStore;
    use crate::model::todo::{TodoStatus, parse_date};
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn todo(text: &str, date: &str, status: TodoStatus) -> Todo {
        let mut t = Todo::new(text, day(date));
        t.status = status;
        t
    }

    fn texts(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn carries_unfinished_todos_to_next_day() {
        let mut store = MemoryTodoStore::new();
        let d = "2025-05-01";
        let source = vec![
            todo("a", d, TodoStatus::Pending),
            todo("b", d, TodoStatus::Completed),
            todo("c", d, TodoStatus::InProgress),
        ];
        store.set_bucket(day(d), &source).unwrap();
        store.set_last_accessed(day(d)).unwrap();

        let report = rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(
            report,
            RolloverReport::Carried {
                source: day(d),
                carried: 2
            }
        );

        let next = store.get_bucket(day("2025-05-02")).unwrap();
        assert_eq!(texts(&next), vec!["a", "c"]);
        assert_eq!(next[0].status, TodoStatus::Pending);
        assert_eq!(next[1].status, TodoStatus::InProgress);
        for (copy, orig) in next.iter().zip([&source[0], &source[2]]) {
            assert_ne!(copy.id, orig.id);
            assert_eq!(copy.created_at, day("2025-05-02"));
            assert!(copy.completed_at.is_none());
        }

        // Source bucket is unchanged
        assert_eq!(store.get_bucket(day(d)).unwrap(), source);
        assert_eq!(store.last_accessed().unwrap(), Some(day("2025-05-02")));
    }

    #[test]
    fn second_run_same_day_is_noop() {
        let mut store = MemoryTodoStore::new();
        store
            .set_bucket(day("2025-05-01"), &[todo("a", "2025-05-01", TodoStatus::Pending)])
            .unwrap();

        rollover(&mut store, day("2025-05-02")).unwrap();
        let after_first = store.get_bucket(day("2025-05-02")).unwrap();
        let writes = store.bucket_writes;

        let report = rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(report, RolloverReport::AlreadyRan);
        assert_eq!(store.get_bucket(day("2025-05-02")).unwrap(), after_first);
        assert_eq!(store.bucket_writes, writes);
        assert_eq!(store.last_accessed().unwrap(), Some(day("2025-05-02")));
    }

    #[test]
    fn picks_most_recent_populated_day() {
        let mut store = MemoryTodoStore::new();
        store
            .set_bucket(day("2025-04-28"), &[todo("old", "2025-04-28", TodoStatus::Pending)])
            .unwrap();
        store
            .set_bucket(day("2025-04-30"), &[todo("recent", "2025-04-30", TodoStatus::OnHold)])
            .unwrap();
        // Empty bucket is skipped even though it is newer
        store.set_bucket(day("2025-05-01"), &[]).unwrap();

        let report = rollover(&mut store, day("2025-05-03")).unwrap();
        assert_eq!(
            report,
            RolloverReport::Carried {
                source: day("2025-04-30"),
                carried: 1
            }
        );
        assert_eq!(texts(&store.get_bucket(day("2025-05-03")).unwrap()), vec!["recent"]);
    }

    #[test]
    fn keeps_existing_today_todos_first() {
        let mut store = MemoryTodoStore::new();
        store
            .set_bucket(day("2025-05-01"), &[todo("carried", "2025-05-01", TodoStatus::Important)])
            .unwrap();
        store
            .set_bucket(day("2025-05-02"), &[todo("already", "2025-05-02", TodoStatus::Pending)])
            .unwrap();

        rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(
            texts(&store.get_bucket(day("2025-05-02")).unwrap()),
            vec!["already", "carried"]
        );
    }

    #[test]
    fn cancelled_and_completed_stay_behind() {
        let mut store = MemoryTodoStore::new();
        store
            .set_bucket(
                day("2025-05-01"),
                &[
                    todo("done", "2025-05-01", TodoStatus::Completed),
                    todo("dropped", "2025-05-01", TodoStatus::Cancelled),
                ],
            )
            .unwrap();
        let report = rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(
            report,
            RolloverReport::NothingToCarry {
                source: Some(day("2025-05-01"))
            }
        );
        assert!(store.get_bucket(day("2025-05-02")).unwrap().is_empty());
        assert_eq!(store.bucket_writes, 1);
        assert_eq!(store.last_accessed().unwrap(), Some(day("2025-05-02")));
    }

    #[test]
    fn empty_store_only_updates_last_accessed() {
        let mut store = MemoryTodoStore::new();
        let report = rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(report, RolloverReport::NothingToCarry { source: None });
        assert!(store.list_dates().unwrap().is_empty());
        assert_eq!(store.last_accessed().unwrap(), Some(day("2025-05-02")));
    }

    #[test]
    fn repeated_partial_run_duplicates() {
        let mut store = MemoryTodoStore::new();
        store
            .set_bucket(day("2025-05-01"), &[todo("a", "2025-05-01", TodoStatus::Pending)])
            .unwrap();
        rollover(&mut store, day("2025-05-02")).unwrap();

        // Simulate the marker write having been lost
        store.set_last_accessed(day("2025-05-01")).unwrap();
        rollover(&mut store, day("2025-05-02")).unwrap();
        assert_eq!(texts(&store.get_bucket(day("2025-05-02")).unwrap()), vec!["a", "a"]);
    }
}
