use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for bucket keys and `createdAt`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Todo status. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    Important,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 6] = [
        TodoStatus::Pending,
        TodoStatus::Important,
        TodoStatus::InProgress,
        TodoStatus::OnHold,
        TodoStatus::Completed,
        TodoStatus::Cancelled,
    ];

    /// Stable name used on disk and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::Important => "important",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::OnHold => "on-hold",
            TodoStatus::Completed => "completed",
            TodoStatus::Cancelled => "cancelled",
        }
    }

    /// Glyph shown in the list gutter
    pub fn glyph(self) -> char {
        match self {
            TodoStatus::Pending => ' ',
            TodoStatus::Important => '!',
            TodoStatus::InProgress => '>',
            TodoStatus::OnHold => '~',
            TodoStatus::Completed => 'x',
            TodoStatus::Cancelled => '-',
        }
    }

    /// Unfinished work that rollover carries into the next day
    pub fn is_carry_forward(self) -> bool {
        !matches!(self, TodoStatus::Completed | TodoStatus::Cancelled)
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('_', "-");
        TodoStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "unknown status '{}' (expected one of: {})",
                    s,
                    TodoStatus::ALL.map(|st| st.as_str()).join(", ")
                )
            })
    }
}

/// Opaque todo identifier. Generated once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn generate() -> Self {
        TodoId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display (first 8 characters)
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        TodoId(s.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo in a day bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TodoRecord", into = "TodoRecord")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub status: TodoStatus,
    /// The day bucket this todo belongs to
    pub created_at: NaiveDate,
    /// Present exactly while `status` is `Completed`
    pub completed_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Create a pending todo with a fresh id. `text` is stored trimmed.
    pub fn new(text: &str, created_at: NaiveDate) -> Self {
        Todo {
            id: TodoId::generate(),
            text: text.trim().to_string(),
            status: TodoStatus::Pending,
            created_at,
            completed_at: None,
        }
    }

    /// Legacy boolean, always derived from `status`
    pub fn is_completed(&self) -> bool {
        self.status == TodoStatus::Completed
    }
}

/// On-disk shape. `completed` is written for older readers and only consulted
/// when a record predates the `status` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoRecord {
    id: TodoId,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<TodoStatus>,
    created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl From<TodoRecord> for Todo {
    fn from(rec: TodoRecord) -> Self {
        let status = rec.status.unwrap_or(if rec.completed {
            TodoStatus::Completed
        } else {
            TodoStatus::Pending
        });
        Todo {
            id: rec.id,
            text: rec.text,
            status,
            created_at: rec.created_at,
            completed_at: if status == TodoStatus::Completed {
                rec.completed_at
            } else {
                None
            },
        }
    }
}

impl From<Todo> for TodoRecord {
    fn from(todo: Todo) -> Self {
        TodoRecord {
            completed: todo.is_completed(),
            id: todo.id,
            text: todo.text,
            status: Some(todo.status),
            created_at: todo.created_at,
            completed_at: todo.completed_at,
        }
    }
}

/// Parse a `YYYY-MM-DD` bucket key
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Format a date as a bucket key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
