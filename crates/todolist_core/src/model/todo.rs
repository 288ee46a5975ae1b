use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    NotStarted,
    InProgress,
    Done,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [
        TodoStatus::NotStarted,
        TodoStatus::InProgress,
        TodoStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "NOT_STARTED",
            TodoStatus::InProgress => "IN_PROGRESS",
            TodoStatus::Done => "DONE",
        }
    }

    /// Parse a status name. Accepts any casing and `-`/space separators;
    /// anything outside the enumeration is an `invalid_state` error.
    pub fn parse(raw: &str) -> Result<TodoStatus, AppError> {
        let canonical: String = raw
            .trim()
            .chars()
            .map(|ch| {
                if ch == '-' || ch.is_whitespace() {
                    '_'
                } else {
                    ch.to_ascii_uppercase()
                }
            })
            .collect();

        match canonical.as_str() {
            "NOT_STARTED" => Ok(TodoStatus::NotStarted),
            "IN_PROGRESS" => Ok(TodoStatus::InProgress),
            "DONE" => Ok(TodoStatus::Done),
            _ => {
                let expected: Vec<&str> = TodoStatus::ALL.iter().map(|s| s.as_str()).collect();
                Err(AppError::invalid_state(format!(
                    "unknown status '{}', expected one of {}",
                    raw.trim(),
                    expected.join(", ")
                )))
            }
        }
    }
}

/// Flat storage shape for a todo. Dates travel as RFC 3339 strings and the
/// status as its canonical name, so any backend can hold the record as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update for a todo. An absent field leaves the current value
/// untouched; `due_date` is doubly optional so an explicit `Some(None)`
/// clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub status: Option<TodoStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub status: TodoStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Todo {
    pub fn new(
        title: &str,
        description: &str,
        due_date: Option<OffsetDateTime>,
        status: Option<TodoStatus>,
    ) -> Todo {
        let now = OffsetDateTime::now_utc();
        Todo {
            id: format!("todo-{}", now.unix_timestamp_nanos()),
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            status: status.unwrap_or(TodoStatus::NotStarted),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validated status change: parse first, mutate only on success, so a
    /// rejected value leaves both `status` and `updated_at` as they were.
    pub fn change_status(&mut self, raw: &str) -> Result<(), AppError> {
        let status = TodoStatus::parse(raw)?;
        self.set_status(status);
        Ok(())
    }

    pub fn set_status(&mut self, status: TodoStatus) {
        self.status = status;
        self.touch();
    }

    pub fn is_completed(&self) -> bool {
        self.status == TodoStatus::Done
    }

    /// Computed against the wall clock on every call, never cached.
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => due < OffsetDateTime::now_utc() && self.status != TodoStatus::Done,
            None => false,
        }
    }

    pub fn update(&mut self, patch: &TodoPatch) {
        if let Some(title) = patch.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(description) = patch.description.as_ref() {
            self.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.touch();
    }

    pub fn to_record(&self) -> Result<TodoRecord, AppError> {
        let due_date = match self.due_date {
            Some(due) => Some(format_instant(due)?),
            None => None,
        };

        Ok(TodoRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            status: self.status.as_str().to_string(),
            created_at: format_instant(self.created_at)?,
            updated_at: format_instant(self.updated_at)?,
        })
    }

    pub fn from_record(record: &TodoRecord) -> Result<Todo, AppError> {
        let status = TodoStatus::parse(&record.status)
            .map_err(|err| AppError::storage(err.message().to_string()))?;
        let due_date = match record.due_date.as_deref() {
            Some(value) => Some(parse_instant(value, "due_date")?),
            None => None,
        };

        Ok(Todo {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            due_date,
            status,
            created_at: parse_instant(&record.created_at, "created_at")?,
            updated_at: parse_instant(&record.updated_at, "updated_at")?,
        })
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// Normalize user-supplied due date text to an instant. Pure; storage
/// encoding lives in `to_record`/`from_record`.
pub fn parse_due_date(raw: &str) -> Result<OffsetDateTime, AppError> {
    let trimmed = raw.trim();
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map_err(|_| AppError::validation(format!("due date must be RFC3339: '{trimmed}'")))
}

fn format_instant(instant: OffsetDateTime) -> Result<String, AppError> {
    instant
        .format(&Rfc3339)
        .map_err(|err| AppError::storage(err.to_string()))
}

fn parse_instant(value: &str, field: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|_| AppError::storage(format!("{field} must be RFC3339")))
}
