use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus, UserId};

/// One user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    pub start_date: NaiveDate,
    /// Stamped when the task enters `Done`.
    pub end_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub user_id: UserId,
    /// Display colour as a hex string (e.g. `#3B82F6`).
    pub color: Option<String>,
}

impl Task {
    /// New task in the initial `Todo` status.
    pub fn new(
        id: TaskId,
        user_id: UserId,
        content: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            start_date,
            end_date: None,
            status: TaskStatus::Todo,
            user_id,
            color: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Apply the non-status fields of a patch.
    ///
    /// Status changes carry the end date stamping rule, so they go through
    /// `app::transition::retarget` instead.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

/// Partial update of a task (the calendar "edit" dialog).
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub status: Option<TaskStatus>,
    pub color: Option<Option<String>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// The authenticated session the store acts for.
///
/// Injected at construction; the store trusts it without verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample() -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            UserId::new("u1"),
            "Write spec",
            date("2025-01-21"),
        )
    }

    #[test]
    fn new_task_starts_in_todo_without_end_date() {
        let task = sample();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.end_date, None);
        assert!(task.is_owned_by(&UserId::new("u1")));
        assert!(!task.is_owned_by(&UserId::new("u2")));
    }

    #[test]
    fn apply_updates_only_patched_fields() {
        let mut task = sample().with_color("#10B981");
        let patch = TaskPatch::new()
            .content("Review spec")
            .end_date(Some(date("2025-01-25")));

        task.apply(&patch);

        assert_eq!(task.content, "Review spec");
        assert_eq!(task.start_date, date("2025-01-21"));
        assert_eq!(task.end_date, Some(date("2025-01-25")));
        assert_eq!(task.color.as_deref(), Some("#10B981"));
    }

    #[test]
    fn apply_can_clear_optional_fields() {
        let mut task = sample().with_end_date(date("2025-01-22")).with_color("#F43F5E");
        task.apply(&TaskPatch::new().end_date(None).color(None));
        assert_eq!(task.end_date, None);
        assert_eq!(task.color, None);
    }

    #[test]
    fn apply_ignores_status() {
        let mut task = sample();
        task.apply(&TaskPatch::new().status(TaskStatus::Done));
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["start_date"], "2025-01-21");
        assert_eq!(value["status"], "todo");
    }
}
