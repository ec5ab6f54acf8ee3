//! TaskTable port - ホスト型 BaaS 上のリモートタスクテーブル
//!
//! リモートのテーブルが正本（source of truth）。ストアのメモリ上のコピーは
//! キャッシュに過ぎず、書き込み成功のたびに select で作り直す。
//!
//! # 必要な操作
//! - `select * where user_id = :uid`
//! - `insert {id, user_id, content, start_date, end_date, status, color}`
//! - `update set <fields> where id = :id`
//! - `delete where id = :id`

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TableError, TaskId, TaskStatus, UserId};

/// One row of the remote table, as stored.
///
/// Dates are ISO `YYYY-MM-DD` strings and the status uses its wire name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub status: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Column values written by an update: every field but `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    pub user_id: String,
    pub content: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: String,
    pub color: Option<String>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            user_id: task.user_id.to_string(),
            content: task.content.clone(),
            start_date: task.start_date.to_string(),
            end_date: task.end_date.map(|d| d.to_string()),
            status: task.status.as_str().to_string(),
            color: task.color.clone(),
        }
    }
}

impl From<&Task> for TaskChanges {
    fn from(task: &Task) -> Self {
        let TaskRow {
            user_id,
            content,
            start_date,
            end_date,
            status,
            color,
            ..
        } = TaskRow::from(task);
        Self {
            user_id,
            content,
            start_date,
            end_date,
            status,
            color,
        }
    }
}

impl TaskRow {
    /// Overwrite every column but `id`.
    pub fn apply(&mut self, changes: &TaskChanges) {
        self.user_id = changes.user_id.clone();
        self.content = changes.content.clone();
        self.start_date = changes.start_date.clone();
        self.end_date = changes.end_date.clone();
        self.status = changes.status.clone();
        self.color = changes.color.clone();
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = TableError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let id: TaskId = row
            .id
            .parse()
            .map_err(|e| TableError::malformed(format!("row id '{}': {e}", row.id)))?;
        let status: TaskStatus = row
            .status
            .parse()
            .map_err(|e| TableError::malformed(format!("row {id}: {e}")))?;
        let start_date = parse_column(&id, "start_date", &row.start_date)?;
        let end_date = match row.end_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_column(&id, "end_date", raw)?),
        };

        Ok(Task {
            id,
            content: row.content,
            start_date,
            end_date,
            status,
            user_id: UserId::new(row.user_id),
            color: row.color,
        })
    }
}

fn parse_column(id: &TaskId, column: &str, raw: &str) -> Result<NaiveDate, TableError> {
    raw.parse()
        .map_err(|e| TableError::malformed(format!("row {id}: {column} '{raw}': {e}")))
}

/// TaskTable はリモートのタスクテーブルへの窓口
///
/// 実装はタイムアウトやリトライを持たなくてよい（トランスポートの既定に任せる）。
#[async_trait]
pub trait TaskTable: Send + Sync {
    /// All rows owned by `user_id`, in the order the table returns them.
    async fn select_for_user(&self, user_id: &UserId) -> Result<Vec<TaskRow>, TableError>;

    async fn insert(&self, row: TaskRow) -> Result<(), TableError>;

    async fn update_by_id(&self, id: &str, changes: TaskChanges) -> Result<(), TableError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), TableError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use ulid::Ulid;

    fn sample() -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            UserId::new("u1"),
            "Write spec",
            "2025-01-21".parse().unwrap(),
        )
        .with_status(TaskStatus::Done)
        .with_end_date("2025-01-23".parse().unwrap())
    }

    #[test]
    fn row_uses_wire_format() {
        let task = sample();
        let row = TaskRow::from(&task);
        assert_eq!(row.id, task.id.to_string());
        assert_eq!(row.start_date, "2025-01-21");
        assert_eq!(row.end_date.as_deref(), Some("2025-01-23"));
        assert_eq!(row.status, "done");
        assert_eq!(Task::try_from(row).unwrap(), task);
    }

    #[test]
    fn changes_carry_everything_but_id() {
        let task = sample();
        let changes = TaskChanges::from(&task);
        let json = serde_json::to_value(&changes).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["status"], "done");
        assert_eq!(json["user_id"], "u1");
    }

    #[test]
    fn row_from_json_tolerates_missing_optional_columns() {
        let id = Ulid::new().to_string();
        let row: TaskRow = serde_json::from_value(serde_json::json!({
            "id": id,
            "user_id": "u1",
            "content": "x",
            "start_date": "2025-01-21",
            "status": "inProgress",
        }))
        .unwrap();
        let task = Task::try_from(row).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.end_date, None);
        assert_eq!(task.color, None);
    }

    #[test]
    fn unreadable_rows_are_malformed() {
        let mut row = TaskRow::from(&sample());
        row.status = "archived".into();
        assert_eq!(Task::try_from(row).unwrap_err().kind(), ErrorKind::Malformed);

        let mut row = TaskRow::from(&sample());
        row.start_date = "Jan 21".into();
        assert_eq!(Task::try_from(row).unwrap_err().kind(), ErrorKind::Malformed);

        let mut row = TaskRow::from(&sample());
        row.id = "1".into();
        assert_eq!(Task::try_from(row).unwrap_err().kind(), ErrorKind::Malformed);
    }

    #[test]
    fn empty_end_date_column_reads_as_none() {
        let mut row = TaskRow::from(&sample());
        row.end_date = Some(String::new());
        assert_eq!(Task::try_from(row).unwrap().end_date, None);
    }
}
