//! Errors - エラー型と分類
//!
//! - `TableError`: リモートテーブル呼び出しの失敗（ErrorKind で分類）
//! - `StoreError`: ストア操作の失敗（リモート失敗 + ローカル前提条件違反）
//!
//! どちらもリトライはしない。ログに残し、イベントで通知して終わり。

use std::fmt;

use super::{TaskId, TaskStatus, UserId};

/// ErrorKind はリモート呼び出しエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, 5xx.
    Transient,
    /// Rejected by an access policy (401/403, row-level security).
    Permission,
    /// Rejected by the table itself (constraint violation, bad request).
    Rejected,
    /// The row came back in a shape we cannot read.
    Malformed,
}

/// Failure of one call to the remote task table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct TableError {
    kind: ErrorKind,
    message: String,
}

impl TableError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permission, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The store operation an error or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Move,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Move => "move",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("remote {op} failed: {source}")]
    Remote {
        op: Operation,
        #[source]
        source: TableError,
    },

    #[error("cannot {op} task {id}: not found{}", in_group(.status))]
    TaskNotFound {
        op: Operation,
        id: TaskId,
        status: Option<TaskStatus>,
    },

    #[error("user {session} may not {op} task {id} owned by {owner}")]
    NotOwner {
        op: Operation,
        id: TaskId,
        owner: UserId,
        session: UserId,
    },
}

fn in_group(status: &Option<TaskStatus>) -> String {
    status
        .map(|s| format!(" in the {s} group"))
        .unwrap_or_default()
}

impl StoreError {
    pub fn operation(&self) -> Operation {
        match self {
            StoreError::Remote { op, .. }
            | StoreError::TaskNotFound { op, .. }
            | StoreError::NotOwner { op, .. } => *op,
        }
    }

    /// Text for the non-blocking failure notification.
    pub fn user_message(&self) -> String {
        match self.operation() {
            Operation::Fetch => "Failed to fetch tasks".to_string(),
            op => format!("Failed to {op} task"),
        }
    }

    /// Whether the remote table was reached at all.
    pub fn is_remote(&self) -> bool {
        matches!(self, StoreError::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn user_messages_name_the_operation() {
        let remote = StoreError::Remote {
            op: Operation::Create,
            source: TableError::transient("connection reset"),
        };
        assert_eq!(remote.user_message(), "Failed to create task");

        let fetch = StoreError::Remote {
            op: Operation::Fetch,
            source: TableError::permission("jwt expired"),
        };
        assert_eq!(fetch.user_message(), "Failed to fetch tasks");
    }

    #[test]
    fn not_found_mentions_group_when_known() {
        let id = TaskId::from_ulid(Ulid::new());
        let err = StoreError::TaskNotFound {
            op: Operation::Move,
            id,
            status: Some(TaskStatus::Todo),
        };
        assert_eq!(err.to_string(), format!("cannot move task {id}: not found in the todo group"));
        assert_eq!(err.user_message(), "Failed to move task");
        assert!(!err.is_remote());
    }

    #[test]
    fn table_error_keeps_kind() {
        let err = TableError::rejected("duplicate key");
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.message(), "duplicate key");
        assert_eq!(err.to_string(), "Rejected: duplicate key");
    }
}
