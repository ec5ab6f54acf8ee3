//! Store events: what the UI turns into toasts and status indicators.

use super::{TaskId, TaskStatus};
use crate::domain::errors::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The grouped collection was replaced by a fetch.
    Loaded { count: usize },
    Created { id: TaskId },
    Updated { id: TaskId },
    Moved { id: TaskId, from: TaskStatus, to: TaskStatus },
    Deleted { id: TaskId },
    /// A store operation failed; `message` is the user-facing text.
    OperationFailed { op: Operation, message: String },
}

impl StoreEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, StoreEvent::OperationFailed { .. })
    }
}
