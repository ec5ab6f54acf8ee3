//! Task status: the partition key of the board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task status.
///
/// The transition graph is fully connected: any status may move to any other
/// one directly. Only entering `Done` has a side effect (end date stamping).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started. Initial status of a created task.
    #[default]
    Todo,

    /// Being worked on.
    #[serde(alias = "inProgress", alias = "in_progress")]
    InProgress,

    /// Finished. Entering this status stamps `end_date`.
    Done,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Column position, matching [`TaskStatus::ALL`].
    pub fn index(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "inProgress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
