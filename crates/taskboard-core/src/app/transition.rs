//! Status transition protocol.
//!
//! Turns a drag gesture (task id, source column, target column) into at most
//! one store update. Pure: no I/O, no clock reads, no mutation of the groups.
//! The grouped collection is rebuilt from the table after the update lands,
//! never spliced locally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskGroups, TaskId, TaskStatus};

/// What happens to `end_date` when a task leaves `Done`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndDatePolicy {
    /// Leaving `Done` clears the stamp.
    #[default]
    Clear,
    /// The last stamp stays on the task.
    Retain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionCommand {
    /// Source and target are the same column; nothing to do.
    NoOp,
    /// Submit this task through the store's update.
    Update(Task),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("task {id} is not in the {from} group")]
    NotInSource { id: TaskId, from: TaskStatus },
}

/// Plan the move of `task_id` from `from` to `to`.
pub fn plan(
    groups: &TaskGroups,
    task_id: TaskId,
    from: TaskStatus,
    to: TaskStatus,
    today: NaiveDate,
    policy: EndDatePolicy,
) -> Result<TransitionCommand, TransitionError> {
    if from == to {
        return Ok(TransitionCommand::NoOp);
    }

    let task = groups
        .find_in(from, task_id)
        .ok_or(TransitionError::NotInSource { id: task_id, from })?;

    Ok(TransitionCommand::Update(retarget(
        task.clone(),
        to,
        today,
        policy,
    )))
}

/// Set `task.status` to `to`, applying the end date rule.
///
/// Entering `Done` stamps `today`. Leaving `Done` follows `policy`. Moves
/// between the other two statuses leave `end_date` alone.
pub fn retarget(mut task: Task, to: TaskStatus, today: NaiveDate, policy: EndDatePolicy) -> Task {
    let from = task.status;
    if from == to {
        return task;
    }

    if to.is_terminal() {
        task.end_date = Some(today);
    } else if from.is_terminal() && policy == EndDatePolicy::Clear {
        task.end_date = None;
    }
    task.status = to;
    task
}
