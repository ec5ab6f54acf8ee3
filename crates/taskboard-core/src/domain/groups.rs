//! The grouped view: the task collection partitioned by status.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Task, TaskId, TaskStatus};

/// Per-status counts, used for column headers ("todo (3)").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

/// Three ordered lists, one per status.
///
/// Invariant: every task sits in the list matching its `status`, and no id
/// appears twice across the lists. Only [`TaskGroups::partition`] builds a
/// non-empty value, which is how the invariant is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGroups {
    todo: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl TaskGroups {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Partition tasks by status, keeping their order.
    ///
    /// A repeated id keeps its first occurrence.
    pub fn partition(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut groups = Self::default();
        let mut seen = HashSet::new();
        for task in tasks {
            if !seen.insert(task.id) {
                tracing::warn!(
                    task_id = %task.id,
                    "duplicate task id in result set, keeping first"
                );
                continue;
            }
            groups.list_mut(task.status).push(task);
        }
        groups
    }

    fn list_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn get(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// All tasks, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.done.iter())
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.iter().find(|task| task.id == id)
    }

    /// Look only in the given status group.
    pub fn find_in(&self, status: TaskStatus, id: TaskId) -> Option<&Task> {
        self.get(status).iter().find(|task| task.id == id)
    }

    /// Tasks starting on `date`, across all three groups. Lazy.
    pub fn by_date(&self, date: NaiveDate) -> impl Iterator<Item = &Task> {
        self.iter().filter(move |task| task.start_date == date)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            todo: self.todo.len(),
            in_progress: self.in_progress.len(),
            done: self.done.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use ulid::Ulid;

    fn task(content: &str, date: &str, status: TaskStatus) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            UserId::new("u1"),
            content,
            date.parse().unwrap(),
        )
        .with_status(status)
    }

    #[test]
    fn partition_places_each_task_in_its_status_group() {
        let tasks = vec![
            task("a", "2025-01-21", TaskStatus::Todo),
            task("b", "2025-01-21", TaskStatus::Done),
            task("c", "2025-01-22", TaskStatus::InProgress),
            task("d", "2025-01-23", TaskStatus::Todo),
        ];

        let groups = TaskGroups::partition(tasks.clone());

        assert_eq!(groups.len(), 4);
        for status in TaskStatus::ALL {
            assert!(groups.get(status).iter().all(|t| t.status == status));
        }
        // 取得順を保つ
        let todo: Vec<_> = groups
            .get(TaskStatus::Todo)
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(todo, vec!["a", "d"]);
    }

    #[test]
    fn partition_drops_repeated_ids() {
        let first = task("a", "2025-01-21", TaskStatus::Todo);
        let mut again = first.clone();
        again.status = TaskStatus::Done;

        let groups = TaskGroups::partition(vec![first.clone(), again]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.find(first.id).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn by_date_spans_all_groups() {
        let groups = TaskGroups::partition(vec![
            task("a", "2025-01-21", TaskStatus::Todo),
            task("b", "2025-01-21", TaskStatus::Done),
            task("c", "2025-01-22", TaskStatus::InProgress),
        ]);

        let hits: Vec<_> = groups
            .by_date("2025-01-21".parse().unwrap())
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(hits, vec!["a", "b"]);
        assert_eq!(groups.by_date("2025-02-01".parse().unwrap()).count(), 0);
    }

    #[test]
    fn find_in_respects_group() {
        let t = task("a", "2025-01-21", TaskStatus::InProgress);
        let groups = TaskGroups::partition(vec![t.clone()]);
        assert!(groups.find_in(TaskStatus::InProgress, t.id).is_some());
        assert!(groups.find_in(TaskStatus::Todo, t.id).is_none());
    }

    #[test]
    fn counts_per_status() {
        let groups = TaskGroups::partition(vec![
            task("a", "2025-01-21", TaskStatus::Todo),
            task("b", "2025-01-21", TaskStatus::Todo),
            task("c", "2025-01-22", TaskStatus::Done),
        ]);
        let counts = groups.counts();
        assert_eq!(counts, StatusCounts { todo: 2, in_progress: 0, done: 1 });
        assert_eq!(counts.total(), 3);
        assert!(TaskGroups::empty().is_empty());
    }
}
