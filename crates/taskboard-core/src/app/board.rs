//! Board columns with "show more" paging.

use crate::domain::{Task, TaskGroups, TaskStatus};

/// One rendered column: its status, the visible prefix, and what is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: &'a [Task],
    pub total: usize,
    pub hidden: usize,
}

/// How many tasks each column shows.
///
/// Each column starts at one page and grows by one page per `show_more`.
/// The view holds no tasks; it slices whatever groups it is given, so it
/// stays valid across refetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    page_size: usize,
    limits: [usize; 3],
}

impl BoardView {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            limits: [page_size; 3],
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn limit(&self, status: TaskStatus) -> usize {
        self.limits[status.index()]
    }

    pub fn show_more(&mut self, status: TaskStatus) {
        self.limits[status.index()] += self.page_size;
    }

    /// Back to one page per column.
    pub fn reset(&mut self) {
        self.limits = [self.page_size; 3];
    }

    pub fn visible<'a>(&self, groups: &'a TaskGroups, status: TaskStatus) -> &'a [Task] {
        let tasks = groups.get(status);
        &tasks[..tasks.len().min(self.limit(status))]
    }

    pub fn hidden_count(&self, groups: &TaskGroups, status: TaskStatus) -> usize {
        groups.get(status).len().saturating_sub(self.limit(status))
    }

    pub fn columns<'a>(&self, groups: &'a TaskGroups) -> [Column<'a>; 3] {
        TaskStatus::ALL.map(|status| Column {
            status,
            tasks: self.visible(groups, status),
            total: groups.get(status).len(),
            hidden: self.hidden_count(groups, status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, UserId};
    use ulid::Ulid;

    fn groups(todo: usize, done: usize) -> TaskGroups {
        let make = |i: usize, status| {
            Task::new(
                TaskId::from_ulid(Ulid::new()),
                UserId::new("u1"),
                format!("task {i}"),
                "2025-01-21".parse().unwrap(),
            )
            .with_status(status)
        };
        TaskGroups::partition(
            (0..todo)
                .map(|i| make(i, TaskStatus::Todo))
                .chain((0..done).map(|i| make(i, TaskStatus::Done))),
        )
    }

    #[test]
    fn shows_one_page_then_grows() {
        let groups = groups(12, 0);
        let mut view = BoardView::new(7);

        assert_eq!(view.visible(&groups, TaskStatus::Todo).len(), 7);
        assert_eq!(view.hidden_count(&groups, TaskStatus::Todo), 5);

        view.show_more(TaskStatus::Todo);
        assert_eq!(view.visible(&groups, TaskStatus::Todo).len(), 12);
        assert_eq!(view.hidden_count(&groups, TaskStatus::Todo), 0);
        assert_eq!(view.limit(TaskStatus::Todo), 14);
        // 他の列には影響しない
        assert_eq!(view.limit(TaskStatus::Done), 7);
    }

    #[test]
    fn visible_keeps_group_order() {
        let groups = groups(3, 0);
        let view = BoardView::new(2);
        let visible: Vec<_> = view
            .visible(&groups, TaskStatus::Todo)
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(visible, vec!["task 0", "task 1"]);
    }

    #[test]
    fn columns_summarize_every_status() {
        let groups = groups(9, 2);
        let columns = BoardView::new(7).columns(&groups);

        assert_eq!(columns[0].status, TaskStatus::Todo);
        assert_eq!((columns[0].tasks.len(), columns[0].total, columns[0].hidden), (7, 9, 2));
        assert_eq!((columns[1].tasks.len(), columns[1].total, columns[1].hidden), (0, 0, 0));
        assert_eq!((columns[2].tasks.len(), columns[2].total, columns[2].hidden), (2, 2, 0));
    }

    #[test]
    fn reset_and_zero_page_size() {
        let mut view = BoardView::new(0);
        assert_eq!(view.page_size(), 1);
        view.show_more(TaskStatus::Done);
        view.reset();
        assert_eq!(view.limit(TaskStatus::Done), 1);
    }
}
