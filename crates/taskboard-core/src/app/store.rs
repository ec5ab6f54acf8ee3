//! TaskStore - 現在のユーザーのタスクの唯一の正本（のキャッシュ）
//!
//! # 設計
//! - リモートのテーブルが正本。書き込みが成功するたびに fetch_all で丸ごと作り直す
//! - メモリ上のグループは `Arc<TaskGroups>` を差し替えるだけ（部分更新しない）
//! - 失敗はログに残し、EventSink に通知し、`StoreError` を返す。リトライはしない
//! - WritePolicy::Serialized では書き込み（+ 再取得）を 1 本ずつ流す

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::config::{StoreConfig, WritePolicy};
use super::transition::{self, TransitionCommand, TransitionError};
use crate::domain::{
    DraftErrors, Operation, Session, StoreError, StoreEvent, Task, TaskDraft, TaskGroups, TaskId,
    TaskPatch, TaskStatus,
};
use crate::ports::{Clock, EventSink, IdGenerator, TaskChanges, TaskRow, TaskTable};

pub struct TaskStore {
    table: Arc<dyn TaskTable>,
    session: Session,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
    config: StoreConfig,
    groups: RwLock<Arc<TaskGroups>>,
    write_gate: Mutex<()>,
}

impl TaskStore {
    pub(crate) fn new(
        table: Arc<dyn TaskTable>,
        session: Session,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn EventSink>,
        config: StoreConfig,
    ) -> Self {
        Self {
            table,
            session,
            clock,
            ids,
            events,
            config,
            groups: RwLock::new(Arc::new(TaskGroups::empty())),
            write_gate: Mutex::new(()),
        }
    }

    pub fn builder() -> super::TaskStoreBuilder {
        super::TaskStoreBuilder::new()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The current grouped collection. Cheap; shares the last fetch result.
    pub fn snapshot(&self) -> Arc<TaskGroups> {
        Arc::clone(&self.groups.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn tasks(&self, status: TaskStatus) -> Vec<Task> {
        self.snapshot().get(status).to_vec()
    }

    /// Tasks whose start date is `date`, across all statuses. No remote access.
    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<Task> {
        self.snapshot().by_date(date).cloned().collect()
    }

    /// Validate form input and turn it into a task for the session user,
    /// with a fresh id. Nothing is sent anywhere.
    pub fn task_from_draft(&self, draft: &TaskDraft) -> Result<Task, DraftErrors> {
        let valid = draft.validate()?;
        Ok(valid.into_task(self.ids.generate_task_id(), self.session.user_id.clone()))
    }

    /// Reload the session user's tasks and replace the grouped collection.
    ///
    /// On failure the collection is reset to empty. Under the serialized
    /// policy this waits for an in-flight write and its refetch.
    #[tracing::instrument(skip(self), fields(user_id = %self.session.user_id))]
    pub async fn fetch_all(&self) -> Result<usize, StoreError> {
        let _gate = self.write_gate().await;
        self.reload().await
    }

    /// Insert a new task, then refetch.
    #[tracing::instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn add(&self, mut task: Task) -> Result<(), StoreError> {
        self.authorize(Operation::Create, &task)?;
        if task.color.is_none() {
            task.color = Some(self.config.default_color.clone());
        }

        let _gate = self.write_gate().await;
        if let Err(source) = self.table.insert(TaskRow::from(&task)).await {
            return Err(self.fail(StoreError::Remote {
                op: Operation::Create,
                source,
            }));
        }
        info!("task created");
        self.events.emit(StoreEvent::Created { id: task.id });
        self.refresh().await;
        Ok(())
    }

    /// Write every field of `task` (but its id) to the existing row, then refetch.
    #[tracing::instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn update(&self, task: Task) -> Result<(), StoreError> {
        self.write_update(Operation::Update, |groups| {
            self.cached(groups, Operation::Update, task.id)?;
            let id = task.id;
            Ok(Some((task, StoreEvent::Updated { id })))
        })
        .await
        .map(drop)
    }

    /// Partial edit (calendar view). A status change in the patch gets the
    /// same end date rule as a drag. An empty patch writes nothing.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(&self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            debug!("empty patch, nothing to write");
            return Ok(());
        }

        self.write_update(Operation::Update, |groups| {
            let mut task = self.cached(groups, Operation::Update, id)?;
            task.apply(&patch);
            if let Some(status) = patch.status {
                task = transition::retarget(
                    task,
                    status,
                    self.today(),
                    self.config.end_date_policy,
                );
            }
            Ok(Some((task, StoreEvent::Updated { id })))
        })
        .await
        .map(drop)
    }

    /// Drag `id` from the `from` column to the `to` column.
    ///
    /// Returns `Ok(false)` for a same-column drop, which touches nothing.
    #[tracing::instrument(skip(self))]
    pub async fn move_task(
        &self,
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    ) -> Result<bool, StoreError> {
        if from == to {
            debug!("dropped on its own column, ignoring");
            return Ok(false);
        }

        self.write_update(Operation::Move, |groups| {
            let command = transition::plan(
                groups,
                id,
                from,
                to,
                self.today(),
                self.config.end_date_policy,
            );
            match command {
                Ok(TransitionCommand::NoOp) => Ok(None),
                Ok(TransitionCommand::Update(task)) => {
                    Ok(Some((task, StoreEvent::Moved { id, from, to })))
                }
                Err(TransitionError::NotInSource { id, from }) => {
                    Err(self.fail(StoreError::TaskNotFound {
                        op: Operation::Move,
                        id,
                        status: Some(from),
                    }))
                }
            }
        })
        .await
    }

    /// Delete the row, then refetch.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let _gate = self.write_gate().await;
        let task = self.cached(&self.snapshot(), Operation::Delete, id)?;
        self.authorize(Operation::Delete, &task)?;

        if let Err(source) = self.table.delete_by_id(&id.to_string()).await {
            return Err(self.fail(StoreError::Remote {
                op: Operation::Delete,
                source,
            }));
        }
        info!("task deleted");
        self.events.emit(StoreEvent::Deleted { id });
        self.refresh().await;
        Ok(())
    }

    /// Take the gate, then build the row from the groups as they are now, so
    /// a queued write sees the result of the one before it.
    ///
    /// `build` returns `None` when there is nothing to write. The result
    /// tells whether a write happened.
    async fn write_update<F>(&self, op: Operation, build: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&TaskGroups) -> Result<Option<(Task, StoreEvent)>, StoreError>,
    {
        let _gate = self.write_gate().await;
        let Some((task, done)) = build(&self.snapshot())? else {
            return Ok(false);
        };
        self.authorize(op, &task)?;

        let id = task.id;
        if let Err(source) = self
            .table
            .update_by_id(&id.to_string(), TaskChanges::from(&task))
            .await
        {
            return Err(self.fail(StoreError::Remote { op, source }));
        }
        info!(task_id = %id, status = %task.status, "task updated");
        self.events.emit(done);
        self.refresh().await;
        Ok(true)
    }

    /// Select and replace the groups. Callers hold the gate (or run concurrent).
    async fn reload(&self) -> Result<usize, StoreError> {
        match self.table.select_for_user(&self.session.user_id).await {
            Ok(rows) => {
                let groups = self.load_rows(rows);
                let count = groups.len();
                self.replace(groups);
                info!(count, "tasks loaded");
                self.events.emit(StoreEvent::Loaded { count });
                Ok(count)
            }
            Err(source) => {
                self.replace(TaskGroups::empty());
                Err(self.fail(StoreError::Remote {
                    op: Operation::Fetch,
                    source,
                }))
            }
        }
    }

    /// Refetch after a successful write. A failed refetch is already logged
    /// and reported by `reload`; the write itself stands.
    async fn refresh(&self) {
        if let Err(err) = self.reload().await {
            debug!(error = %err, "refetch after write failed");
        }
    }

    async fn write_gate(&self) -> Option<MutexGuard<'_, ()>> {
        match self.config.write_policy {
            WritePolicy::Serialized => Some(self.write_gate.lock().await),
            WritePolicy::Concurrent => None,
        }
    }

    fn cached(
        &self,
        groups: &TaskGroups,
        op: Operation,
        id: TaskId,
    ) -> Result<Task, StoreError> {
        groups.find(id).cloned().ok_or_else(|| {
            self.fail(StoreError::TaskNotFound {
                op,
                id,
                status: None,
            })
        })
    }

    fn authorize(&self, op: Operation, task: &Task) -> Result<(), StoreError> {
        if task.is_owned_by(&self.session.user_id) {
            return Ok(());
        }
        Err(self.fail(StoreError::NotOwner {
            op,
            id: task.id,
            owner: task.user_id.clone(),
            session: self.session.user_id.clone(),
        }))
    }

    fn load_rows(&self, rows: Vec<TaskRow>) -> TaskGroups {
        let tasks = rows.into_iter().filter_map(|row| match Task::try_from(row) {
            Ok(task) if task.is_owned_by(&self.session.user_id) => Some(task),
            Ok(task) => {
                warn!(
                    task_id = %task.id,
                    owner = %task.user_id,
                    "skipping row owned by another user"
                );
                None
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable row");
                None
            }
        });
        TaskGroups::partition(tasks)
    }

    fn replace(&self, groups: TaskGroups) {
        *self.groups.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(groups);
    }

    /// Log and report a failure, handing the error back to the caller.
    fn fail(&self, err: StoreError) -> StoreError {
        error!(operation = %err.operation(), error = %err, "store operation failed");
        self.events.emit(StoreEvent::OperationFailed {
            op: err.operation(),
            message: err.user_message(),
        });
        err
    }
}
