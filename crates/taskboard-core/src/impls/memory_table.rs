//! InMemoryTaskTable - 開発・テスト用のタスクテーブル
//!
//! # 学習ポイント
//! - tokio::sync::Mutex で await を跨がない排他制御
//! - 失敗の注入（fail_next）でエラー経路をテストする
//! - 呼び出し履歴（calls）で「リモートを呼ばなかった」ことを検証する

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{TableError, UserId};
use crate::ports::{TaskChanges, TaskRow, TaskTable};

/// Which table operation a call or injected failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
    Select,
    Insert,
    Update,
    Delete,
}

/// One recorded call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCall {
    Select { user_id: String },
    Insert { row: TaskRow },
    Update { id: String, changes: TaskChanges },
    Delete { id: String },
}

impl TableCall {
    pub fn op(&self) -> TableOp {
        match self {
            TableCall::Select { .. } => TableOp::Select,
            TableCall::Insert { .. } => TableOp::Insert,
            TableCall::Update { .. } => TableOp::Update,
            TableCall::Delete { .. } => TableOp::Delete,
        }
    }
}

#[derive(Default)]
struct TableState {
    /// Insertion order is the select order.
    rows: Vec<TaskRow>,
    calls: Vec<TableCall>,
    failures: HashMap<TableOp, VecDeque<TableError>>,
}

/// InMemoryTaskTable はホスト型テーブルの代わり
///
/// # 振る舞い
/// - select は user_id で絞り込み、insert 順に返す
/// - insert は id が重複すると Rejected
/// - update / delete は該当行がなくても成功（PostgREST と同じ）
pub struct InMemoryTaskTable {
    state: Mutex<TableState>,
    latency: Option<Duration>,
}

impl InMemoryTaskTable {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            latency: None,
        }
    }

    /// Start with existing rows.
    pub fn with_rows(rows: impl IntoIterator<Item = TaskRow>) -> Self {
        Self {
            state: Mutex::new(TableState {
                rows: rows.into_iter().collect(),
                ..TableState::default()
            }),
            latency: None,
        }
    }

    /// Sleep this long inside every call, to make round trips overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The next call of `op` fails with `error` (queued, one per call).
    pub async fn fail_next(&self, op: TableOp, error: TableError) {
        let mut state = self.state.lock().await;
        state.failures.entry(op).or_default().push_back(error);
    }

    pub async fn rows(&self) -> Vec<TaskRow> {
        self.state.lock().await.rows.clone()
    }

    pub async fn calls(&self) -> Vec<TableCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn count(&self, op: TableOp) -> usize {
        let state = self.state.lock().await;
        state.calls.iter().filter(|call| call.op() == op).count()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for InMemoryTaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableState {
    fn record(&mut self, call: TableCall) -> Result<(), TableError> {
        let op = call.op();
        self.calls.push(call);
        match self.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskTable for InMemoryTaskTable {
    async fn select_for_user(&self, user_id: &UserId) -> Result<Vec<TaskRow>, TableError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.record(TableCall::Select {
            user_id: user_id.to_string(),
        })?;
        Ok(state
            .rows
            .iter()
            .filter(|row| row.user_id == user_id.as_str())
            .cloned()
            .collect())
    }

    async fn insert(&self, row: TaskRow) -> Result<(), TableError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.record(TableCall::Insert { row: row.clone() })?;
        if state.rows.iter().any(|existing| existing.id == row.id) {
            return Err(TableError::rejected(format!(
                "duplicate key value violates unique constraint: id={}",
                row.id
            )));
        }
        state.rows.push(row);
        Ok(())
    }

    async fn update_by_id(&self, id: &str, changes: TaskChanges) -> Result<(), TableError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.record(TableCall::Update {
            id: id.to_string(),
            changes: changes.clone(),
        })?;
        if let Some(row) = state.rows.iter_mut().find(|row| row.id == id) {
            row.apply(&changes);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), TableError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.record(TableCall::Delete { id: id.to_string() })?;
        state.rows.retain(|row| row.id != id);
        Ok(())
    }
}
