//! TaskStoreBuilder - ストアの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 省略されたポートにはデフォルト実装を差し込む

use std::sync::Arc;

use super::config::{ConfigError, StoreConfig};
use super::store::TaskStore;
use crate::domain::{Session, UserId};
use crate::impls::NoopEventSink;
use crate::ports::{Clock, EventSink, IdGenerator, SystemClock, TaskTable, UlidGenerator};

/// TaskStoreBuilder は TaskStore を構築
///
/// # 使用例
/// ```ignore
/// let store = TaskStore::builder()
///     .table(Arc::new(InMemoryTaskTable::new()))
///     .user("user-1")
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - table と session は必須。無ければ build() が BuildError を返す
/// - config は StoreConfig::validate で検証する
/// - clock / id_generator / event_sink は省略可（SystemClock, UlidGenerator, NoopEventSink）
#[derive(Default)]
pub struct TaskStoreBuilder {
    table: Option<Arc<dyn TaskTable>>,
    session: Option<Session>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    events: Option<Arc<dyn EventSink>>,
    config: StoreConfig,
}

/// BuildError はストア構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no task table configured")]
    MissingTable,
    #[error("no session: the store needs an authenticated user")]
    MissingSession,
    #[error("invalid store config: {0}")]
    Config(#[from] ConfigError),
}

impl TaskStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Arc<dyn TaskTable>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Shorthand for `session(Session::new(UserId::new(user_id)))`.
    pub fn user(self, user_id: impl Into<String>) -> Self {
        self.session(Session::new(UserId::new(user_id)))
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// # 検証
    /// - table / session が設定されているか
    /// - config が StoreConfig::validate を通るか
    pub fn build(self) -> Result<TaskStore, BuildError> {
        let table = self.table.ok_or(BuildError::MissingTable)?;
        let session = self.session.ok_or(BuildError::MissingSession)?;
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));
        let events = self.events.unwrap_or_else(|| Arc::new(NoopEventSink));

        Ok(TaskStore::new(table, session, clock, ids, events, self.config))
    }
}
