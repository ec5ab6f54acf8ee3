//! taskboard-core
//!
//! Core building blocks for a per-user task board: a cached, grouped view of
//! the user's tasks backed by a hosted table, and the drag-and-drop status
//! transition protocol.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, status, task, groups, draft, events, errors）
//! - **ports**: 抽象化レイヤー（TaskTable, Clock, IdGenerator, EventSink）
//! - **app**: アプリケーションロジック（TaskStore, transition, board, config, builder）
//! - **impls**: 実装（InMemoryTaskTable は開発・テスト用、RestTaskTable は PostgREST 用）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{TaskStore, TaskStoreBuilder};
