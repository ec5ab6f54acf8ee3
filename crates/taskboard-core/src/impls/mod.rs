//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTaskTable**: 開発・テスト用のテーブル（失敗注入・呼び出し履歴つき）
//! - **RestTaskTable**: ホスト型 BaaS の REST テーブル
//! - **NoopEventSink / RecordingEventSink**: イベントの通知先

pub mod event_sink;
pub mod memory_table;
pub mod rest_table;

pub use self::event_sink::{NoopEventSink, RecordingEventSink};
pub use self::memory_table::{InMemoryTaskTable, TableCall, TableOp};
pub use self::rest_table::RestTaskTable;
