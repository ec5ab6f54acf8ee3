//! EventSink port - ストアイベントの通知先
//!
//! UI はここで受け取ったイベントをトーストや進捗表示に変換する。
//!
//! # 実装
//! - NoopEventSink: 何もしない（既定）
//! - RecordingEventSink: 受け取ったイベントを溜める（テスト・CLI 用）

use crate::domain::StoreEvent;

/// EventSink はストアのイベントを受け取る
///
/// `emit` は同期的で、失敗しない。ストアの操作を止めてはいけない。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: StoreEvent);
}
