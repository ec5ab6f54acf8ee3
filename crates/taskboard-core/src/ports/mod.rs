//! Ports - 抽象化レイヤー
//!
//! 外部システム（ホスト型 BaaS のテーブル、時計、ID 採番、UI 通知）への
//! インターフェースを定義します。実装は `impls` にあります。

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod task_table;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::task_table::{TaskChanges, TaskRow, TaskTable};
