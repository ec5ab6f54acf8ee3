//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **TaskStoreBuilder**: ストアの構築とワイヤリング
//! - **TaskStore**: タスクのキャッシュと CRUD（書き込みのたびに再取得）
//! - **transition**: ドラッグ移動をストア更新に変換する純粋関数
//! - **BoardView**: カラムごとのページング状態
//! - **StoreConfig**: 設定（TOML ファイル + 環境変数）

pub mod board;
pub mod builder;
pub mod config;
pub mod store;
pub mod transition;

// 主要な型を再エクスポート
pub use self::board::{BoardView, Column};
pub use self::builder::{BuildError, TaskStoreBuilder};
pub use self::config::{ConfigError, EndDatePolicy, StoreConfig, WritePolicy};
pub use self::store::TaskStore;
pub use self::transition::{TransitionCommand, TransitionError};
