use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use tracing_subscriber::EnvFilter;

use taskboard_core::app::{BoardView, StoreConfig, TaskStore};
use taskboard_core::domain::{TaskDraft, TaskGroups, TaskStatus};
use taskboard_core::impls::{InMemoryTaskTable, RecordingEventSink, RestTaskTable};
use taskboard_core::ports::TaskTable;

/// REST の接続情報が揃っていればホスト型テーブル、無ければインメモリ
fn table_from_env() -> Arc<dyn TaskTable> {
    match (
        std::env::var("TASKBOARD_REST_URL"),
        std::env::var("TASKBOARD_REST_KEY"),
    ) {
        (Ok(url), Ok(key)) => {
            let mut table = RestTaskTable::new(url, key);
            if let Ok(token) = std::env::var("TASKBOARD_ACCESS_TOKEN") {
                table = table.with_access_token(token);
            }
            tracing::info!(endpoint = %table.endpoint(), "using hosted task table");
            Arc::new(table)
        }
        _ => {
            tracing::info!("TASKBOARD_REST_URL not set, using in-memory task table");
            Arc::new(InMemoryTaskTable::new())
        }
    }
}

fn seed_drafts(today: NaiveDate) -> Vec<TaskDraft> {
    let day = |offset: i64| (today + Duration::days(offset)).to_string();
    vec![
        TaskDraft::new("Write release notes", day(0)),
        TaskDraft::new("Review open pull requests", day(0)),
        TaskDraft {
            color: Some("#10B981".into()),
            ..TaskDraft::new("Plan sprint", day(1))
        },
        TaskDraft {
            end_date: day(3),
            ..TaskDraft::new("Migrate staging database", day(2))
        },
    ]
}

fn print_board(board: &BoardView, groups: &TaskGroups) {
    for column in board.columns(groups) {
        println!("[{}] {} task(s)", column.status, column.total);
        for task in column.tasks {
            let end = task.end_date.map(|d| d.to_string()).unwrap_or_default();
            println!("  - {} ({} .. {})", task.content, task.start_date, end);
        }
        if column.hidden > 0 {
            println!("  ... {} more", column.hidden);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) 設定とポートを用意
    let config_path = std::env::var_os("TASKBOARD_CONFIG").map(PathBuf::from);
    let config = StoreConfig::load(config_path.as_deref()).context("loading store config")?;
    let user_id = std::env::var("TASKBOARD_USER_ID").unwrap_or_else(|_| "demo-user".to_string());
    let events = Arc::new(RecordingEventSink::new());

    let store = TaskStore::builder()
        .table(table_from_env())
        .user(user_id)
        .event_sink(events.clone())
        .config(config)
        .build()?;

    // (B) 初回ロード（失敗しても空のボードで続行）
    if let Err(err) = store.fetch_all().await {
        tracing::warn!(error = %err, "initial fetch failed, starting from an empty board");
    }

    // (C) フォーム入力からタスクを作成（検証 → 採番 → insert → 再取得）
    for draft in seed_drafts(store.today()) {
        let task = store.task_from_draft(&draft)?;
        store.add(task).await?;
    }

    // (D) ドラッグ移動: todo → in-progress → done（done で end_date が今日になる）
    let first = store
        .snapshot()
        .get(TaskStatus::Todo)
        .first()
        .map(|task| task.id);
    if let Some(id) = first {
        store.move_task(id, TaskStatus::Todo, TaskStatus::InProgress).await?;
        store.move_task(id, TaskStatus::InProgress, TaskStatus::Done).await?;
        // 同じカラムへのドロップは何もしない
        let moved = store.move_task(id, TaskStatus::Done, TaskStatus::Done).await?;
        tracing::debug!(moved, "same-column drop");
    }

    // (E) ボードとカレンダーの表示
    let groups = store.snapshot();
    let board = BoardView::new(store.config().page_size);
    print_board(&board, &groups);

    let today = store.today();
    println!("tasks starting {today}:");
    for task in store.tasks_by_date(today) {
        println!("  - [{}] {}", task.status, task.content);
    }

    for notice in events.failures() {
        println!("notice: {notice:?}");
    }
    println!("counts: {:?}", groups.counts());
    Ok(())
}
