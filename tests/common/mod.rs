use std::sync::Arc;

use reovalve_api::db::DbPool;
use reovalve_api::events::{Event, EventSender};
use reovalve_api::migrator::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;

/// Fresh in-memory SQLite database with all migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_db() -> Arc<DbPool> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("migrations failed");
    Arc::new(db)
}

/// Event sender whose receiver is drained in the background so sends never
/// stall a test.
pub fn drained_event_sender() -> EventSender {
    let (tx, mut rx) = mpsc::channel::<Event>(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    EventSender::new(tx)
}
