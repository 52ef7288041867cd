pub mod config_store;
pub mod record_store;
pub mod subscription;

pub use config_store::ConfigStore;
pub use record_store::RecordStore;
pub use subscription::Subscription;

use crate::error::{Result, WheelError};
use crate::types::{Claim, DeleteReport, NewPlayRecord, PlayRecord, WheelConfig};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

/// Which part of the store a committed write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Config,
    Records,
}

/// Shared SQLite store.
///
/// Writes made through this handle are announced on an in-process broadcast
/// channel; writes from other connections to the same file are picked up by
/// subscriptions polling `PRAGMA data_version`.
pub struct Storage {
    conn: Mutex<Connection>,
    changes: broadcast::Sender<Topic>,
    poll_interval: Duration,
}

impl Storage {
    pub async fn new(db_path: &Path, poll_interval: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                WheelError::unavailable(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| {
            WheelError::unavailable(format!("Failed to open {}: {}", db_path.display(), e))
        })?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(|e| WheelError::unavailable(format!("Failed to configure store: {}", e)))?;

        Self::with_connection(conn, poll_interval).await
    }

    pub async fn in_memory(poll_interval: Duration) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| WheelError::unavailable(format!("Failed to open store: {}", e)))?;

        Self::with_connection(conn, poll_interval).await
    }

    async fn with_connection(conn: Connection, poll_interval: Duration) -> Result<Self> {
        let (changes, _) = broadcast::channel(64);
        let storage = Self {
            conn: Mutex::new(conn),
            changes,
            poll_interval,
        };

        storage
            .init_schema()
            .await
            .map_err(|e| WheelError::unavailable(format!("Failed to initialize store: {}", e)))?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        // Singleton documents, keyed by name
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        // Play records; uniqueness per user is enforced by the claim path only
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                user TEXT NOT NULL,
                result TEXT NOT NULL,
                timestamp INTEGER
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_records_user ON records (user)",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn notify(&self, topic: Topic) {
        // No receivers is fine
        let _ = self.changes.send(topic);
    }

    pub(crate) fn changes(&self) -> broadcast::Receiver<Topic> {
        self.changes.subscribe()
    }

    /// Changes whenever another connection commits to the database file.
    pub(crate) async fn data_version(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let version = conn.query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(version)
    }
}

/// The singleton prize-list document.
#[async_trait]
pub trait ConfigDocument: Send + Sync {
    async fn get(&self) -> Result<Option<WheelConfig>>;

    /// Replaces the whole document.
    async fn set(&self, config: &WheelConfig) -> Result<()>;

    /// Fires with the current value first, then on every change.
    fn subscribe(&self) -> Subscription<Option<WheelConfig>>;
}

/// The shared collection of play results.
#[async_trait]
pub trait RecordCollection: Send + Sync {
    async fn query_by_user(&self, user: &str) -> Result<Vec<PlayRecord>>;

    /// Plain append; does not look at existing records.
    async fn insert(&self, record: &NewPlayRecord) -> Result<PlayRecord>;

    /// Appends only if no record exists for `record.user`, atomically.
    async fn insert_if_absent(&self, record: &NewPlayRecord) -> Result<Claim>;

    /// All records, newest first.
    async fn list_recent(&self) -> Result<Vec<PlayRecord>>;

    fn subscribe_recent(&self) -> Subscription<Vec<PlayRecord>>;

    async fn delete_all(&self) -> Result<DeleteReport>;
}
