use crate::error::Result;
use crate::storage::subscription::{self, Subscription};
use crate::storage::{ConfigDocument, Storage, Topic};
use crate::types::WheelConfig;
use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

const WHEEL_CONFIG_KEY: &str = "wheelConfig";

#[derive(Clone)]
pub struct ConfigStore {
    storage: Arc<Storage>,
}

impl ConfigStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    async fn load(storage: &Storage) -> Result<Option<WheelConfig>> {
        let conn = storage.get_connection().await;

        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![WHEEL_CONFIG_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ConfigDocument for ConfigStore {
    async fn get(&self) -> Result<Option<WheelConfig>> {
        Self::load(&self.storage).await
    }

    async fn set(&self, config: &WheelConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string(config)?;

        {
            let conn = self.storage.get_connection().await;
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![WHEEL_CONFIG_KEY, json, Utc::now().timestamp_millis()],
            )?;
        }

        self.storage.notify(Topic::Config);
        tracing::info!("Saved wheel config with {} items", config.len());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<Option<WheelConfig>> {
        subscription::watch(
            self.storage.clone(),
            Topic::Config,
            Box::new(|storage: Arc<Storage>| async move { Self::load(&storage).await }.boxed()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    async fn store() -> ConfigStore {
        let storage = Storage::in_memory(Duration::from_millis(20)).await.unwrap();
        ConfigStore::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn test_get_absent_document() {
        let store = store().await;
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_whole_document() {
        let store = store().await;
        store
            .set(&WheelConfig::parse("A\nB\nC\nD\nE"))
            .await
            .unwrap();
        store.set(&WheelConfig::parse("X\nY")).await.unwrap();

        let config = store.get().await.unwrap().unwrap();
        assert_eq!(config.items, vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn test_set_accepts_empty_document() {
        let store = store().await;
        store.set(&WheelConfig::default()).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(WheelConfig::default()));
    }

    #[tokio::test]
    async fn test_set_rejects_blank_items() {
        let store = store().await;
        let config = WheelConfig {
            items: vec!["A".into(), "".into()],
        };
        assert!(store.set(&config).await.is_err());
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_read_then_changes() {
        let store = store().await;
        let mut subscription = store.subscribe();

        let initial = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
        assert_eq!(initial.unwrap(), None);

        store.set(&WheelConfig::parse("A\nB")).await.unwrap();
        let update = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
        assert_eq!(update.unwrap().unwrap().items, vec!["A", "B"]);

        store.set(&WheelConfig::parse("C")).await.unwrap();
        let update = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
        assert_eq!(update.unwrap().unwrap().items, vec!["C"]);
    }

    #[tokio::test]
    async fn test_subscribe_sees_writes_from_other_connection() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("wheel.db");
        let poll = Duration::from_millis(20);

        let participant = ConfigStore::new(Arc::new(Storage::new(&db_path, poll).await.unwrap()));
        let moderator = ConfigStore::new(Arc::new(Storage::new(&db_path, poll).await.unwrap()));

        let mut subscription = participant.subscribe();
        let initial = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
        assert_eq!(initial.unwrap(), None);

        moderator
            .set(&WheelConfig::parse("Mug\nSticker"))
            .await
            .unwrap();

        let update = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
        assert_eq!(update.unwrap().unwrap().items, vec!["Mug", "Sticker"]);
    }
}
