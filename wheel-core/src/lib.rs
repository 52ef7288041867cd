//! Prize wheel core - shared store, data model and settings.
//!
//! Every participant, observer and moderator process opens the same store.
//! The config document and the record collection are exposed through
//! [`ConfigDocument`] and [`RecordCollection`], both with live subscriptions.

pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use config::{SpinSettings, SyncSettings, WheelSettings};
pub use error::{Result, WheelError};
pub use storage::{
    ConfigDocument, ConfigStore, RecordCollection, RecordStore, Storage, Subscription,
};
pub use types::{
    is_valid_label, normalize_name, Claim, DeleteReport, NewPlayRecord, PlayRecord, WheelConfig,
};

use std::path::Path;
use std::sync::Arc;

/// Opens `<data_dir>/wheel.db` and returns both stores over it.
pub async fn open_stores(
    data_dir: &Path,
    settings: &WheelSettings,
) -> Result<(ConfigStore, RecordStore)> {
    let db_path = data_dir.join("wheel.db");
    let storage = Arc::new(Storage::new(&db_path, settings.sync.poll_interval()).await?);

    Ok((ConfigStore::new(storage.clone()), RecordStore::new(storage)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_stores_share_database() {
        let temp_dir = tempdir().unwrap();
        let settings = WheelSettings::default();
        let (config_store, record_store) = open_stores(temp_dir.path(), &settings).await.unwrap();

        config_store
            .set(&WheelConfig::parse("A\nB"))
            .await
            .unwrap();
        record_store
            .insert(&NewPlayRecord::new("Eve", "A"))
            .await
            .unwrap();

        let (config_store, record_store) = open_stores(temp_dir.path(), &settings).await.unwrap();
        assert_eq!(config_store.get().await.unwrap().unwrap().len(), 2);
        assert_eq!(record_store.list_recent().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_config_unavailable() {
        let temp_dir = tempdir().unwrap();
        // A directory where the database file should be
        let blocked = temp_dir.path().join("wheel.db");
        std::fs::create_dir_all(&blocked).unwrap();

        let err = open_stores(temp_dir.path(), &WheelSettings::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, WheelError::ConfigUnavailable(_)));
    }
}
