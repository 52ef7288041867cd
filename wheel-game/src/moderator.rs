use crate::Result;
use std::sync::Arc;
use wheel_core::{
    ConfigDocument, DeleteReport, PlayRecord, RecordCollection, Subscription, WheelConfig,
};

/// Moderator surface: edits the shared prize list and wipes play history.
pub struct Moderator {
    config: Arc<dyn ConfigDocument>,
    records: Arc<dyn RecordCollection>,
    placeholder: Vec<String>,
}

impl Moderator {
    pub fn new(
        config: Arc<dyn ConfigDocument>,
        records: Arc<dyn RecordCollection>,
        placeholder: Vec<String>,
    ) -> Self {
        Self {
            config,
            records,
            placeholder,
        }
    }

    /// Current list as editable text, or the placeholder when nothing has
    /// been published yet.
    pub async fn load_for_edit(&self) -> Result<String> {
        match self.config.get().await? {
            Some(config) => Ok(config.to_text()),
            None => Ok(self.placeholder.join("\n")),
        }
    }

    pub async fn current(&self) -> Result<Option<WheelConfig>> {
        Ok(self.config.get().await?)
    }

    /// Publishes `text` as the whole list, one label per line.
    pub async fn save(&self, text: &str) -> Result<WheelConfig> {
        let config = WheelConfig::parse(text);
        self.config.set(&config).await?;

        tracing::info!("Moderator saved wheel config with {} items", config.len());
        Ok(config)
    }

    /// Publishes `items` in order. Blank labels are rejected, not dropped.
    pub async fn save_items(&self, items: Vec<String>) -> Result<WheelConfig> {
        let config = WheelConfig::new(items)?;
        self.config.set(&config).await?;

        tracing::info!("Moderator saved wheel config with {} items", config.len());
        Ok(config)
    }

    pub async fn clear_history(&self) -> Result<DeleteReport> {
        let report = self.records.delete_all().await?;

        tracing::info!(
            "Play history cleared: {}/{} records deleted",
            report.deleted,
            report.total
        );
        Ok(report)
    }

    pub async fn history(&self) -> Result<Vec<PlayRecord>> {
        Ok(self.records.list_recent().await?)
    }

    pub fn watch_history(&self) -> Subscription<Vec<PlayRecord>> {
        self.records.subscribe_recent()
    }

    pub fn watch_config(&self) -> Subscription<Option<WheelConfig>> {
        self.config.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameError;
    use std::time::Duration;
    use tempfile::tempdir;
    use wheel_core::{
        open_stores, ConfigStore, NewPlayRecord, RecordStore, Storage, WheelError, WheelSettings,
    };

    async fn moderator() -> (Moderator, Arc<RecordStore>) {
        let storage = Arc::new(Storage::in_memory(Duration::from_millis(20)).await.unwrap());
        let records = Arc::new(RecordStore::new(storage.clone()));
        let moderator = Moderator::new(
            Arc::new(ConfigStore::new(storage)),
            records.clone(),
            WheelSettings::default().placeholder_items,
        );
        (moderator, records)
    }

    #[tokio::test]
    async fn test_load_for_edit_uses_placeholder_until_saved() {
        let (moderator, _) = moderator().await;
        assert_eq!(
            moderator.load_for_edit().await.unwrap(),
            "Prize A\nPrize B\nPrize C"
        );

        moderator.save("Mug\n\nPen\n").await.unwrap();
        assert_eq!(moderator.load_for_edit().await.unwrap(), "Mug\nPen");
    }

    #[tokio::test]
    async fn test_saving_empty_text_publishes_empty_list() {
        let (moderator, _) = moderator().await;
        moderator.save("Mug").await.unwrap();

        let saved = moderator.save("\n  \n").await.unwrap();
        assert!(saved.is_empty());
        assert_eq!(moderator.current().await.unwrap(), Some(WheelConfig::default()));
        assert_eq!(moderator.load_for_edit().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_save_items_rejects_blank_label() {
        let (moderator, _) = moderator().await;

        let err = moderator
            .save_items(vec!["Mug".into(), " ".into()])
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            GameError::Core(WheelError::InvalidItem { position: 1 })
        ));
        assert_eq!(moderator.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_history_reports_counts() {
        let (moderator, records) = moderator().await;
        for name in ["Ann", "Ben", "Cat"] {
            records.insert(&NewPlayRecord::new(name, "Mug")).await.unwrap();
        }

        let report = moderator.clear_history().await.unwrap();
        assert_eq!(report.deleted, 3);
        assert!(report.is_complete());
        assert!(moderator.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_seen_from_another_process() {
        let temp_dir = tempdir().unwrap();
        let settings = WheelSettings::default();

        let (config, records) = open_stores(temp_dir.path(), &settings).await.unwrap();
        let moderator = Moderator::new(
            Arc::new(config),
            Arc::new(records),
            settings.placeholder_items.clone(),
        );
        let mut history = moderator.watch_history();
        assert!(history.next().await.unwrap().unwrap().is_empty());

        // Separate connection, as a participant process would have
        let (_, participant) = open_stores(temp_dir.path(), &settings).await.unwrap();
        participant
            .insert_if_absent(&NewPlayRecord::new("Dee", "Pen"))
            .await
            .unwrap();

        let update = tokio::time::timeout(Duration::from_secs(5), history.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(update.len(), 1);
        assert_eq!(update[0].user, "Dee");
    }
}
