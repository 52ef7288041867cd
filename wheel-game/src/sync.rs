use crate::wheel::SharedWheel;
use crate::{GameError, Result};
use tokio::task::JoinHandle;
use wheel_core::{Subscription, WheelConfig};

/// Keeps a client's [`SharedWheel`] in step with the config document.
pub struct ConfigSync {
    wheel: SharedWheel,
    fallback: Vec<String>,
    document_seen: bool,
}

impl ConfigSync {
    pub fn new(wheel: SharedWheel, fallback: Vec<String>) -> Self {
        Self {
            wheel,
            fallback,
            document_seen: false,
        }
    }

    /// Applies one subscription update.
    ///
    /// A document always wins, even an empty one. Fallback items are used
    /// only while no document has ever been observed. Errors leave the
    /// current items in place.
    pub fn apply(&mut self, update: wheel_core::Result<Option<WheelConfig>>) -> Result<()> {
        match update {
            Ok(Some(config)) => {
                self.document_seen = true;
                let count = config.len();
                self.wheel.write().replace(config.items);

                if count == 0 {
                    tracing::warn!("Wheel config is empty, spins are disabled");
                } else {
                    tracing::info!("Applied wheel config with {} items", count);
                }
            }
            Ok(None) if !self.document_seen => {
                self.wheel.write().replace(self.fallback.clone());
                tracing::info!(
                    "No wheel config yet, using {} fallback items",
                    self.fallback.len()
                );
            }
            Ok(None) => {
                tracing::debug!("Config document missing after being seen, keeping items");
            }
            Err(e) => {
                let stale = self.wheel.read().len();
                tracing::warn!("Config sync error, keeping {} stale items: {}", stale, e);
                return Err(GameError::Sync(e.to_string()));
            }
        }

        Ok(())
    }

    pub fn document_seen(&self) -> bool {
        self.document_seen
    }

    /// Applies updates until the subscription ends.
    pub async fn run(mut self, mut subscription: Subscription<Option<WheelConfig>>) {
        while let Some(update) = subscription.next().await {
            // Already logged; a failed update never stops the sync
            let _ = self.apply(update);
        }

        tracing::info!("Config subscription ended");
    }

    pub fn spawn(self, subscription: Subscription<Option<WheelConfig>>) -> JoinHandle<()> {
        tokio::spawn(self.run(subscription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::shared_wheel;
    use std::sync::Arc;
    use std::time::Duration;
    use wheel_core::{ConfigDocument, ConfigStore, Storage, WheelError};

    fn fallback() -> Vec<String> {
        vec!["Hari".into(), "Tanya".into()]
    }

    #[test]
    fn test_fallback_only_before_first_document() {
        let wheel = shared_wheel();
        let mut sync = ConfigSync::new(wheel.clone(), fallback());

        sync.apply(Ok(None)).unwrap();
        assert_eq!(wheel.read().items(), fallback().as_slice());

        sync.apply(Ok(Some(WheelConfig::parse("A\nB\nC")))).unwrap();
        assert_eq!(wheel.read().len(), 3);

        sync.apply(Ok(None)).unwrap();
        assert_eq!(wheel.read().len(), 3);
    }

    #[test]
    fn test_empty_document_makes_wheel_inert() {
        let wheel = shared_wheel();
        let mut sync = ConfigSync::new(wheel.clone(), fallback());

        sync.apply(Ok(Some(WheelConfig::default()))).unwrap();
        assert!(wheel.read().is_empty());
        assert!(sync.document_seen());

        sync.apply(Ok(None)).unwrap();
        assert!(wheel.read().is_empty());
    }

    #[test]
    fn test_update_replaces_never_merges() {
        let wheel = shared_wheel();
        let mut sync = ConfigSync::new(wheel.clone(), fallback());

        sync.apply(Ok(Some(WheelConfig::parse("A\nB\nC\nD\nE"))))
            .unwrap();
        sync.apply(Ok(Some(WheelConfig::parse("X\nY\nZ")))).unwrap();

        assert_eq!(wheel.read().items(), ["X", "Y", "Z"]);
    }

    #[test]
    fn test_error_keeps_stale_items() {
        let wheel = shared_wheel();
        let mut sync = ConfigSync::new(wheel.clone(), fallback());
        sync.apply(Ok(Some(WheelConfig::parse("A\nB")))).unwrap();

        let result = sync.apply(Err(WheelError::internal("connection reset")));
        assert!(matches!(result, Err(GameError::Sync(_))));
        assert_eq!(wheel.read().items(), ["A", "B"]);
    }

    #[tokio::test]
    async fn test_spawned_sync_follows_store() {
        let storage = Arc::new(Storage::in_memory(Duration::from_millis(20)).await.unwrap());
        let store = ConfigStore::new(storage);
        let wheel = shared_wheel();

        let handle = ConfigSync::new(wheel.clone(), fallback()).spawn(store.subscribe());

        wait_for(|| wheel.read().items() == fallback().as_slice()).await;

        store.set(&WheelConfig::parse("Mug\nPen\nHat")).await.unwrap();
        wait_for(|| wheel.read().len() == 3).await;

        store.set(&WheelConfig::parse("Mug")).await.unwrap();
        wait_for(|| wheel.read().items() == ["Mug"]).await;

        handle.abort();
    }

    async fn wait_for(condition: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }
}
