use crate::error::{Result, WheelError};
use crate::types::is_valid_label;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    pub spin: SpinSettings,
    pub sync: SyncSettings,
    /// Shown to participants until a config document exists.
    pub fallback_items: Vec<String>,
    /// Pre-filled in the moderator editor when no document exists.
    pub placeholder_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinSettings {
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// Degrees per tick.
    pub min_velocity: f64,
    pub max_velocity: f64,
    pub tick_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub poll_interval_ms: u64,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            spin: SpinSettings::default(),
            sync: SyncSettings::default(),
            fallback_items: ["Hari", "Tanya", "Kashish", "Mohit", "Ayushi"]
                .into_iter()
                .map(String::from)
                .collect(),
            placeholder_items: ["Prize A", "Prize B", "Prize C"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            min_duration_ms: 4000.0,
            max_duration_ms: 7000.0,
            min_velocity: 10.0,
            max_velocity: 20.0,
            tick_ms: 30,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
        }
    }
}

impl SpinSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_duration_ms > 0.0 && self.min_duration_ms < self.max_duration_ms) {
            return Err(WheelError::config(format!(
                "Spin duration range must satisfy 0 < min < max, got [{}, {})",
                self.min_duration_ms, self.max_duration_ms
            )));
        }

        if !(self.min_velocity > 0.0 && self.min_velocity < self.max_velocity) {
            return Err(WheelError::config(format!(
                "Spin velocity range must satisfy 0 < min < max, got [{}, {})",
                self.min_velocity, self.max_velocity
            )));
        }

        if self.tick_ms == 0 {
            return Err(WheelError::config("Tick must be greater than 0"));
        }

        Ok(())
    }
}

impl SyncSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl WheelSettings {
    /// Reads `path` if it exists, defaults otherwise.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.spin.validate()?;

        if self.sync.poll_interval_ms == 0 {
            return Err(WheelError::config("Poll interval must be greater than 0"));
        }

        if self.fallback_items.iter().any(|item| !is_valid_label(item)) {
            return Err(WheelError::config("Fallback items must be non-blank single-line labels"));
        }

        if self.placeholder_items.iter().any(|item| !is_valid_label(item)) {
            return Err(WheelError::config("Placeholder items must be non-blank single-line labels"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        WheelSettings::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_duration_range_rejected() {
        let mut settings = WheelSettings::default();
        settings.spin.min_duration_ms = 8000.0;
        assert!(matches!(settings.validate(), Err(WheelError::Config(_))));
    }

    #[test]
    fn test_multi_line_fallback_item_rejected() {
        let mut settings = WheelSettings::default();
        settings.fallback_items.push("Hari\nTanya".into());
        assert!(matches!(settings.validate(), Err(WheelError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings = WheelSettings::load(&temp_dir.path().join("settings.json"))
            .await
            .unwrap();
        assert_eq!(settings, WheelSettings::default());
    }

    #[tokio::test]
    async fn test_load_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "spin": { "tick_ms": 16 } }"#).unwrap();

        let settings = WheelSettings::load(&path).await.unwrap();
        assert_eq!(settings.spin.tick_ms, 16);
        assert_eq!(settings.spin.max_duration_ms, 7000.0);
        assert_eq!(settings.placeholder_items.len(), 3);
    }
}
