use crate::error::{Result, WheelError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered prize list published by the moderator.
///
/// Position in `items` is the slice index on the wheel, so order is part of
/// the value. Blank labels and labels spanning lines are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub items: Vec<String>,
}

impl WheelConfig {
    /// Builds a config from labels, rejecting blank or multi-line entries.
    pub fn new(items: Vec<String>) -> Result<Self> {
        let config = Self { items };
        config.validate()?;
        Ok(config)
    }

    /// Parses free text: one label per line, blank lines dropped. Both
    /// `\n` and `\r` end a line.
    pub fn parse(text: &str) -> Self {
        let items = text
            .split(['\n', '\r'])
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        Self { items }
    }

    pub fn to_text(&self) -> String {
        self.items.join("\n")
    }

    pub fn validate(&self) -> Result<()> {
        match self.items.iter().position(|item| !is_valid_label(item)) {
            Some(position) => Err(WheelError::InvalidItem { position }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A participant's single play result as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub id: String,
    pub user: String,
    pub result: String,
    /// Assigned by the store on commit, `None` while pending.
    pub timestamp: Option<DateTime<Utc>>,
}

impl PlayRecord {
    pub fn is_pending(&self) -> bool {
        self.timestamp.is_none()
    }
}

/// Insert request for the record collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayRecord {
    pub user: String,
    pub result: String,
}

impl NewPlayRecord {
    pub fn new(user: &str, result: impl Into<String>) -> Self {
        Self {
            user: normalize_name(user),
            result: result.into(),
        }
    }
}

/// Outcome of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    Inserted(PlayRecord),
    AlreadyExists(PlayRecord),
}

/// Result of a bulk history reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub deleted: usize,
    pub total: usize,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.deleted == self.total
    }
}

/// Non-blank and on a single line, so it survives `to_text` / `parse`.
pub fn is_valid_label(label: &str) -> bool {
    !label.trim().is_empty() && !label.contains(['\n', '\r'])
}

/// Participant names are compared trimmed and case-sensitive.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_blank_lines_and_keeps_order() {
        let config = WheelConfig::parse("Mug\n\n   \nT-Shirt\r\nSticker\n");
        assert_eq!(config.items, vec!["Mug", "T-Shirt", "Sticker"]);
    }

    #[test]
    fn test_parse_to_text_round_trip() {
        let items = vec![
            "Free coffee".to_string(),
            "  padded label ".to_string(),
            "Grand prize".to_string(),
        ];
        let config = WheelConfig::new(items.clone()).unwrap();

        assert_eq!(WheelConfig::parse(&config.to_text()).items, items);
    }

    #[test]
    fn test_new_rejects_blank_label() {
        let err = WheelConfig::new(vec!["A".into(), " ".into()]).unwrap_err();
        assert!(matches!(err, WheelError::InvalidItem { position: 1 }));
    }

    #[test]
    fn test_new_rejects_multi_line_label() {
        let err = WheelConfig::new(vec!["Mug\nPen".into(), "Hat".into()]).unwrap_err();
        assert!(matches!(err, WheelError::InvalidItem { position: 0 }));

        let err = WheelConfig::new(vec!["Mug".into(), "Hat\r".into(), "Pen".into()]).unwrap_err();
        assert!(matches!(err, WheelError::InvalidItem { position: 1 }));
    }

    #[test]
    fn test_parse_splits_on_bare_carriage_return() {
        let config = WheelConfig::parse("Mug\rPen\r\nHat");
        assert_eq!(config.items, vec!["Mug", "Pen", "Hat"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_config_survives_text_round_trip() {
        let config = WheelConfig::new(vec!["Mug".into(), " Hat ".into(), "Pen".into()]).unwrap();
        assert_eq!(WheelConfig::parse(&config.to_text()), config);
    }

    #[test]
    fn test_empty_text_is_empty_config() {
        assert!(WheelConfig::parse("\n \n").is_empty());
    }

    #[test]
    fn test_new_record_trims_user() {
        let record = NewPlayRecord::new("  Alice ", "Mug");
        assert_eq!(record.user, "Alice");
    }
}
