pub mod config;
pub mod history;
pub mod play;
pub mod reset;

pub use config::{handle_config_command, ConfigCommands};
pub use history::{handle_history, handle_watch};
pub use play::handle_play;
pub use reset::handle_reset;

use comfy_table::{presets::UTF8_FULL, Table};
use std::sync::Arc;
use wheel_core::{ConfigStore, PlayRecord, RecordStore, WheelSettings};
use wheel_game::Moderator;

/// Everything a command needs: settings plus both stores.
pub struct App {
    pub settings: WheelSettings,
    pub config: Arc<ConfigStore>,
    pub records: Arc<RecordStore>,
}

impl App {
    pub fn moderator(&self) -> Moderator {
        Moderator::new(
            self.config.clone(),
            self.records.clone(),
            self.settings.placeholder_items.clone(),
        )
    }
}

pub(crate) fn prize_table(items: &[String]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Slice", "Prize"]);

    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), item.clone()]);
    }

    table
}

pub(crate) fn history_table(records: &[PlayRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Time", "Name", "Prize"]);

    for record in records {
        let time = if record.is_pending() {
            "Pending...".to_string()
        } else {
            record
                .timestamp
                .map(|timestamp| {
                    timestamp
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                })
                .unwrap_or_default()
        };
        table.add_row(vec![time, record.user.clone(), record.result.clone()]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsaved_record_shows_pending() {
        let records = vec![PlayRecord {
            id: "1".into(),
            user: "Ann".into(),
            result: "Mug".into(),
            timestamp: None,
        }];

        let rendered = history_table(&records).to_string();
        assert!(rendered.contains("Pending..."));
        assert!(rendered.contains("Ann"));
    }

    #[test]
    fn test_saved_record_shows_time() {
        let records = vec![PlayRecord {
            id: "2".into(),
            user: "Ben".into(),
            result: "Pen".into(),
            timestamp: chrono::DateTime::from_timestamp_millis(1_700_000_000_000),
        }];

        let rendered = history_table(&records).to_string();
        assert!(!rendered.contains("Pending..."));
        assert!(rendered.contains("2023-11-1"));
    }

    #[test]
    fn test_prize_table_numbers_slices_from_one() {
        let rendered = prize_table(&["Mug".to_string(), "Pen".to_string()]).to_string();
        assert!(rendered.contains("Slice"));
        assert!(rendered.contains('2'));
        assert!(!rendered.contains('0'));
    }
}
