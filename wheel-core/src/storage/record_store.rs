use crate::error::Result;
use crate::storage::subscription::{self, Subscription};
use crate::storage::{RecordCollection, Storage, Topic};
use crate::types::{normalize_name, Claim, DeleteReport, NewPlayRecord, PlayRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<Storage>,
}

impl RecordStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    async fn load_recent(storage: &Storage) -> Result<Vec<PlayRecord>> {
        let conn = storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, user, result, timestamp FROM records
             ORDER BY timestamp DESC, rowid DESC",
        )?;

        let record_iter = stmt.query_map([], map_record)?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<PlayRecord> {
    let timestamp: Option<i64> = row.get(3)?;

    Ok(PlayRecord {
        id: row.get(0)?,
        user: row.get(1)?,
        result: row.get(2)?,
        timestamp: timestamp.and_then(DateTime::from_timestamp_millis),
    })
}

/// Appends a record for `user` stamped no earlier than the newest existing one.
fn insert_record(
    conn: &Connection,
    user: &str,
    record: &NewPlayRecord,
) -> rusqlite::Result<PlayRecord> {
    let newest: Option<i64> = conn.query_row("SELECT MAX(timestamp) FROM records", [], |row| {
        row.get(0)
    })?;
    let now = Utc::now().timestamp_millis();
    let timestamp = newest.map_or(now, |newest| newest.max(now));

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO records (id, user, result, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![id, user, record.result, timestamp],
    )?;

    Ok(PlayRecord {
        id,
        user: user.to_string(),
        result: record.result.clone(),
        timestamp: DateTime::from_timestamp_millis(timestamp),
    })
}

#[async_trait]
impl RecordCollection for RecordStore {
    async fn query_by_user(&self, user: &str) -> Result<Vec<PlayRecord>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, user, result, timestamp FROM records
             WHERE user = ?1 ORDER BY timestamp DESC",
        )?;

        let record_iter = stmt.query_map(params![normalize_name(user)], map_record)?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }

    async fn insert(&self, record: &NewPlayRecord) -> Result<PlayRecord> {
        let saved = {
            let mut conn = self.storage.get_connection().await;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let saved = insert_record(&tx, &normalize_name(&record.user), record)?;
            tx.commit()?;
            saved
        };

        self.storage.notify(Topic::Records);
        tracing::info!("Recorded '{}' for {}", saved.result, saved.user);
        Ok(saved)
    }

    async fn insert_if_absent(&self, record: &NewPlayRecord) -> Result<Claim> {
        let user = normalize_name(&record.user);

        let claim = {
            let mut conn = self.storage.get_connection().await;
            // Immediate takes the write lock before the existence check, so
            // other connections cannot slip a record in between.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let existing = tx
                .query_row(
                    "SELECT id, user, result, timestamp FROM records WHERE user = ?1 LIMIT 1",
                    params![user],
                    map_record,
                )
                .optional()?;

            match existing {
                Some(existing) => Claim::AlreadyExists(existing),
                None => {
                    let saved = insert_record(&tx, &user, record)?;
                    tx.commit()?;
                    Claim::Inserted(saved)
                }
            }
        };

        match &claim {
            Claim::Inserted(saved) => {
                self.storage.notify(Topic::Records);
                tracing::info!("Recorded '{}' for {}", saved.result, saved.user);
            }
            Claim::AlreadyExists(existing) => {
                tracing::warn!(
                    "Refused second record for {} (already has '{}')",
                    existing.user,
                    existing.result
                );
            }
        }

        Ok(claim)
    }

    async fn list_recent(&self) -> Result<Vec<PlayRecord>> {
        Self::load_recent(&self.storage).await
    }

    fn subscribe_recent(&self) -> Subscription<Vec<PlayRecord>> {
        subscription::watch(
            self.storage.clone(),
            Topic::Records,
            Box::new(|storage: Arc<Storage>| {
                async move { Self::load_recent(&storage).await }.boxed()
            }),
        )
    }

    async fn delete_all(&self) -> Result<DeleteReport> {
        let report = {
            let mut conn = self.storage.get_connection().await;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let total: i64 = tx.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
            let deleted = tx.execute("DELETE FROM records", [])?;
            tx.commit()?;

            DeleteReport {
                deleted,
                total: total as usize,
            }
        };

        self.storage.notify(Topic::Records);
        tracing::info!("Deleted {} of {} records", report.deleted, report.total);
        Ok(report)
    }
}
