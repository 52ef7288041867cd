use crate::{GameError, Result};
use serde::Serialize;
use std::sync::Arc;
use wheel_core::{normalize_name, Claim, NewPlayRecord, PlayRecord, RecordCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Eligibility {
    Allowed,
    AlreadyPlayed,
}

/// Play-once gate over the shared record collection.
///
/// [`may_play`](Self::may_play) is an early, non-binding check: two sessions
/// can both be told `Allowed` before either writes. [`claim`](Self::claim) is
/// the binding step and lets exactly one of them record a result.
#[derive(Clone)]
pub struct UniquenessEnforcer {
    records: Arc<dyn RecordCollection>,
}

impl UniquenessEnforcer {
    pub fn new(records: Arc<dyn RecordCollection>) -> Self {
        Self { records }
    }

    pub async fn may_play(&self, name: &str) -> Result<Eligibility> {
        let name = normalize_name(name);

        let existing = self.records.query_by_user(&name).await.map_err(|e| {
            tracing::warn!("Play history check failed for {}: {}", name, e);
            GameError::AuthCheckFailed(e.to_string())
        })?;

        if existing.is_empty() {
            Ok(Eligibility::Allowed)
        } else {
            tracing::info!("{} has already played ({} records)", name, existing.len());
            Ok(Eligibility::AlreadyPlayed)
        }
    }

    /// Records `prize` for `name` unless a record for `name` already exists.
    pub async fn claim(&self, name: &str, prize: &str) -> Result<PlayRecord> {
        let record = NewPlayRecord::new(name, prize);

        match self.records.insert_if_absent(&record).await {
            Ok(Claim::Inserted(saved)) => Ok(saved),
            Ok(Claim::AlreadyExists(_)) => Err(GameError::AlreadyPlayed { name: record.user }),
            Err(e) => Err(GameError::WriteFailed(e.to_string())),
        }
    }
}
