//! The record-store seam and an in-memory implementation.

use std::future::Future;

use thiserror::Error;

use crate::model::RestroomRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached in time.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store query failed: {0}")]
    Query(String),
}

/// Source of restroom records for a search.
///
/// Implementations pre-filter to records flagged as inside the campus
/// bounding box. Stores are shared across concurrent requests and are only
/// ever read.
pub trait RecordStore: Send + Sync {
    fn fetch_eligible_records(
        &self,
    ) -> impl Future<Output = Result<Vec<RestroomRecord>, StoreError>> + Send;

    /// Cheap liveness probe used by health checks.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }
}

/// A fixed set of records held in memory.
///
/// Used by tests and by the server when exercising routes without Postgres.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Vec<RestroomRecord>,
    failure: Option<String>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new(records: Vec<RestroomRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(message.into()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    async fn fetch_eligible_records(&self) -> Result<Vec<RestroomRecord>, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.within_campus_bbox)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, inside: bool) -> RestroomRecord {
        RestroomRecord {
            id,
            building_name: format!("Hall {id}"),
            within_campus_bbox: inside,
            ..RestroomRecord::default()
        }
    }

    #[tokio::test]
    async fn memory_store_returns_only_flagged_records() {
        let store = MemoryRecordStore::new(vec![record(1, true), record(2, false), record(3, true)]);
        let ids: Vec<i64> = store
            .fetch_eligible_records()
            .await
            .expect("fetch")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn unavailable_store_fails_fetch_and_ping() {
        let store = MemoryRecordStore::unavailable("pool timed out");
        assert!(matches!(
            store.fetch_eligible_records().await,
            Err(StoreError::Unavailable(msg)) if msg == "pool timed out"
        ));
        assert!(store.ping().await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn healthy_store_pings() {
        assert!(MemoryRecordStore::default().ping().await.is_ok());
    }
}
