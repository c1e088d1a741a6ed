//! [`RecordStore`] backed by the `restrooms` table.

use radar_core::{RecordStore, RestroomRecord, StoreError};
use sqlx::PgPool;

use crate::restrooms::list_eligible_restrooms;

#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RecordStore for PgRecordStore {
    async fn fetch_eligible_records(&self) -> Result<Vec<RestroomRecord>, StoreError> {
        let rows = list_eligible_restrooms(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(RestroomRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::ping(&self.pool).await.map_err(store_error)
    }
}

/// Connectivity failures are `Unavailable`; everything else is a query error.
fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_is_unavailable() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            store_error(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            store_error(sqlx::Error::Io(io)),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn other_failures_are_query_errors() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
        assert!(matches!(
            store_error(sqlx::Error::ColumnNotFound("latitude".to_string())),
            StoreError::Query(_)
        ));
    }
}
