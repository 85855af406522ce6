//! [`ReadingStore`] adapter over PostgreSQL.

use weatherwatch_core::collection::ReadingStore;
use weatherwatch_core::error::StoreError;
use weatherwatch_core::reading::{AggregateSummary, Reading};
use weatherwatch_core::types::Timestamp;

use crate::models::reading::CreateReading;
use crate::repositories::ReadingRepo;
use crate::DbPool;

/// Reading store backed by the `readings` table.
///
/// Concurrent appends are independent INSERTs; the database provides the
/// isolation, so no locking happens here.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: DbPool,
}

impl PgReadingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl ReadingStore for PgReadingStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let row = ReadingRepo::insert(&self.pool, &CreateReading::from(reading))
            .await
            .map_err(to_store_error)?;
        tracing::debug!(id = row.id, location = %row.location, "Reading stored");
        Ok(())
    }

    async fn aggregate(
        &self,
        location: Option<&str>,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<AggregateSummary>, StoreError> {
        let rows = ReadingRepo::aggregate(&self.pool, location, window_start, window_end)
            .await
            .map_err(to_store_error)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_summary(window_start, window_end))
            .collect())
    }
}

fn to_store_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
