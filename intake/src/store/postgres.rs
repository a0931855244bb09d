//! PostgreSQL-backed submission store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::instrument;

use super::{CapacityInsert, CapacityInsertError, SubmissionStore};
use crate::config::PoolSettings;
use crate::db::errors::{DbError, Result};
use crate::db::handlers::Submissions;
use crate::db::models::submissions::FamilySubmission;

/// Open a connection pool using the configured pool settings.
pub async fn connect_pool(url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));

    // 0 = never
    if settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
    }
    if settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
    }

    Ok(options.connect(url).await?)
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn count_submissions(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        Submissions::new(&mut conn).count().await
    }

    async fn insert_submission(&self, record: &FamilySubmission) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Submissions::new(&mut conn).insert(record).await
    }

    fn supports_atomic_admission(&self) -> bool {
        true
    }

    /// Count and insert inside one transaction, serialised across all instances by an
    /// advisory lock held until commit.
    #[instrument(skip(self, record), err)]
    async fn insert_within_capacity(
        &self,
        record: &FamilySubmission,
        capacity: u64,
    ) -> std::result::Result<CapacityInsert, CapacityInsertError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CapacityInsertError::Count(DbError::from(e)))?;

        let mut repo = Submissions::new(&mut tx);
        repo.lock_admissions().await.map_err(CapacityInsertError::Count)?;
        let count = repo.count().await.map_err(CapacityInsertError::Count)?;

        if count >= capacity {
            // Nothing written; dropping the transaction rolls it back and frees the lock
            return Ok(CapacityInsert::AtCapacity { count });
        }

        repo.insert(record).await.map_err(CapacityInsertError::Insert)?;
        tx.commit()
            .await
            .map_err(|e| CapacityInsertError::Insert(DbError::from(e)))?;

        Ok(CapacityInsert::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_submission;
    use std::sync::Arc;

    #[sqlx::test]
    #[test_log::test]
    async fn test_count_and_insert(pool: PgPool) {
        let store = PostgresStore::new(pool);

        assert_eq!(store.count_submissions().await.unwrap(), 0);
        store.insert_submission(&sample_submission()).await.unwrap();
        assert_eq!(store.count_submissions().await.unwrap(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_capacity_insert_stops_at_capacity(pool: PgPool) {
        let store = PostgresStore::new(pool);

        for _ in 0..3 {
            let result = store.insert_within_capacity(&sample_submission(), 3).await.unwrap();
            assert_eq!(result, CapacityInsert::Inserted);
        }

        let result = store.insert_within_capacity(&sample_submission(), 3).await.unwrap();
        assert_eq!(result, CapacityInsert::AtCapacity { count: 3 });
        assert_eq!(store.count_submissions().await.unwrap(), 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_concurrent_capacity_inserts_never_exceed_capacity(pool: PgPool) {
        let store = Arc::new(PostgresStore::new(pool));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_within_capacity(&sample_submission(), 4).await.unwrap() })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count_submissions().await.unwrap(), 4);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_capacity_insert_reports_constraint_failure_as_insert_error(pool: PgPool) {
        let store = PostgresStore::new(pool);
        let mut record = sample_submission();
        record.family_name = "   ".to_string();

        let err = store.insert_within_capacity(&record, 500).await.unwrap_err();

        assert!(matches!(err, CapacityInsertError::Insert(DbError::CheckViolation { .. })));
        assert_eq!(store.count_submissions().await.unwrap(), 0);
    }
}
