//! The external data store that holds family submissions.
//!
//! The admission workflow only needs two things from a store: an exact row count and a
//! single-row insert. [`SubmissionStore`] captures that contract, with one implementation
//! per supported backend:
//!
//! - [`MemoryStore`]: in-process and ephemeral, for local development and tests
//! - [`PostgresStore`]: a PostgreSQL table managed by this crate's migrations
//! - [`RestStore`]: a hosted PostgREST table (e.g. Supabase), reached over HTTP
//!
//! Stores that can evaluate the capacity check and the insert as one critical section
//! override [`SubmissionStore::insert_within_capacity`]; the default implementation is a
//! plain count followed by an insert, with the usual check-then-act race.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StoreConfig};
use crate::db::errors::{DbError, Result};
use crate::db::models::submissions::FamilySubmission;

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use rest::RestStore;

/// Result of a capacity-guarded insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityInsert {
    /// The row was written
    Inserted,
    /// The table already held `count` rows, at or above the capacity; nothing was written
    AtCapacity { count: u64 },
}

/// Which half of a capacity-guarded insert failed.
#[derive(Error, Debug)]
pub enum CapacityInsertError {
    #[error("failed to count submissions: {0}")]
    Count(#[source] DbError),
    #[error("failed to insert submission: {0}")]
    Insert(#[source] DbError),
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Short backend name for logs and metrics
    fn backend(&self) -> &'static str;

    /// Exact (never estimated) number of stored submissions.
    async fn count_submissions(&self) -> Result<u64>;

    /// Persist exactly one submission.
    async fn insert_submission(&self, record: &FamilySubmission) -> Result<()>;

    /// Whether [`insert_within_capacity`](Self::insert_within_capacity) is atomic for this store.
    fn supports_atomic_admission(&self) -> bool {
        false
    }

    /// Insert `record` only if fewer than `capacity` rows exist.
    async fn insert_within_capacity(
        &self,
        record: &FamilySubmission,
        capacity: u64,
    ) -> std::result::Result<CapacityInsert, CapacityInsertError> {
        let count = self.count_submissions().await.map_err(CapacityInsertError::Count)?;
        if count >= capacity {
            return Ok(CapacityInsert::AtCapacity { count });
        }
        self.insert_submission(record).await.map_err(CapacityInsertError::Insert)?;
        Ok(CapacityInsert::Inserted)
    }
}

/// A connected store, plus the PostgreSQL pool behind it when there is one.
pub struct ConnectedStore {
    pub store: Arc<dyn SubmissionStore>,
    pub pool: Option<sqlx::PgPool>,
}

/// Build the store selected by `config.store`, connecting and migrating as needed.
pub async fn connect(config: &Config) -> anyhow::Result<ConnectedStore> {
    match &config.store {
        StoreConfig::Memory => {
            info!("Using in-memory submission store: submissions will be lost on shutdown");
            Ok(ConnectedStore {
                store: Arc::new(MemoryStore::new()),
                pool: None,
            })
        }
        StoreConfig::Postgres { url, pool, run_migrations } => {
            info!("Using PostgreSQL submission store");
            let pg_pool = postgres::connect_pool(url, pool).await?;
            if *run_migrations {
                crate::migrator().run(&pg_pool).await?;
            }
            Ok(ConnectedStore {
                store: Arc::new(PostgresStore::new(pg_pool.clone())),
                pool: Some(pg_pool),
            })
        }
        StoreConfig::Rest {
            url,
            api_key,
            table,
            request_timeout,
        } => {
            info!(url = %url, table = %table, "Using REST submission store");
            let store = RestStore::new(url, api_key, table, *request_timeout)?;
            Ok(ConnectedStore {
                store: Arc::new(store),
                pool: None,
            })
        }
    }
}
