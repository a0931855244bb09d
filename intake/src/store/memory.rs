//! In-process submission store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CapacityInsert, CapacityInsertError, SubmissionStore};
use crate::db::errors::Result;
use crate::db::models::submissions::FamilySubmission;

/// Keeps submissions in memory for the lifetime of the process.
///
/// Count and insert share one lock, so capacity-guarded inserts are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<FamilySubmission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored submission, in insertion order
    pub async fn records(&self) -> Vec<FamilySubmission> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn count_submissions(&self) -> Result<u64> {
        Ok(self.rows.lock().await.len() as u64)
    }

    async fn insert_submission(&self, record: &FamilySubmission) -> Result<()> {
        self.rows.lock().await.push(record.clone());
        Ok(())
    }

    fn supports_atomic_admission(&self) -> bool {
        true
    }

    async fn insert_within_capacity(
        &self,
        record: &FamilySubmission,
        capacity: u64,
    ) -> std::result::Result<CapacityInsert, CapacityInsertError> {
        let mut rows = self.rows.lock().await;
        let count = rows.len() as u64;
        if count >= capacity {
            return Ok(CapacityInsert::AtCapacity { count });
        }
        rows.push(record.clone());
        Ok(CapacityInsert::Inserted)
    }
}
