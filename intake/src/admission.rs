//! Submission admission: decide whether the drive still has room, and if so store the family.
//!
//! In the default [`AdmissionMode::CheckThenInsert`] mode the workflow reads the exact row
//! count, compares it with the capacity, and only then inserts. The read and the write are
//! separate store calls, so two submissions racing from different instances can both see
//! a count below the capacity and both insert; the cap is best effort.
//!
//! [`AdmissionMode::Atomic`] hands both steps to
//! [`SubmissionStore::insert_within_capacity`], which stores that support it evaluate as one
//! critical section.
//!
//! Every fault is caught here and turned into an [`AdmissionFailure`]; nothing propagates to
//! the caller, and there are no retries.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::db::models::submissions::FamilySubmission;
use crate::store::{CapacityInsert, CapacityInsertError, SubmissionStore};

/// Maximum number of families the drive accepts.
pub const DEFAULT_CAPACITY: u64 = 500;

pub const SUCCESS_MESSAGE: &str = "Family information submitted successfully!";
pub const CHECK_FAILED_MESSAGE: &str = "Failed to check submission limit. Please try again.";
pub const CAPACITY_REACHED_MESSAGE: &str = "We have reached our maximum number of submissions. Thank you for your interest!";
pub const INSERT_FAILED_MESSAGE: &str = "Failed to submit. Please try again.";
pub const UNEXPECTED_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionMode {
    /// Count, compare, then insert as separate store calls
    #[default]
    CheckThenInsert,
    /// Let the store evaluate the capacity check and the insert together
    Atomic,
}

/// Why a submission was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionFailure {
    /// The row count could not be read
    CheckFailed,
    /// The drive is full
    CapacityReached,
    /// The store did not accept the row
    InsertFailed,
    /// Anything else went wrong
    Unexpected,
}

impl AdmissionFailure {
    pub fn message(self) -> &'static str {
        match self {
            AdmissionFailure::CheckFailed => CHECK_FAILED_MESSAGE,
            AdmissionFailure::CapacityReached => CAPACITY_REACHED_MESSAGE,
            AdmissionFailure::InsertFailed => INSERT_FAILED_MESSAGE,
            AdmissionFailure::Unexpected => UNEXPECTED_MESSAGE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdmissionFailure::CheckFailed => "check_failed",
            AdmissionFailure::CapacityReached => "capacity_reached",
            AdmissionFailure::InsertFailed => "insert_failed",
            AdmissionFailure::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Admitted,
    Rejected(AdmissionFailure),
}

impl AdmissionOutcome {
    pub fn is_admitted(self) -> bool {
        matches!(self, AdmissionOutcome::Admitted)
    }

    /// The message shown to the family
    pub fn message(self) -> &'static str {
        match self {
            AdmissionOutcome::Admitted => SUCCESS_MESSAGE,
            AdmissionOutcome::Rejected(failure) => failure.message(),
        }
    }

    /// Metric label
    pub fn as_str(self) -> &'static str {
        match self {
            AdmissionOutcome::Admitted => "admitted",
            AdmissionOutcome::Rejected(failure) => failure.as_str(),
        }
    }
}

/// The check-count-then-insert sequence, bound to one store and one capacity.
#[derive(Clone)]
pub struct AdmissionWorkflow {
    store: Arc<dyn SubmissionStore>,
    capacity: u64,
    mode: AdmissionMode,
}

impl AdmissionWorkflow {
    pub fn new(store: Arc<dyn SubmissionStore>, capacity: u64) -> Self {
        Self {
            store,
            capacity,
            mode: AdmissionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: AdmissionMode) -> Self {
        if mode == AdmissionMode::Atomic && !self.store.supports_atomic_admission() {
            warn!(
                backend = self.store.backend(),
                "Atomic admission requested, but this store cannot check and insert atomically; concurrent submissions may exceed capacity"
            );
        }
        self.mode = mode;
        self
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn mode(&self) -> AdmissionMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<dyn SubmissionStore> {
        &self.store
    }

    /// Run the workflow for one record. Never fails: every fault becomes a rejection.
    #[instrument(skip_all, fields(backend = self.store.backend(), capacity = self.capacity, mode = ?self.mode))]
    pub async fn admit(&self, record: &FamilySubmission) -> AdmissionOutcome {
        let outcome = match AssertUnwindSafe(self.run(record)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Admission workflow panicked");
                AdmissionOutcome::Rejected(AdmissionFailure::Unexpected)
            }
        };

        metrics::counter!("intake_admissions_total", "outcome" => outcome.as_str()).increment(1);
        outcome
    }

    async fn run(&self, record: &FamilySubmission) -> AdmissionOutcome {
        match self.mode {
            AdmissionMode::CheckThenInsert => self.check_then_insert(record).await,
            AdmissionMode::Atomic => self.insert_within_capacity(record).await,
        }
    }

    async fn check_then_insert(&self, record: &FamilySubmission) -> AdmissionOutcome {
        let count = match self.store.count_submissions().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count submissions: {:#}", e);
                return AdmissionOutcome::Rejected(AdmissionFailure::CheckFailed);
            }
        };

        if count >= self.capacity {
            info!(count, "Submission rejected: capacity reached");
            return AdmissionOutcome::Rejected(AdmissionFailure::CapacityReached);
        }

        match self.store.insert_submission(record).await {
            Ok(()) => {
                info!(count = count + 1, "Submission admitted");
                AdmissionOutcome::Admitted
            }
            Err(e) => {
                warn!("Failed to insert submission: {:#}", e);
                AdmissionOutcome::Rejected(AdmissionFailure::InsertFailed)
            }
        }
    }

    async fn insert_within_capacity(&self, record: &FamilySubmission) -> AdmissionOutcome {
        match self.store.insert_within_capacity(record, self.capacity).await {
            Ok(CapacityInsert::Inserted) => {
                info!("Submission admitted");
                AdmissionOutcome::Admitted
            }
            Ok(CapacityInsert::AtCapacity { count }) => {
                info!(count, "Submission rejected: capacity reached");
                AdmissionOutcome::Rejected(AdmissionFailure::CapacityReached)
            }
            Err(CapacityInsertError::Count(e)) => {
                warn!("Failed to count submissions: {:#}", e);
                AdmissionOutcome::Rejected(AdmissionFailure::CheckFailed)
            }
            Err(CapacityInsertError::Insert(e)) => {
                warn!("Failed to insert submission: {:#}", e);
                AdmissionOutcome::Rejected(AdmissionFailure::InsertFailed)
            }
        }
    }
}
