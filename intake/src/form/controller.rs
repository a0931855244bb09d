use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use super::fields::{FamilyForm, FormField, UnknownField};
use crate::admission::{AdmissionFailure, AdmissionOutcome, AdmissionWorkflow, SUCCESS_MESSAGE};

pub const SUBMIT_LABEL: &str = "Submit Family Information";
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// Lifecycle of one form's submission.
///
/// `Submitting` is the in-flight state; a finished submission is either `Succeeded` or
/// `Failed`, never both, and never still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(AdmissionFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerVariant {
    Success,
    Error,
}

/// The status banner shown after a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub variant: BannerVariant,
    pub message: &'static str,
}

impl SubmissionStatus {
    pub fn is_submitting(self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    /// Banner for a finished submission; none while idle or in flight.
    pub fn banner(self) -> Option<Banner> {
        match self {
            SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
            SubmissionStatus::Succeeded => Some(Banner {
                variant: BannerVariant::Success,
                message: SUCCESS_MESSAGE,
            }),
            SubmissionStatus::Failed(failure) => Some(Banner {
                variant: BannerVariant::Error,
                message: failure.message(),
            }),
        }
    }
}

impl From<AdmissionOutcome> for SubmissionStatus {
    fn from(outcome: AdmissionOutcome) -> Self {
        match outcome {
            AdmissionOutcome::Admitted => SubmissionStatus::Succeeded,
            AdmissionOutcome::Rejected(failure) => SubmissionStatus::Failed(failure),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in flight for this form")]
    InFlight,
}

/// Owns one form's field values and submission status.
///
/// Both live in watch channels so a renderer can observe them while a submission is
/// running; all methods take `&self`, and an in-flight submission blocks further submits
/// until it resolves.
#[derive(Debug)]
pub struct FormController {
    form: watch::Sender<FamilyForm>,
    status: watch::Sender<SubmissionStatus>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self::with_form(FamilyForm::default())
    }

    pub fn with_form(form: FamilyForm) -> Self {
        Self {
            form: watch::Sender::new(form),
            status: watch::Sender::new(SubmissionStatus::Idle),
        }
    }

    /// Update one field from raw input. Numeric fields silently coerce bad input to 0.
    pub fn update_field(&self, name: &str, raw: &str) -> Result<(), UnknownField> {
        let field: FormField = name.parse()?;
        self.form.send_modify(|form| form.set(field, raw));
        Ok(())
    }

    /// Snapshot of the current field values
    pub fn form(&self) -> FamilyForm {
        self.form.borrow().clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    pub fn is_submitting(&self) -> bool {
        self.status().is_submitting()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() { SUBMITTING_LABEL } else { SUBMIT_LABEL }
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// Run the admission workflow with the current field values.
    ///
    /// Fields are reset only when the family was admitted. The in-flight state ends on every
    /// path, including the submit future being dropped part way through.
    pub async fn submit(&self, workflow: &AdmissionWorkflow) -> Result<SubmissionStatus, SubmitError> {
        let started = self.status.send_if_modified(|status| {
            if status.is_submitting() {
                false
            } else {
                *status = SubmissionStatus::Submitting;
                true
            }
        });
        if !started {
            return Err(SubmitError::InFlight);
        }

        let record = self.form.borrow().to_submission();
        let in_flight = scopeguard::guard(&self.status, |status| {
            debug!("Submission abandoned while in flight");
            status.send_replace(SubmissionStatus::Failed(AdmissionFailure::Unexpected));
        });

        let outcome = workflow.admit(&record).await;

        let status = scopeguard::ScopeGuard::into_inner(in_flight);
        if outcome.is_admitted() {
            self.form.send_replace(FamilyForm::default());
        }
        let finished = SubmissionStatus::from(outcome);
        status.send_replace(finished);
        Ok(finished)
    }
}
