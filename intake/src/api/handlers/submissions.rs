//! JSON submission endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::AppState;
use crate::admission::{AdmissionFailure, AdmissionOutcome};
use crate::api::models::submissions::{SubmissionRequest, SubmissionResponse};
use crate::form::FamilyForm;

fn status_for(outcome: AdmissionOutcome) -> StatusCode {
    match outcome {
        AdmissionOutcome::Admitted => StatusCode::CREATED,
        AdmissionOutcome::Rejected(AdmissionFailure::CapacityReached) => StatusCode::CONFLICT,
        AdmissionOutcome::Rejected(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Submit one family's details.
#[utoipa::path(
    post,
    path = "/submissions",
    tag = "submissions",
    summary = "Submit family information",
    description = "Checks the number of stored submissions against the capacity and, if there is room, stores the family.

Headcounts accept numbers or numeric strings; anything unparseable is stored as 0.",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Family stored", body = SubmissionResponse),
        (status = 409, description = "Capacity reached, nothing stored", body = SubmissionResponse),
        (status = 503, description = "The store could not be checked or written; try again", body = SubmissionResponse),
        (status = 422, description = "Malformed JSON body"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> (StatusCode, Json<SubmissionResponse>) {
    let record = FamilyForm::from(request).to_submission();
    let outcome = state.workflow.admit(&record).await;
    (status_for(outcome), Json(SubmissionResponse::from(outcome)))
}
