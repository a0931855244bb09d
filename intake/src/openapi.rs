//! OpenAPI document for the JSON API at `/api/v1/*`.

use utoipa::OpenApi;

use crate::admission::AdmissionFailure;
use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(api::handlers::submissions::create_submission),
    components(schemas(
        api::models::submissions::SubmissionRequest,
        api::models::submissions::SubmissionResponse,
        api::models::submissions::ResponseStatus,
        AdmissionFailure,
    )),
    servers((url = "/api/v1")),
    tags((name = "submissions", description = "Family submissions for the Thanksgiving drive")),
    info(title = "Intake API", description = "Submit family information for the Thanksgiving drive.")
)]
pub struct ApiDoc;
