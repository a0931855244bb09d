//! Request and response bodies for `POST /api/v1/submissions`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::admission::AdmissionOutcome;
use crate::form::{FamilyForm, coerce_count};

/// A headcount as sent by a client: a JSON number, a string, or `null`.
///
/// Coerced the same way as the form's number inputs, so anything unparseable is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountInput {
    Null,
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Default for CountInput {
    fn default() -> Self {
        CountInput::Integer(0)
    }
}

impl CountInput {
    pub fn coerce(&self) -> i32 {
        match self {
            CountInput::Null => 0,
            CountInput::Integer(n) => i32::try_from(*n).ok().filter(|n| *n >= 0).unwrap_or(0),
            CountInput::Decimal(n) => coerce_count(&n.to_string()),
            CountInput::Text(s) => coerce_count(s),
        }
    }
}

/// One family's details. Missing fields are treated as empty.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[schema(example = "Rivera")]
    pub family_name: String,
    /// Number or numeric string; anything else counts as 0
    #[schema(value_type = i32, example = 2)]
    pub number_of_adults: CountInput,
    /// Number or numeric string; anything else counts as 0
    #[schema(value_type = i32, example = 3)]
    pub number_of_children: CountInput,
    #[schema(example = "12 Elm Street")]
    pub street_address: String,
    #[schema(example = "Springfield")]
    pub city: String,
    #[schema(example = "02134")]
    pub zip_code: String,
    #[schema(example = "555-0100")]
    pub phone_number: String,
    #[schema(example = "rivera@example.com")]
    pub email_address: String,
}

impl From<SubmissionRequest> for FamilyForm {
    fn from(request: SubmissionRequest) -> Self {
        FamilyForm {
            family_name: request.family_name,
            number_of_adults: request.number_of_adults.coerce(),
            number_of_children: request.number_of_children.coerce(),
            street_address: request.street_address,
            city: request.city,
            zip_code: request.zip_code,
            phone_number: request.phone_number,
            email_address: request.email_address,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub status: ResponseStatus,
    /// `admitted`, `check_failed`, `capacity_reached`, `insert_failed` or `unexpected`
    #[schema(example = "admitted")]
    pub outcome: String,
    /// Message to show the family
    #[schema(example = "Family information submitted successfully!")]
    pub message: String,
}

impl From<AdmissionOutcome> for SubmissionResponse {
    fn from(outcome: AdmissionOutcome) -> Self {
        Self {
            status: if outcome.is_admitted() {
                ResponseStatus::Success
            } else {
                ResponseStatus::Error
            },
            outcome: outcome.as_str().to_string(),
            message: outcome.message().to_string(),
        }
    }
}
