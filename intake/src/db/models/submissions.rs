use serde::{Deserialize, Serialize};

/// Name of the table holding one row per family submission.
pub const SUBMISSIONS_TABLE: &str = "family_submissions";

/// A family submission as written to the store.
///
/// Field names are the table's column names, so the serde form of this struct is
/// also the JSON row body sent to REST backends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilySubmission {
    pub family_name: String,
    pub number_of_adults: i32,
    pub number_of_children: i32,
    pub street_address: String,
    pub city: String,
    pub zip_code: String,
    pub phone_number: String,
    pub email_address: String,
}
