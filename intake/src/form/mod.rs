//! Form state for the family submission page.
//!
//! - [`fields`]: the eight fields, their input hints, numeric coercion and the mapping to
//!   store columns
//! - [`controller`]: field updates, the submission state machine, and submit

pub mod controller;
pub mod fields;

pub use controller::{Banner, BannerVariant, FormController, SubmissionStatus, SubmitError};
pub use fields::{FamilyForm, FormField, InputHints, UnknownField, coerce_count};
