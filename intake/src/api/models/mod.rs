//! API request and response data models.
//!
//! - [`submissions`]: the JSON submission body and the admission result returned for it

pub mod submissions;
