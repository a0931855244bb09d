//! Database record models matching table schemas.
//!
//! - [`submissions`]: the `family_submissions` row written once per accepted family

pub mod submissions;
