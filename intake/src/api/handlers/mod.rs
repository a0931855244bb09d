//! HTTP request handlers.
//!
//! - [`form`]: the server-rendered form page (`GET /`, `POST /`)
//! - [`submissions`]: the JSON submission endpoint (`POST /api/v1/submissions`)
//!
//! Both run the same admission workflow from [`crate::AppState`].

pub mod form;
pub mod submissions;
