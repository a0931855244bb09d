//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures for the JSON API
//!
//! The JSON API is documented with `utoipa`; the rendered docs are served at `/api/docs` and
//! the raw document at `/api/openapi.json`.

pub mod handlers;
pub mod models;
