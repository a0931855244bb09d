//! Database layer for PostgreSQL persistence.
//!
//! ```text
//! ┌──────────────┐
//! │ PostgresStore│  (store::postgres - SubmissionStore backend)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - table rows)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Record structures matching table schemas
//! - [`errors`]: Store error type shared by every backend
//!
//! # Migrations
//!
//! Migrations live in the crate's `migrations/` directory and are exposed through
//! [`crate::migrator`]:
//!
//! ```ignore
//! intake::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
