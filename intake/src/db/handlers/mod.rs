//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction and exposes strongly-typed
//! queries for one table.
//!
//! - [`Submissions`]: counting and inserting family submissions
//!
//! ```ignore
//! use intake::db::handlers::Submissions;
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Submissions::new(&mut tx);
//!
//!     repo.lock_admissions().await?;
//!     let count = repo.count().await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod submissions;

pub use submissions::Submissions;
