use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{errors::Result, models::submissions::FamilySubmission};

/// Key for the transaction-scoped advisory lock that serialises atomic admissions.
const ADMISSION_LOCK_KEY: i64 = 0x696e_7461_6b65;

pub struct Submissions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Submissions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Exact number of rows in `family_submissions`.
    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM family_submissions")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    #[instrument(skip(self, record), err)]
    pub async fn insert(&mut self, record: &FamilySubmission) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO family_submissions
                (family_name, number_of_adults, number_of_children, street_address,
                 city, zip_code, phone_number, email_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.family_name)
        .bind(record.number_of_adults)
        .bind(record.number_of_children)
        .bind(&record.street_address)
        .bind(&record.city)
        .bind(&record.zip_code)
        .bind(&record.phone_number)
        .bind(&record.email_address)
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    /// Take the admission lock for the rest of the current transaction.
    ///
    /// Must be called inside a transaction; outside one the lock is released as soon as the
    /// statement finishes.
    #[instrument(skip(self), err)]
    pub async fn lock_admissions(&mut self) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ADMISSION_LOCK_KEY)
            .execute(&mut *self.db)
            .await?;
        Ok(())
    }
}
