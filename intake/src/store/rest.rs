//! Submission store backed by a hosted PostgREST table (Supabase and friends).
//!
//! Counting uses a `HEAD` request with `Prefer: count=exact` and reads the total from the
//! `Content-Range` response header (`0-24/573`, or `*/0` for an empty table). Inserts `POST`
//! a one-element JSON array of rows with `Prefer: return=minimal`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header::CONTENT_RANGE};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::SubmissionStore;
use crate::db::errors::{DbError, Result};
use crate::db::models::submissions::FamilySubmission;

pub struct RestStore {
    client: Client,
    table_url: Url,
    api_key: String,
}

/// Makes sure a url has a trailing slash, so that `join` appends instead of replacing the
/// last path segment.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

/// Total row count from a `Content-Range` header value, if the server reported one.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().split_once('/')?;
    total.trim().parse().ok()
}

impl RestStore {
    /// `base_url` is the PostgREST root, e.g. `https://<project>.supabase.co/rest/v1`.
    pub fn new(base_url: &Url, api_key: &str, table: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        crate::install_crypto_provider();
        let client = Client::builder().timeout(request_timeout).build()?;
        let table_url = ensure_slash(base_url)
            .join(table)
            .map_err(|e| anyhow::anyhow!("Failed to construct table URL: {}", e))?;

        Ok(Self {
            client,
            table_url,
            api_key: api_key.to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }
}

async fn reject(response: reqwest::Response) -> DbError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status, body = %body, "Submission store rejected request");
    DbError::Rejected { status, body }
}

#[async_trait]
impl SubmissionStore for RestStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip(self), fields(table_url = %self.table_url), err)]
    async fn count_submissions(&self) -> Result<u64> {
        let mut count_url = self.table_url.clone();
        count_url.query_pairs_mut().append_pair("select", "*");
        let request = self.client.head(count_url).header("Prefer", "count=exact");

        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }

        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .ok_or_else(|| DbError::InvalidResponse {
                reason: "missing Content-Range header".to_string(),
            })?
            .to_str()
            .map_err(|e| DbError::InvalidResponse {
                reason: format!("unreadable Content-Range header: {e}"),
            })?;
        debug!("Content-Range: {}", content_range);

        parse_content_range_total(content_range).ok_or_else(|| DbError::InvalidResponse {
            reason: format!("no exact count in Content-Range '{content_range}'"),
        })
    }

    #[instrument(skip(self, record), fields(table_url = %self.table_url), err)]
    async fn insert_submission(&self, record: &FamilySubmission) -> Result<()> {
        let request = self
            .client
            .post(self.table_url.clone())
            .header("Prefer", "return=minimal")
            .json(&[record]);

        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(())
    }
}
