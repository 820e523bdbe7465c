use reqwest::{Method, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{BackendClient, Query, backend_error, expect_success, read_json};
use crate::error::{BackendErrorBody, JobBoardError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_ROWS: &str = "return=representation";
const UPSERT_ROWS: &str = "resolution=merge-duplicates,return=representation";
/// Reported when a single-object read matched zero (or several) rows.
const NO_SINGLE_ROW: &str = "PGRST116";

impl BackendClient {
    fn table_request(
        &self,
        method: Method,
        query: &Query,
        access_token: Option<&str>,
        read: bool,
    ) -> Result<reqwest::RequestBuilder, JobBoardError> {
        let mut url = self.endpoint(&format!("rest/v1/{}", query.table_name()))?;
        if read {
            query.apply_read(&mut url);
        } else {
            query.apply_filters(&mut url);
        }
        let mut request = self.authorize(self.http.request(method, url), access_token);
        if query.is_single() {
            request = request.header(header::ACCEPT, SINGLE_OBJECT);
        }
        Ok(request)
    }

    /// Reads every row matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        access_token: Option<&str>,
        query: &Query,
    ) -> Result<Vec<T>, JobBoardError> {
        if query.matches_nothing() {
            debug!(table = query.table_name(), "empty filter set, skipping read");
            return Ok(Vec::new());
        }
        let request = self
            .table_request(Method::GET, query, access_token, true)?
            .build()?;
        read_json(self.execute(request).await?).await
    }

    /// Reads exactly one row. No match surfaces as [`JobBoardError::NotFound`].
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        access_token: Option<&str>,
        query: &Query,
    ) -> Result<T, JobBoardError> {
        if query.matches_nothing() {
            return Err(JobBoardError::NotFound);
        }
        let query = query.clone().single();
        let request = self
            .table_request(Method::GET, &query, access_token, true)?
            .build()?;
        let resp = self.execute(request).await?;
        let status = resp.status();
        if status.is_success() {
            return read_json(resp).await;
        }
        let bytes = resp.bytes().await?;
        if is_missing_row(status, &BackendErrorBody::parse(&bytes)) {
            return Err(JobBoardError::NotFound);
        }
        Err(backend_error(status, &bytes))
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert<B, T>(
        &self,
        access_token: Option<&str>,
        table: &'static str,
        row: &B,
    ) -> Result<T, JobBoardError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.write_one(access_token, table, row, RETURN_ROWS).await
    }

    /// Inserts one row, or merges it into the existing row with the same primary key.
    pub async fn upsert<B, T>(
        &self,
        access_token: Option<&str>,
        table: &'static str,
        row: &B,
    ) -> Result<T, JobBoardError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.write_one(access_token, table, row, UPSERT_ROWS).await
    }

    async fn write_one<B, T>(
        &self,
        access_token: Option<&str>,
        table: &'static str,
        row: &B,
        prefer: &'static str,
    ) -> Result<T, JobBoardError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let query = Query::table(table).single();
        let request = self
            .table_request(Method::POST, &query, access_token, false)?
            .header("Prefer", prefer)
            .json(row)
            .build()?;
        read_json(self.execute(request).await?).await
    }

    /// Patches every row matching `query`, returning how many changed.
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        access_token: Option<&str>,
        query: &Query,
        patch: &B,
    ) -> Result<usize, JobBoardError> {
        let request = self
            .guarded_mutation(Method::PATCH, query, access_token)?
            .json(patch)
            .build()?;
        let rows: Vec<serde_json::Value> = read_json(self.execute(request).await?).await?;
        Ok(rows.len())
    }

    /// Deletes every row matching `query`, returning how many went away.
    pub async fn delete(
        &self,
        access_token: Option<&str>,
        query: &Query,
    ) -> Result<usize, JobBoardError> {
        let request = self
            .guarded_mutation(Method::DELETE, query, access_token)?
            .build()?;
        let resp = self.execute(request).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return expect_success(resp).await.map(|()| 0);
        }
        let rows: Vec<serde_json::Value> = read_json(resp).await?;
        Ok(rows.len())
    }

    /// Mutations without a filter would touch the whole table; refuse them.
    fn guarded_mutation(
        &self,
        method: Method,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, JobBoardError> {
        if !query.has_filters() {
            return Err(JobBoardError::Config(format!(
                "refusing unfiltered {method} on {}",
                query.table_name()
            )));
        }
        // Mutations always return a row array; the single-object header would turn a
        // zero-row result into an error.
        let query = query.clone().many();
        Ok(self
            .table_request(method, &query, access_token, false)?
            .header("Prefer", RETURN_ROWS))
    }
}

fn is_missing_row(status: StatusCode, body: &BackendErrorBody) -> bool {
    status == StatusCode::NOT_ACCEPTABLE || body.code().as_deref() == Some(NO_SINGLE_ROW)
}
