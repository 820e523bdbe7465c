use jobboard_schema::{Job, JobStatus, JobStatusRow, JobWithApplicationCount, NewJob};
use tracing::info;
use uuid::Uuid;

use super::JOBS;
use crate::backend::{BackendClient, Order, Query};
use crate::error::JobBoardError;

/// Columns matched by the jobs search box.
pub const SEARCH_COLUMNS: [&str; 2] = ["title", "description"];

pub fn published_query(search: &str) -> Query {
    Query::table(JOBS)
        .eq("status", JobStatus::Published.as_str())
        .any_ilike(&SEARCH_COLUMNS, search)
        .order("created_at", Order::Descending)
}

/// Published jobs, newest first, optionally narrowed by a title/description substring.
pub async fn list_published(
    client: &BackendClient,
    token: Option<&str>,
    search: &str,
) -> Result<Vec<Job>, JobBoardError> {
    client.select(token, &published_query(search)).await
}

pub async fn get(
    client: &BackendClient,
    token: Option<&str>,
    id: Uuid,
) -> Result<Job, JobBoardError> {
    client
        .select_single(token, &Query::table(JOBS).eq("id", id))
        .await
}

pub async fn list_for_employer(
    client: &BackendClient,
    token: Option<&str>,
    employer_id: Uuid,
) -> Result<Vec<JobWithApplicationCount>, JobBoardError> {
    let query = Query::table(JOBS)
        .select("*, applications(count)")
        .eq("employer_id", employer_id)
        .order("created_at", Order::Descending);
    client.select(token, &query).await
}

/// `id` and `status` of every job the employer owns, for dashboard statistics.
pub async fn status_rows_for_employer(
    client: &BackendClient,
    token: Option<&str>,
    employer_id: Uuid,
) -> Result<Vec<JobStatusRow>, JobBoardError> {
    let query = Query::table(JOBS)
        .select("id,status")
        .eq("employer_id", employer_id);
    client.select(token, &query).await
}

pub async fn create(
    client: &BackendClient,
    token: Option<&str>,
    job: &NewJob,
) -> Result<Job, JobBoardError> {
    let created: Job = client.insert(token, JOBS, job).await?;
    info!(job_id = %created.id, employer_id = %created.employer_id, "job created");
    Ok(created)
}

/// Deletes a job only when it belongs to `employer_id`. Returns whether a row went away.
pub async fn delete_owned(
    client: &BackendClient,
    token: Option<&str>,
    id: Uuid,
    employer_id: Uuid,
) -> Result<bool, JobBoardError> {
    let query = Query::table(JOBS)
        .eq("id", id)
        .eq("employer_id", employer_id);
    let removed = client.delete(token, &query).await?;
    info!(job_id = %id, %employer_id, removed, "job delete");
    Ok(removed > 0)
}
