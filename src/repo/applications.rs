use jobboard_schema::{
    Application, ApplicationOwnership, ApplicationStatus, ApplicationStatusPatch,
    ApplicationWithCandidate, ApplicationWithJob, NewApplication, StatusRow,
};
use serde::de::IgnoredAny;
use tracing::info;
use uuid::Uuid;

use super::APPLICATIONS;
use crate::backend::{BackendClient, Order, Query};
use crate::error::JobBoardError;

pub async fn for_candidate(
    client: &BackendClient,
    token: Option<&str>,
    candidate_id: Uuid,
) -> Result<Vec<ApplicationWithJob>, JobBoardError> {
    let query = Query::table(APPLICATIONS)
        .select(
            "*,
             job:jobs (
               title,
               company,
               location
             )",
        )
        .eq("candidate_id", candidate_id)
        .order("created_at", Order::Descending);
    client.select(token, &query).await
}

pub async fn statuses_for_candidate(
    client: &BackendClient,
    token: Option<&str>,
    candidate_id: Uuid,
) -> Result<Vec<ApplicationStatus>, JobBoardError> {
    let query = Query::table(APPLICATIONS)
        .select("status")
        .eq("candidate_id", candidate_id);
    let rows: Vec<StatusRow> = client.select(token, &query).await?;
    Ok(rows.into_iter().map(|r| r.status).collect())
}

pub async fn for_job(
    client: &BackendClient,
    token: Option<&str>,
    job_id: Uuid,
) -> Result<Vec<ApplicationWithCandidate>, JobBoardError> {
    let query = Query::table(APPLICATIONS)
        .select(
            "*,
             profiles:candidate_id (
               full_name,
               title
             )",
        )
        .eq("job_id", job_id)
        .order("created_at", Order::Descending);
    client.select(token, &query).await
}

/// Number of applications across `job_ids`. An empty id list is zero without a request.
pub async fn count_for_jobs(
    client: &BackendClient,
    token: Option<&str>,
    job_ids: &[Uuid],
) -> Result<usize, JobBoardError> {
    let query = Query::table(APPLICATIONS)
        .select("id")
        .in_list("job_id", job_ids);
    let rows: Vec<IgnoredAny> = client.select(token, &query).await?;
    Ok(rows.len())
}

pub async fn create(
    client: &BackendClient,
    token: Option<&str>,
    application: &NewApplication,
) -> Result<Application, JobBoardError> {
    let created: Application = client.insert(token, APPLICATIONS, application).await?;
    info!(
        application_id = %created.id,
        job_id = %created.job_id,
        candidate_id = %created.candidate_id,
        "application submitted"
    );
    Ok(created)
}

pub async fn ownership(
    client: &BackendClient,
    token: Option<&str>,
    id: Uuid,
) -> Result<ApplicationOwnership, JobBoardError> {
    let query = Query::table(APPLICATIONS)
        .select("id,job_id,job:jobs(employer_id)")
        .eq("id", id);
    client.select_single(token, &query).await
}

/// Sets the status of one application. Returns whether a row changed.
pub async fn update_status(
    client: &BackendClient,
    token: Option<&str>,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<bool, JobBoardError> {
    let query = Query::table(APPLICATIONS).eq("id", id);
    let updated = client
        .update(token, &query, &ApplicationStatusPatch { status })
        .await?;
    info!(application_id = %id, status = status.as_str(), updated, "application status");
    Ok(updated > 0)
}
