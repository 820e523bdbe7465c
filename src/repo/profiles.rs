use jobboard_schema::Profile;
use tracing::info;
use uuid::Uuid;

use super::PROFILES;
use crate::backend::{BackendClient, Query};
use crate::error::JobBoardError;

/// The user's profile, or an empty one when no row exists yet.
pub async fn get_or_empty(
    client: &BackendClient,
    token: Option<&str>,
    id: Uuid,
) -> Result<Profile, JobBoardError> {
    match client
        .select_single(token, &Query::table(PROFILES).eq("id", id))
        .await
    {
        Ok(profile) => Ok(profile),
        Err(JobBoardError::NotFound) => Ok(Profile::empty(id)),
        Err(err) => Err(err),
    }
}

/// Writes the whole row, creating it on first save.
pub async fn save(
    client: &BackendClient,
    token: Option<&str>,
    profile: &Profile,
) -> Result<Profile, JobBoardError> {
    let saved: Profile = client.upsert(token, PROFILES, profile).await?;
    info!(profile_id = %saved.id, "profile saved");
    Ok(saved)
}
