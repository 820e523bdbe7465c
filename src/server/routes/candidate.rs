use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use jobboard_schema::{CandidateStats, Profile};
use serde::Deserialize;
use tracing::error;

use super::{or_empty, redirect_with, render, render_with_status};
use crate::error::JobBoardError;
use crate::repo::{applications, profiles};
use crate::server::guards::session::RequireUser;
use crate::server::{AppState, flash};
use crate::session::Session;
use crate::views::{CandidateApplicationRow, CandidateDashboardPage, Flash, Nav, resume_link};

/// Loads everything the dashboard shows. `profile` replaces the stored profile when
/// re-rendering a rejected edit.
async fn build_page(
    state: &AppState,
    session: &Session,
    flash: Option<Flash>,
    profile: Option<Profile>,
) -> CandidateDashboardPage {
    let candidate_id = session.user_id();
    let token = session.token();

    let (listed, statuses, stored) = futures::join!(
        applications::for_candidate(&state.backend, token, candidate_id),
        applications::statuses_for_candidate(&state.backend, token, candidate_id),
        async {
            match profile {
                Some(profile) => Ok(profile),
                None => profiles::get_or_empty(&state.backend, token, candidate_id).await,
            }
        },
    );

    let profile = stored.unwrap_or_else(|err| {
        error!(%candidate_id, error = %err, "failed to load profile");
        Profile::empty(candidate_id)
    });

    CandidateDashboardPage {
        nav: Nav::for_session(Some(session)),
        flash,
        stats: CandidateStats::from_statuses(or_empty("candidate statuses", statuses)),
        profile,
        applications: or_empty("candidate applications", listed)
            .into_iter()
            .map(CandidateApplicationRow::from)
            .collect(),
    }
}

/// GET /candidate/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let page = build_page(&state, &session, flash, None).await;
    Ok((jar, render(&page)?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub resume_url: String,
}

impl ProfileForm {
    fn into_profile(self, session: &Session) -> Profile {
        Profile {
            id: session.user_id(),
            full_name: self.full_name.trim().to_string(),
            title: self.title.trim().to_string(),
            bio: self.bio,
            resume_url: self.resume_url.trim().to_string(),
        }
    }
}

/// POST /candidate/profile
pub async fn save_profile(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<Response, JobBoardError> {
    let link = resume_link(&form.resume_url);
    let profile = form.into_profile(&session);
    if let Err(message) = link {
        let page = build_page(&state, &session, Some(Flash::error(message)), Some(profile)).await;
        return render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page);
    }
    match profiles::save(&state.backend, session.token(), &profile).await {
        Ok(_) => Ok(redirect_with(
            jar,
            "/candidate/dashboard",
            &Flash::success("Profile updated successfully!"),
            state.secure_cookies(),
        )),
        Err(err) => {
            error!(user_id = %session.user_id(), error = %err, "failed to save profile");
            let page = build_page(
                &state,
                &session,
                Some(Flash::error("Failed to update profile")),
                Some(profile),
            )
            .await;
            render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page)
        }
    }
}
