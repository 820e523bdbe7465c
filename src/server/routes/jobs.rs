use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use jobboard_schema::NewApplication;
use serde::Deserialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{or_empty, redirect_with, render, render_with_status, token};
use crate::error::JobBoardError;
use crate::repo::{applications, jobs};
use crate::server::guards::session::{CurrentUser, login_url};
use crate::server::{AppState, flash};
use crate::session::Session;
use crate::views::{
    ApplyForm, ErrorPage, Flash, JobCard, JobDetailPage, JobResults, JobsPage, Nav, resume_link,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: String,
}

/// GET /jobs
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Query(params): Query<ListParams>,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let found = jobs::list_published(&state.backend, token(session.as_ref()), &params.q).await;
    let page = JobsPage {
        nav: Nav::for_session(session.as_ref()),
        flash,
        query: params.q,
        view_id: Uuid::new_v4(),
        jobs: or_empty("published jobs", found)
            .into_iter()
            .map(JobCard::from)
            .collect(),
    };
    Ok((jar, render(&page)?).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Id of the jobs page issuing the search; requests sharing it are debounced together.
    pub view: Option<Uuid>,
}

/// GET /jobs/search
///
/// Returns the result list fragment, or 204 when a newer keystroke from the same view
/// superseded this one.
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Response, JobBoardError> {
    if let Some(view) = params.view
        && !state.search.settle(view).await
    {
        debug!(%view, "search superseded");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let found = jobs::list_published(&state.backend, token(session.as_ref()), &params.q).await;
    let page = JobResults {
        jobs: or_empty("job search", found)
            .into_iter()
            .map(JobCard::from)
            .collect(),
    };
    Ok(render(&page)?.into_response())
}

fn job_not_found() -> Result<Response, JobBoardError> {
    let page = ErrorPage::new(
        StatusCode::NOT_FOUND,
        "The job posting you're looking for doesn't exist.".to_string(),
    )
    .with_title("Job not found");
    render_with_status(StatusCode::NOT_FOUND, &page)
}

fn job_unavailable(jar: PrivateCookieJar, state: &AppState) -> Response {
    redirect_with(
        jar,
        "/jobs",
        &Flash::error("That job could not be loaded. Please try again."),
        state.secure_cookies(),
    )
}

/// GET /jobs/{id}
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Result<Response, JobBoardError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return job_not_found();
    };
    let (jar, flash) = flash::take(jar);
    match jobs::get(&state.backend, token(session.as_ref()), id).await {
        Ok(job) => {
            let page = JobDetailPage::new(
                Nav::for_session(session.as_ref()),
                flash,
                job,
                ApplyForm::default(),
            );
            Ok((jar, render(&page)?).into_response())
        }
        Err(JobBoardError::NotFound) => job_not_found(),
        Err(err) => {
            error!(job_id = %id, error = %err, "failed to load job");
            Ok(job_unavailable(jar, &state))
        }
    }
}

struct ResumeFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

struct Submission {
    form: ApplyForm,
    resume: Option<ResumeFile>,
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, JobBoardError> {
    let mut form = ApplyForm::default();
    let mut resume = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("cover_letter") => form.cover_letter = field.text().await?,
            Some("resume_url") => form.resume_url = field.text().await?,
            Some("resume") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if !file_name.is_empty() && !bytes.is_empty() {
                    resume = Some(ResumeFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(Submission { form, resume })
}

/// Re-renders the job page with the submitted values and an error alert.
async fn apply_failed(
    state: &AppState,
    session: &Session,
    jar: PrivateCookieJar,
    job_id: Uuid,
    form: ApplyForm,
    message: &str,
) -> Result<Response, JobBoardError> {
    match jobs::get(&state.backend, session.token(), job_id).await {
        Ok(job) => {
            let page = JobDetailPage::new(
                Nav::for_session(Some(session)),
                Some(Flash::error(message)),
                job,
                form,
            );
            render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page)
        }
        Err(JobBoardError::NotFound) => job_not_found(),
        Err(err) => {
            error!(job_id = %job_id, error = %err, "failed to reload job after rejected application");
            Ok(job_unavailable(jar, state))
        }
    }
}

/// POST /jobs/{id}/apply
pub async fn apply(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Path(job_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, JobBoardError> {
    let Ok(job_id) = Uuid::parse_str(&job_id) else {
        return job_not_found();
    };
    let Some(session) = session else {
        return Ok(Redirect::to(&login_url(Some(&format!("/jobs/{job_id}")))).into_response());
    };

    let Submission { form, resume } = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            warn!(%job_id, error = %err, "unreadable application form");
            return apply_failed(
                &state,
                &session,
                jar,
                job_id,
                ApplyForm::default(),
                &err.user_message(),
            )
            .await;
        }
    };

    if form.cover_letter.trim().is_empty() {
        return apply_failed(&state, &session, jar, job_id, form, "A cover letter is required.")
            .await;
    }

    let resume_url = match resume {
        Some(file) => {
            match state
                .backend
                .upload_resume(
                    session.token(),
                    &file.file_name,
                    file.content_type.as_deref(),
                    file.bytes,
                )
                .await
            {
                Ok(url) => Some(url.to_string()),
                Err(err) => {
                    error!(%job_id, error = %err, "resume upload failed");
                    let message = match err {
                        JobBoardError::UnsupportedUpload(reason) => reason,
                        _ => "Failed to upload your resume. Please try again.".to_string(),
                    };
                    return apply_failed(&state, &session, jar, job_id, form, &message).await;
                }
            }
        }
        None => match resume_link(&form.resume_url) {
            Ok(link) => link,
            Err(message) => {
                return apply_failed(&state, &session, jar, job_id, form, message).await;
            }
        },
    };

    let application = NewApplication {
        job_id,
        candidate_id: session.user_id(),
        cover_letter: form.cover_letter.clone(),
        resume_url,
    };
    match applications::create(&state.backend, session.token(), &application).await {
        Ok(_) => Ok(redirect_with(
            jar,
            "/candidate/dashboard",
            &Flash::success("Application submitted successfully!"),
            state.secure_cookies(),
        )),
        Err(err) => {
            error!(%job_id, error = %err, "failed to submit application");
            apply_failed(
                &state,
                &session,
                jar,
                job_id,
                form,
                "Failed to submit application. Please try again.",
            )
            .await
        }
    }
}
