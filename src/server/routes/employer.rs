use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use jobboard_schema::{ApplicationStatus, EmployerStats, JobStatusRow};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use super::{or_empty, redirect_with, render, render_with_status};
use crate::error::JobBoardError;
use crate::repo::{applications, jobs};
use crate::server::guards::session::RequireUser;
use crate::server::{AppState, flash};
use crate::session::Session;
use crate::views::{EmployerDashboardPage, EmployerJobRow, Flash, JobForm, Nav, ReviewRow};

const DASHBOARD: &str = "/employer/dashboard";

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Job whose applications are expanded.
    pub job: Option<Uuid>,
    /// Present to open the new-job form.
    pub new: Option<String>,
}

struct DashboardView {
    flash: Option<Flash>,
    selected: Option<Uuid>,
    show_form: bool,
    form: JobForm,
}

async fn build_page(state: &AppState, session: &Session, view: DashboardView) -> EmployerDashboardPage {
    let employer_id = session.user_id();
    let token = session.token();

    let (listed, status_rows) = futures::join!(
        jobs::list_for_employer(&state.backend, token, employer_id),
        jobs::status_rows_for_employer(&state.backend, token, employer_id),
    );
    let listed = or_empty("employer jobs", listed);
    let status_rows: Vec<JobStatusRow> = or_empty("employer job statuses", status_rows);

    // Only the employer's own jobs can be expanded.
    let selected = view
        .selected
        .filter(|id| listed.iter().any(|row| row.job.id == *id));
    let job_ids: Vec<Uuid> = status_rows.iter().map(|row| row.id).collect();

    let (application_count, review) = futures::join!(
        applications::count_for_jobs(&state.backend, token, &job_ids),
        async {
            match selected {
                Some(job_id) => applications::for_job(&state.backend, token, job_id).await,
                None => Ok(Vec::new()),
            }
        },
    );

    let mut review: Vec<ReviewRow> = or_empty("job applications", review)
        .into_iter()
        .map(ReviewRow::from)
        .collect();
    let jobs = listed
        .into_iter()
        .map(|row| {
            let mut job = EmployerJobRow::new(row, selected);
            if job.expanded {
                job.applications = std::mem::take(&mut review);
            }
            job
        })
        .collect();

    EmployerDashboardPage {
        nav: Nav::for_session(Some(session)),
        flash: view.flash,
        stats: EmployerStats::from_rows(
            &status_rows,
            or_empty("employer application count", application_count),
        ),
        jobs,
        show_form: view.show_form,
        form: view.form,
    }
}

/// GET /employer/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
    Query(params): Query<DashboardParams>,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let view = DashboardView {
        flash,
        selected: params.job,
        show_form: params.new.is_some(),
        form: JobForm::default(),
    };
    let page = build_page(&state, &session, view).await;
    Ok((jar, render(&page)?).into_response())
}

async fn form_rejected(
    state: &AppState,
    session: &Session,
    form: JobForm,
    message: String,
) -> Result<Response, JobBoardError> {
    let view = DashboardView {
        flash: Some(Flash::error(message)),
        selected: None,
        show_form: true,
        form,
    };
    let page = build_page(state, session, view).await;
    render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page)
}

/// POST /employer/jobs
pub async fn create_job(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
    Form(form): Form<JobForm>,
) -> Result<Response, JobBoardError> {
    if let Some(field) = form.missing_field() {
        return form_rejected(&state, &session, form, format!("{field} is required.")).await;
    }
    if let Some(message) = form.invalid_choice() {
        return form_rejected(&state, &session, form, message).await;
    }

    let new_job = form.to_new_job(session.user_id());
    match jobs::create(&state.backend, session.token(), &new_job).await {
        Ok(_) => Ok(redirect_with(
            jar,
            DASHBOARD,
            &Flash::success("Job posting created."),
            state.secure_cookies(),
        )),
        Err(err) => {
            error!(employer_id = %session.user_id(), error = %err, "failed to create job");
            form_rejected(
                &state,
                &session,
                form,
                "Failed to create job posting".to_string(),
            )
            .await
        }
    }
}

/// POST /employer/jobs/{id}/delete
pub async fn delete_job(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
    Path(job_id): Path<Uuid>,
) -> Response {
    let flash = match jobs::delete_owned(&state.backend, session.token(), job_id, session.user_id())
        .await
    {
        Ok(true) => Flash::success("Job posting deleted."),
        Ok(false) => Flash::error("That job posting no longer exists."),
        Err(err) => {
            error!(%job_id, error = %err, "failed to delete job");
            Flash::error("Failed to delete job posting")
        }
    };
    redirect_with(jar, DASHBOARD, &flash, state.secure_cookies())
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// POST /employer/applications/{id}/status
pub async fn update_application_status(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: PrivateCookieJar,
    Path(application_id): Path<Uuid>,
    Form(form): Form<StatusForm>,
) -> Response {
    let secure = state.secure_cookies();
    let Ok(status) = form.status.parse::<ApplicationStatus>() else {
        return redirect_with(
            jar,
            DASHBOARD,
            &Flash::error(format!("Unknown application status {:?}.", form.status)),
            secure,
        );
    };

    let token = session.token();
    let ownership = match applications::ownership(&state.backend, token, application_id).await {
        Ok(ownership) => ownership,
        Err(JobBoardError::NotFound) => {
            return redirect_with(jar, DASHBOARD, &Flash::error("Application not found."), secure);
        }
        Err(err) => {
            error!(%application_id, error = %err, "failed to load application");
            return redirect_with(
                jar,
                DASHBOARD,
                &Flash::error("Failed to update application status"),
                secure,
            );
        }
    };

    if !ownership.is_owned_by(session.user_id()) {
        warn!(
            %application_id,
            employer_id = %session.user_id(),
            "status change refused for an application on another employer's job"
        );
        return redirect_with(
            jar,
            DASHBOARD,
            &Flash::error("You can only review applications for your own job postings."),
            secure,
        );
    }

    let back = format!("{DASHBOARD}?job={}", ownership.job_id);
    let flash = match applications::update_status(&state.backend, token, application_id, status).await
    {
        Ok(true) => Flash::success(format!("Application marked as {}.", status.label())),
        Ok(false) => Flash::error("Application not found."),
        Err(err) => {
            error!(%application_id, error = %err, "failed to update application status");
            Flash::error("Failed to update application status")
        }
    };
    redirect_with(jar, &back, &flash, secure)
}
