pub mod auth;
pub mod candidate;
pub mod employer;
pub mod home;
pub mod jobs;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::error;

use crate::error::JobBoardError;
use crate::server::flash;
use crate::session::Session;
use crate::views::Flash;

/// Reads fall back to an empty result; the failure is only logged.
pub(crate) fn or_empty<T: Default>(what: &'static str, result: Result<T, JobBoardError>) -> T {
    result.unwrap_or_else(|err| {
        error!(read = what, error = %err, "backend read failed, rendering empty result");
        T::default()
    })
}

pub(crate) fn token(session: Option<&Session>) -> Option<&str> {
    session.and_then(Session::token)
}

pub(crate) fn render(page: &impl Template) -> Result<Html<String>, JobBoardError> {
    Ok(Html(page.render()?))
}

pub(crate) fn render_with_status(
    status: StatusCode,
    page: &impl Template,
) -> Result<Response, JobBoardError> {
    Ok((status, render(page)?).into_response())
}

/// Post/redirect/get with a message for the next page.
pub(crate) fn redirect_with(
    jar: PrivateCookieJar,
    to: &str,
    message: &Flash,
    secure: bool,
) -> Response {
    (flash::put(jar, message, secure), Redirect::to(to)).into_response()
}
