use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::PrivateCookieJar;

use super::render;
use crate::error::JobBoardError;
use crate::server::{flash, guards::session::CurrentUser};
use crate::views::{HomePage, Nav};

/// GET /
pub async fn home(
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let page = HomePage::new(Nav::for_session(session.as_ref()), flash);
    Ok((jar, render(&page)?).into_response())
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
