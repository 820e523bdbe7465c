use crate::server::router::AppState;
use crate::session::{SESSION_COOKIE, Session};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Method, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use std::convert::Infallible;
use tracing::{info, warn};

/// Loads the session cookie for every request and refreshes an expiring access token.
///
/// The session (if any) is stored in request extensions for [`CurrentUser`] and
/// [`RequireUser`]. A failed refresh signs the browser out.
pub async fn load_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut updated_jar = None;
    let session = match Session::read(&jar) {
        Some(stale) if stale.needs_refresh() => {
            match state.backend.refresh_session(&stale.refresh_token).await {
                Ok(auth) => {
                    let fresh = Session::from(auth);
                    info!(user_id = %fresh.user_id(), "session refreshed");
                    updated_jar = Some(fresh.store(jar, state.secure_cookies()));
                    Some(fresh)
                }
                Err(err) => {
                    warn!(user_id = %stale.user_id(), error = %err, "session refresh failed, signing out");
                    updated_jar = Some(Session::clear(jar));
                    None
                }
            }
        }
        other => other,
    };

    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }

    let resp = next.run(req).await;
    match updated_jar {
        // Handlers that sign in or out own the cookie for this response.
        Some(jar) if !sets_session_cookie(&resp) => (jar, resp).into_response(),
        _ => resp,
    }
}

fn sets_session_cookie(resp: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.as_bytes().starts_with(prefix.as_bytes()))
}

/// The signed-in user's session, if there is one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Session>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Session>().cloned()))
    }
}

/// Rejects anonymous requests with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for RequireUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(RequireUser(session.clone())),
            None => {
                // Only page loads can be resumed after signing in.
                let next = (parts.method == Method::GET)
                    .then(|| parts.uri.path_and_query().map(|pq| pq.as_str()))
                    .flatten();
                Err(Redirect::to(&login_url(next)))
            }
        }
    }
}

pub fn login_url(next: Option<&str>) -> String {
    match next.map(safe_next) {
        Some(next) if next != "/" => {
            let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
            format!("/login?next={encoded}")
        }
        _ => "/login".to_string(),
    }
}

/// Keeps post-login redirects on this site.
pub fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        next
    } else {
        "/"
    }
}
