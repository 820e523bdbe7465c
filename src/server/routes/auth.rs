use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use jobboard_schema::Profile;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{redirect_with, render, render_with_status};
use crate::backend::SignUpOutcome;
use crate::error::JobBoardError;
use crate::repo::profiles;
use crate::server::guards::session::{CurrentUser, safe_next};
use crate::server::{AppState, flash};
use crate::session::Session;
use crate::views::{Flash, LoginPage, Nav, RegisterPage};

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

/// GET /login
pub async fn login_page(
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Query(params): Query<LoginParams>,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let page = LoginPage {
        nav: Nav::for_session(session.as_ref()),
        flash,
        email: String::new(),
        next: safe_next(params.next.as_deref().unwrap_or("/")).to_string(),
        error: None,
    };
    Ok((jar, render(&page)?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, JobBoardError> {
    let email = form.email.trim();
    let next = safe_next(&form.next).to_string();
    let rejected = |status: StatusCode, message: &str| {
        let page = LoginPage {
            nav: Nav::default(),
            flash: None,
            email: email.to_string(),
            next: next.clone(),
            error: Some(message.to_string()),
        };
        render_with_status(status, &page)
    };

    if email.is_empty() || form.password.is_empty() {
        return rejected(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Email and password are required.",
        );
    }

    match state.backend.sign_in_with_password(email, &form.password).await {
        Ok(auth) => {
            let session = Session::from(auth);
            info!(user_id = %session.user_id(), "signed in");
            let jar = session.store(jar, state.secure_cookies());
            Ok((jar, Redirect::to(&next)).into_response())
        }
        Err(JobBoardError::InvalidCredentials) => {
            rejected(StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
        Err(err) => {
            error!(error = %err, "sign-in failed");
            rejected(
                StatusCode::BAD_GATEWAY,
                "Sign-in is unavailable right now. Please try again.",
            )
        }
    }
}

/// GET /register
pub async fn register_page(
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, JobBoardError> {
    let (jar, flash) = flash::take(jar);
    let page = RegisterPage {
        nav: Nav::for_session(session.as_ref()),
        flash,
        full_name: String::new(),
        email: String::new(),
        error: None,
    };
    Ok((jar, render(&page)?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, JobBoardError> {
    let full_name = form.full_name.trim();
    let email = form.email.trim();
    let rejected = |status: StatusCode, message: String| {
        let page = RegisterPage {
            nav: Nav::default(),
            flash: None,
            full_name: full_name.to_string(),
            email: email.to_string(),
            error: Some(message),
        };
        render_with_status(status, &page)
    };

    if full_name.is_empty() || email.is_empty() || form.password.is_empty() {
        return rejected(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Full name, email and password are required.".to_string(),
        );
    }

    match state.backend.sign_up(email, &form.password, full_name).await {
        Ok(SignUpOutcome::SignedIn(auth)) => {
            let session = Session::from(auth);
            let profile = Profile {
                full_name: full_name.to_string(),
                ..Profile::empty(session.user_id())
            };
            if let Err(err) = profiles::save(&state.backend, session.token(), &profile).await {
                warn!(user_id = %session.user_id(), error = %err, "failed to create profile at sign-up");
            }
            info!(user_id = %session.user_id(), "registered and signed in");
            let jar = session.store(jar, state.secure_cookies());
            Ok(redirect_with(
                jar,
                "/",
                &Flash::success("Welcome to JobBoard!"),
                state.secure_cookies(),
            ))
        }
        Ok(SignUpOutcome::ConfirmationRequired(user)) => {
            info!(user_id = %user.id, "registered, awaiting email confirmation");
            let page = LoginPage {
                nav: Nav::default(),
                flash: Some(Flash::info(
                    "Check your email to confirm your account, then sign in.",
                )),
                email: email.to_string(),
                next: "/".to_string(),
                error: None,
            };
            Ok((jar, render(&page)?).into_response())
        }
        Err(err) => {
            warn!(error = %err, "sign-up failed");
            rejected(err.status(), err.user_message())
        }
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Response {
    if let Some(session) = session {
        match state.backend.sign_out(&session.access_token).await {
            Ok(()) => info!(user_id = %session.user_id(), "signed out"),
            Err(err) => warn!(user_id = %session.user_id(), error = %err, "backend sign-out failed"),
        }
    }
    let jar = Session::clear(jar);
    redirect_with(
        jar,
        "/",
        &Flash::info("You have been signed out."),
        state.secure_cookies(),
    )
}
