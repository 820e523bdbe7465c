use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::JobBoardError;
use crate::search::SearchDebouncer;
use crate::server::guards::session::load_session;
use crate::server::routes::{auth, candidate, employer, home, jobs};

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::{HeaderName, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use reqwest::header::HeaderValue;
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub search: Arc<SearchDebouncer>,
    pub insecure_cookie: bool,
    pub max_upload_bytes: usize,
    cookie_key: Key,
}

impl AppState {
    pub fn new(cfg: &Config, backend: BackendClient, cookie_key: Key) -> Self {
        Self {
            backend,
            search: Arc::new(SearchDebouncer::new(cfg.search_debounce())),
            insecure_cookie: cfg.basic.insecure_cookie,
            max_upload_bytes: cfg.backend.max_upload_bytes,
            cookie_key,
        }
    }

    pub fn secure_cookies(&self) -> bool {
        !self.insecure_cookie
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> Response {
    JobBoardError::NotFound.into_response()
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn jobboard_router(state: AppState) -> Router {
    let apply = post(jobs::apply)
        .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.max_upload_bytes));

    let pages = Router::new()
        .route("/", get(home::home))
        .route("/jobs", get(jobs::list))
        .route("/jobs/search", get(jobs::search))
        .route("/jobs/{id}", get(jobs::detail))
        .route("/jobs/{id}/apply", apply)
        .route("/candidate/dashboard", get(candidate::dashboard))
        .route("/candidate/profile", post(candidate::save_profile))
        .route("/employer/dashboard", get(employer::dashboard))
        .route("/employer/jobs", post(employer::create_job))
        .route("/employer/jobs/{id}/delete", post(employer::delete_job))
        .route(
            "/employer/applications/{id}/status",
            post(employer::update_application_status),
        );

    let account = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout));

    Router::new()
        .merge(pages)
        .merge(account)
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .route("/healthz", get(home::healthz))
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
