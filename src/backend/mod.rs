//! Client for the hosted backend: table API (`/rest/v1`), auth (`/auth/v1`) and
//! blob storage (`/storage/v1`).
//!
//! Every call is a single attempt. Failures come back as [`JobBoardError`] with
//! the backend's own error payload attached.

pub mod auth;
pub mod query;
pub mod rest;
pub mod storage;

pub use auth::{AuthSession, AuthUser, SignUpOutcome};
pub use query::{Order, Query};

use crate::config::BackendConfig;
use crate::error::{BackendErrorBody, JobBoardError, preview};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("jobboard/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Arc<Url>,
    anon_key: Arc<str>,
    resume_bucket: Arc<str>,
}

impl BackendClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, JobBoardError> {
        let base = cfg
            .url
            .clone()
            .ok_or_else(|| JobBoardError::Config("backend.url is not set".to_string()))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs));

        if let Some(proxy_url) = cfg.proxy.clone() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Ok(Self::with_client(
            builder.build()?,
            base,
            &cfg.anon_key,
            &cfg.resume_bucket,
        ))
    }

    pub fn with_client(http: reqwest::Client, mut base: Url, anon_key: &str, bucket: &str) -> Self {
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            http,
            base: Arc::new(base),
            anon_key: Arc::from(anon_key),
            resume_bucket: Arc::from(bucket),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn resume_bucket(&self) -> &str {
        &self.resume_bucket
    }

    fn endpoint(&self, path: &str) -> Result<Url, JobBoardError> {
        Ok(self.base.join(path)?)
    }

    /// Adds the public key and the bearer token (the user's access token when signed in,
    /// the public key otherwise).
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        request
            .header("apikey", self.anon_key.as_ref())
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {bearer}"))
    }

    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, JobBoardError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let resp = self.http.execute(request).await?;
        debug!(%method, %path, status = %resp.status(), "backend call");
        Ok(resp)
    }
}

/// Reads a successful body as JSON, or converts the backend's error payload.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, JobBoardError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(backend_error(status, &bytes));
    }
    serde_json::from_slice(&bytes).map_err(|err| {
        debug!(
            body = %preview(&String::from_utf8_lossy(&bytes)),
            "backend body did not match the expected shape"
        );
        err.into()
    })
}

pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), JobBoardError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = resp.bytes().await?;
    Err(backend_error(status, &bytes))
}

pub(crate) fn backend_error(status: StatusCode, body: &[u8]) -> JobBoardError {
    let body = BackendErrorBody::parse(body);
    warn!(
        %status,
        code = body.code().as_deref().unwrap_or("-"),
        message = body.message(),
        "backend returned an error"
    );
    JobBoardError::Backend { status, body }
}
