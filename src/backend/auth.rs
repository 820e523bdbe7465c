//! Email/password accounts on the backend's auth API.

use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{BackendClient, backend_error, expect_success, read_json};
use crate::error::JobBoardError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a password grant, a refresh grant or an auto-confirmed sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl AuthSession {
    /// Absolute expiry in unix seconds, derived from `expires_in` when the backend omits it.
    pub fn expiry(&self) -> i64 {
        self.expires_at.unwrap_or_else(|| {
            Utc::now().timestamp() + self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
        })
    }
}

const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    SignedIn(AuthSession),
    /// The account exists but the address must be confirmed before signing in.
    ConfirmationRequired(AuthUser),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

impl BackendClient {
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, JobBoardError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self
            .authorize(self.http.post(url), None)
            .json(&json!({ "email": email, "password": password }))
            .build()?;
        let resp = self.execute(request).await?;
        let status = resp.status();
        if status == StatusCode::BAD_REQUEST {
            let bytes = resp.bytes().await?;
            info!(body = %crate::error::preview(&String::from_utf8_lossy(&bytes)), "password sign-in refused");
            return Err(JobBoardError::InvalidCredentials);
        }
        read_json(resp).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, JobBoardError> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self
            .authorize(self.http.post(url), None)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .build()?;
        let resp = self.execute(request).await?;
        Ok(match read_json::<SignUpResponse>(resp).await? {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn(session),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationRequired(user),
        })
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, JobBoardError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let request = self
            .authorize(self.http.post(url), None)
            .json(&json!({ "refresh_token": refresh_token }))
            .build()?;
        let resp = self.execute(request).await?;
        let status = resp.status();
        if status.is_client_error() {
            let bytes = resp.bytes().await?;
            return Err(backend_error(status, &bytes));
        }
        read_json(resp).await
    }

    /// Revokes the refresh token behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), JobBoardError> {
        let url = self.endpoint("auth/v1/logout")?;
        let request = self
            .authorize(self.http.post(url), Some(access_token))
            .build()?;
        expect_success(self.execute(request).await?).await
    }
}
