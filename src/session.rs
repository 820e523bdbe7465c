//! The signed-in user's backend session, carried in an encrypted cookie.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::backend::{AuthSession, AuthUser};

pub const SESSION_COOKIE: &str = "jb_session";

/// Tokens are refreshed this long before they actually expire.
const REFRESH_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

impl From<AuthSession> for Session {
    fn from(auth: AuthSession) -> Self {
        let expires_at = auth.expiry();
        Self {
            user: auth.user,
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_at,
        }
    }
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    /// Bearer token for backend calls made on this user's behalf.
    pub fn token(&self) -> Option<&str> {
        Some(&self.access_token)
    }

    pub fn needs_refresh(&self) -> bool {
        Utc::now().timestamp() + REFRESH_MARGIN_SECS >= self.expires_at
    }

    pub fn read(jar: &PrivateCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        match serde_json::from_str(cookie.value()) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session cookie");
                None
            }
        }
    }

    pub fn store(&self, jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
        match serde_json::to_string(self) {
            Ok(value) => jar.add(build_cookie(SESSION_COOKIE, value, secure, Duration::days(30))),
            Err(err) => {
                warn!(error = %err, "failed to encode session cookie");
                jar
            }
        }
    }

    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(removal_cookie(SESSION_COOKIE))
    }
}

pub(crate) fn build_cookie(
    name: &'static str,
    value: String,
    secure: bool,
    max_age: Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

/// Removal must match the path the cookie was set with.
pub(crate) fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
