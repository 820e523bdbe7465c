//! Askama view models. Templates live in `templates/`; every page extends `base.html`
//! and therefore carries a [`Nav`] and an optional [`Flash`].

mod pages;
mod time;

pub use pages::*;
pub use time::{distance_in_words, time_ago};

use jobboard_schema::ApplicationStatus;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::Session;

/// Navigation bar state.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub email: Option<String>,
    pub signed_in: bool,
    /// Error pages render without knowing who is signed in.
    pub hide_account: bool,
}

impl Nav {
    pub fn for_session(session: Option<&Session>) -> Self {
        Self {
            email: session.and_then(|s| s.email().map(str::to_string)),
            signed_in: session.is_some(),
            hide_account: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

/// One-shot message shown at the top of the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    pub fn css(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "bg-green-50 border-green-200 text-green-800",
            FlashKind::Error => "bg-red-50 border-red-200 text-red-800",
            FlashKind::Info => "bg-blue-50 border-blue-200 text-blue-800",
        }
    }
}

pub fn status_badge(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Accepted => "bg-green-100 text-green-800",
        ApplicationStatus::Rejected => "bg-red-100 text-red-800",
        ApplicationStatus::Pending => "bg-yellow-100 text-yellow-800",
    }
}

pub const RESUME_LINK_INVALID: &str = "Resume links must start with http:// or https://.";

/// Only absolute `http`/`https` URLs are rendered as links.
pub fn is_web_link(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Trimmed resume link from a form; blank means none.
pub fn resume_link(raw: &str) -> Result<Option<String>, &'static str> {
    let link = raw.trim();
    if link.is_empty() {
        Ok(None)
    } else if is_web_link(link) {
        Ok(Some(link.to_string()))
    } else {
        Err(RESUME_LINK_INVALID)
    }
}
