use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "application status",
                value: s.to_string(),
            })
    }
}

/// A row of the `applications` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub cover_letter: String,
    #[serde(default, deserialize_with = "crate::nullable::opt_string")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; `status` is left to the backend default (`pending`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: String,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationStatusPatch {
    pub status: ApplicationStatus,
}

/// Projection used for candidate statistics (`select=status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusRow {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct JobSummary {
    pub title: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub company: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub location: String,
}

/// `select=*,job:jobs(title,company,location)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    #[serde(default)]
    pub job: Option<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct CandidateSummary {
    #[serde(default, deserialize_with = "crate::nullable::opt_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "crate::nullable::opt_string")]
    pub title: Option<String>,
}

/// `select=*,profiles:candidate_id(full_name,title)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationWithCandidate {
    #[serde(flatten)]
    pub application: Application,
    #[serde(default)]
    pub profiles: Option<CandidateSummary>,
}

impl ApplicationWithCandidate {
    pub fn candidate_name(&self) -> &str {
        self.profiles
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .unwrap_or("Anonymous candidate")
    }

    pub fn candidate_title(&self) -> &str {
        self.profiles
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JobOwner {
    pub employer_id: Uuid,
}

/// `select=id,job_id,job:jobs(employer_id)`, used to authorize status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ApplicationOwnership {
    pub id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub job: Option<JobOwner>,
}

impl ApplicationOwnership {
    pub fn is_owned_by(&self, employer_id: Uuid) -> bool {
        self.job.is_some_and(|j| j.employer_id == employer_id)
    }
}
