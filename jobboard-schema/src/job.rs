use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full Time",
            JobType::PartTime => "Part Time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "job type",
                value: s.to_string(),
            })
    }
}

/// Publication state. Candidates only ever see `Published` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    #[default]
    Published,
}

impl JobStatus {
    pub const ALL: [JobStatus; 2] = [JobStatus::Draft, JobStatus::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Published => "published",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Draft => "Draft",
            JobStatus::Published => "Published",
        }
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "job status",
                value: s.to_string(),
            })
    }
}

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub company: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub location: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub requirements: String,
    #[serde(default, deserialize_with = "crate::nullable::opt_string")]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub status: JobStatus,
    pub employer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `jobs` table; `id` and `created_at` are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub employer_id: Uuid,
}

/// Result row of an aggregate embed such as `applications(count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct AggregateCount {
    pub count: u64,
}

/// `jobs` row with its embedded application count (`select=*,applications(count)`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobWithApplicationCount {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default)]
    pub applications: Vec<AggregateCount>,
}

impl JobWithApplicationCount {
    pub fn application_count(&self) -> u64 {
        self.applications.iter().map(|c| c.count).sum()
    }
}

/// Projection used for employer statistics (`select=id,status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JobStatusRow {
    pub id: Uuid,
    pub status: JobStatus,
}
