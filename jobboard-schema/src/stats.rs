use serde::Serialize;

use crate::{ApplicationStatus, JobStatus, JobStatusRow};

/// Candidate dashboard counters. `total == pending + accepted + rejected` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CandidateStats {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl CandidateStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ApplicationStatus>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut stats, status| {
                stats.total += 1;
                match status {
                    ApplicationStatus::Pending => stats.pending += 1,
                    ApplicationStatus::Accepted => stats.accepted += 1,
                    ApplicationStatus::Rejected => stats.rejected += 1,
                }
                stats
            })
    }
}

/// Employer dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmployerStats {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
}

impl EmployerStats {
    pub fn from_rows(jobs: &[JobStatusRow], application_rows: usize) -> Self {
        Self {
            total_jobs: jobs.len(),
            active_jobs: jobs
                .iter()
                .filter(|j| j.status == JobStatus::Published)
                .count(),
            total_applications: application_rows,
        }
    }
}
