pub mod application;
pub mod job;
pub mod profile;
pub mod stats;

mod nullable;

pub use application::{
    Application, ApplicationOwnership, ApplicationStatus, ApplicationStatusPatch,
    ApplicationWithCandidate, ApplicationWithJob, CandidateSummary, JobOwner, JobSummary,
    NewApplication, StatusRow,
};
pub use job::{AggregateCount, Job, JobStatus, JobStatusRow, JobType, JobWithApplicationCount, NewJob};
pub use profile::Profile;
pub use stats::{CandidateStats, EmployerStats};

/// Error returned when a form or query value names no known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}
