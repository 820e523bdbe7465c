//! Typed reads and writes per table, on top of [`BackendClient`](crate::backend::BackendClient).
//!
//! Functions take the caller's access token so row-level policies on the backend
//! see the signed-in user. `None` reads as the anonymous role.

pub mod applications;
pub mod jobs;
pub mod profiles;

pub(crate) const JOBS: &str = "jobs";
pub(crate) const APPLICATIONS: &str = "applications";
pub(crate) const PROFILES: &str = "profiles";
