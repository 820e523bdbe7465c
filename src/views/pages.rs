use askama::Template;
use axum::http::StatusCode;
use jobboard_schema::{
    ApplicationStatus, ApplicationWithCandidate, ApplicationWithJob, CandidateStats,
    EmployerStats, Job, JobStatus, JobType, JobWithApplicationCount, NewJob, Profile,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{Flash, Nav, is_web_link, status_badge, time_ago};

pub struct FeaturedCompany {
    pub name: &'static str,
    pub logo: &'static str,
    pub industry: &'static str,
    pub open_positions: u32,
    pub rating: &'static str,
}

pub const FEATURED_COMPANIES: [FeaturedCompany; 4] = [
    FeaturedCompany {
        name: "TechCorp",
        logo: "https://images.unsplash.com/photo-1611162616305-c69b3fa7fbe0?w=128&h=128&fit=crop",
        industry: "Technology",
        open_positions: 12,
        rating: "4.8",
    },
    FeaturedCompany {
        name: "DesignHub",
        logo: "https://images.unsplash.com/photo-1611162617474-5b21e879e113?w=128&h=128&fit=crop",
        industry: "Design",
        open_positions: 8,
        rating: "4.9",
    },
    FeaturedCompany {
        name: "FinanceFlow",
        logo: "https://images.unsplash.com/photo-1611162618071-b39a2ec055fb?w=128&h=128&fit=crop",
        industry: "Finance",
        open_positions: 15,
        rating: "4.7",
    },
    FeaturedCompany {
        name: "HealthPlus",
        logo: "https://images.unsplash.com/photo-1611162616475-46b635cb6868?w=128&h=128&fit=crop",
        industry: "Healthcare",
        open_positions: 20,
        rating: "4.6",
    },
];

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub companies: &'static [FeaturedCompany],
}

impl HomePage {
    pub fn new(nav: Nav, flash: Option<Flash>) -> Self {
        Self {
            nav,
            flash,
            companies: &FEATURED_COMPANIES,
        }
    }
}

/// A job as listed on the jobs page.
pub struct JobCard {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: &'static str,
    pub salary_range: Option<String>,
    pub posted: String,
}

impl From<Job> for JobCard {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            posted: time_ago(job.created_at),
            job_type: job.job_type.label(),
            title: job.title,
            company: job.company,
            location: job.location,
            salary_range: job.salary_range,
        }
    }
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub query: String,
    pub view_id: Uuid,
    pub jobs: Vec<JobCard>,
}

/// Result list only, swapped into the jobs page by the search box.
#[derive(Template)]
#[template(path = "jobs_results.html")]
pub struct JobResults {
    pub jobs: Vec<JobCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyForm {
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
}

#[derive(Template)]
#[template(path = "job_detail.html")]
pub struct JobDetailPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub job: Job,
    pub job_type: &'static str,
    pub posted: String,
    pub form: ApplyForm,
}

impl JobDetailPage {
    pub fn new(nav: Nav, flash: Option<Flash>, job: Job, form: ApplyForm) -> Self {
        Self {
            nav,
            flash,
            job_type: job.job_type.label(),
            posted: time_ago(job.created_at),
            job,
            form,
        }
    }
}

pub struct CandidateApplicationRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub applied: String,
    pub status: &'static str,
    pub badge: &'static str,
}

impl From<ApplicationWithJob> for CandidateApplicationRow {
    fn from(row: ApplicationWithJob) -> Self {
        let job = row.job.unwrap_or_default();
        Self {
            id: row.application.id,
            title: job.title,
            company: job.company,
            location: job.location,
            applied: time_ago(row.application.created_at),
            status: row.application.status.label(),
            badge: status_badge(row.application.status),
        }
    }
}

#[derive(Template)]
#[template(path = "candidate_dashboard.html")]
pub struct CandidateDashboardPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub stats: CandidateStats,
    pub profile: Profile,
    pub applications: Vec<CandidateApplicationRow>,
}

/// An `<option>` in a select box.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The employer's new-job form, as submitted and as re-rendered after a failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub salary_range: String,
    /// Select values stay raw so an unknown choice re-renders the form instead of failing
    /// extraction.
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub status: String,
}

/// A blank select falls back to the default choice.
fn choice<T: std::str::FromStr + Default>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        Some(T::default())
    } else {
        raw.parse().ok()
    }
}

impl JobForm {
    /// Label of the first required field left blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("Job title", &self.title),
            ("Company", &self.company),
            ("Location", &self.location),
            ("Description", &self.description),
            ("Requirements", &self.requirements),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
    }

    /// Message for a select holding a value outside its options.
    pub fn invalid_choice(&self) -> Option<String> {
        if self.job_type().is_none() {
            return Some(format!("Unknown job type {:?}.", self.job_type));
        }
        if self.status().is_none() {
            return Some(format!("Unknown job status {:?}.", self.status));
        }
        None
    }

    pub fn job_type(&self) -> Option<JobType> {
        choice(&self.job_type)
    }

    pub fn status(&self) -> Option<JobStatus> {
        choice(&self.status)
    }

    pub fn to_new_job(&self, employer_id: Uuid) -> NewJob {
        NewJob {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: self.requirements.trim().to_string(),
            salary_range: Some(self.salary_range.trim().to_string()).filter(|s| !s.is_empty()),
            job_type: self.job_type().unwrap_or_default(),
            status: self.status().unwrap_or_default(),
            employer_id,
        }
    }

    pub fn job_type_options(&self) -> Vec<SelectOption> {
        let current = self.job_type().unwrap_or_default();
        JobType::ALL
            .into_iter()
            .map(|t| SelectOption {
                value: t.as_str(),
                label: t.label(),
                selected: t == current,
            })
            .collect()
    }

    pub fn status_options(&self) -> Vec<SelectOption> {
        let current = self.status().unwrap_or_default();
        JobStatus::ALL
            .into_iter()
            .map(|s| SelectOption {
                value: s.as_str(),
                label: s.label(),
                selected: s == current,
            })
            .collect()
    }
}

pub struct ReviewRow {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_title: String,
    pub cover_letter: String,
    pub resume_url: Option<String>,
    pub applied: String,
    pub status: &'static str,
    pub badge: &'static str,
    pub options: Vec<SelectOption>,
}

impl From<ApplicationWithCandidate> for ReviewRow {
    fn from(row: ApplicationWithCandidate) -> Self {
        let status = row.application.status;
        Self {
            candidate_name: row.candidate_name().to_string(),
            candidate_title: row.candidate_title().to_string(),
            id: row.application.id,
            cover_letter: row.application.cover_letter,
            // Rows written before links were validated may hold anything.
            resume_url: row.application.resume_url.filter(|url| is_web_link(url)),
            applied: time_ago(row.application.created_at),
            status: status.label(),
            badge: status_badge(status),
            options: ApplicationStatus::ALL
                .into_iter()
                .map(|s| SelectOption {
                    value: s.as_str(),
                    label: s.label(),
                    selected: s == status,
                })
                .collect(),
        }
    }
}

pub struct EmployerJobRow {
    pub id: Uuid,
    pub title: String,
    pub status: &'static str,
    pub draft: bool,
    pub posted: String,
    pub application_count: u64,
    pub expanded: bool,
    pub applications: Vec<ReviewRow>,
}

impl EmployerJobRow {
    pub fn new(row: JobWithApplicationCount, selected: Option<Uuid>) -> Self {
        let application_count = row.application_count();
        let job = row.job;
        Self {
            id: job.id,
            status: job.status.label(),
            draft: job.status == JobStatus::Draft,
            posted: time_ago(job.created_at),
            title: job.title,
            application_count,
            expanded: selected == Some(job.id),
            applications: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "employer_dashboard.html")]
pub struct EmployerDashboardPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub stats: EmployerStats,
    pub jobs: Vec<EmployerJobRow>,
    pub show_form: bool,
    pub form: JobForm,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub full_name: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub nav: Nav,
    pub flash: Option<Flash>,
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorPage {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            nav: Nav {
                hide_account: true,
                ..Nav::default()
            },
            flash: None,
            status: status.as_u16(),
            title: status
                .canonical_reason()
                .unwrap_or("Something went wrong")
                .to_string(),
            message,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_schema::Application;

    #[test]
    fn error_page_escapes_and_renders_status() {
        let html = ErrorPage::new(StatusCode::NOT_FOUND, "<script>".to_string())
            .with_title("Job not found")
            .render()
            .expect("render");
        assert!(html.contains("Job not found"));
        assert!(html.contains("404"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("Sign Out"));
    }

    #[test]
    fn job_form_marks_selected_options() {
        let form = JobForm {
            job_type: "contract".to_string(),
            status: "draft".to_string(),
            ..JobForm::default()
        };
        let selected: Vec<&str> = form
            .job_type_options()
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["contract"]);
        assert!(form.status_options().iter().any(|o| o.selected && o.value == "draft"));
    }

    #[test]
    fn job_form_requires_core_fields_and_drops_blank_salary() {
        let mut form = JobForm {
            title: "Rust Engineer".to_string(),
            company: "TechCorp".to_string(),
            location: "Remote".to_string(),
            description: "Build things".to_string(),
            requirements: "  ".to_string(),
            salary_range: "   ".to_string(),
            ..JobForm::default()
        };
        assert_eq!(form.missing_field(), Some("Requirements"));

        form.requirements = "Rust".to_string();
        assert_eq!(form.missing_field(), None);

        let employer = Uuid::new_v4();
        let job = form.to_new_job(employer);
        assert_eq!(job.salary_range, None);
        assert_eq!(job.job_type, JobType::FullTime);
        assert_eq!(job.status, JobStatus::Published);
        assert_eq!(job.employer_id, employer);
    }

    #[test]
    fn job_form_flags_unknown_choices() {
        let mut form = JobForm {
            job_type: "temporary".to_string(),
            ..JobForm::default()
        };
        assert_eq!(
            form.invalid_choice().as_deref(),
            Some("Unknown job type \"temporary\".")
        );
        assert!(
            form.job_type_options()
                .iter()
                .any(|o| o.selected && o.value == "full-time")
        );

        form.job_type = "part-time".to_string();
        form.status = "archived".to_string();
        assert_eq!(
            form.invalid_choice().as_deref(),
            Some("Unknown job status \"archived\".")
        );

        form.status = "draft".to_string();
        assert_eq!(form.invalid_choice(), None);
        assert_eq!(form.status(), Some(JobStatus::Draft));
    }

    #[test]
    fn review_rows_only_link_web_resumes() {
        let row = |resume_url: &str| ApplicationWithCandidate {
            application: Application {
                id: Uuid::new_v4(),
                job_id: Uuid::new_v4(),
                candidate_id: Uuid::new_v4(),
                cover_letter: "Hello".to_string(),
                resume_url: Some(resume_url.to_string()),
                status: ApplicationStatus::Pending,
                created_at: chrono::Utc::now(),
            },
            profiles: None,
        };

        let linked = ReviewRow::from(row("https://cv.example.com/me.pdf"));
        assert_eq!(linked.resume_url.as_deref(), Some("https://cv.example.com/me.pdf"));

        let stored_script = ReviewRow::from(row("javascript:alert(document.cookie)"));
        assert_eq!(stored_script.resume_url, None);
        assert_eq!(stored_script.candidate_name, "Anonymous candidate");
    }

    #[test]
    fn job_results_show_empty_state() {
        let html = JobResults { jobs: Vec::new() }.render().expect("render");
        assert!(html.contains("No jobs found"));
    }
}
