use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::{error, warn};

use super::BackendErrorBody;
use crate::views::ErrorPage;

#[derive(Debug, ThisError)]
pub enum JobBoardError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Backend error ({status}): {}", .body.message())]
    Backend {
        status: StatusCode,
        body: BackendErrorBody,
    },

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Upload rejected: {0}")]
    UnsupportedUpload(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl JobBoardError {
    pub fn status(&self) -> StatusCode {
        match self {
            JobBoardError::NotFound => StatusCode::NOT_FOUND,
            JobBoardError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            JobBoardError::UnsupportedUpload(_) | JobBoardError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            JobBoardError::Http(_)
            | JobBoardError::Json(_)
            | JobBoardError::Backend { .. } => StatusCode::BAD_GATEWAY,
            JobBoardError::Url(_) | JobBoardError::Template(_) | JobBoardError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the person using the site.
    pub fn user_message(&self) -> String {
        match self {
            JobBoardError::NotFound => "The page you're looking for doesn't exist.".to_string(),
            JobBoardError::InvalidCredentials => self.to_string(),
            JobBoardError::UnsupportedUpload(reason) => reason.clone(),
            JobBoardError::Multipart(_) => "The submitted form could not be read.".to_string(),
            JobBoardError::Backend { body, .. } => body.message().to_string(),
            JobBoardError::Http(_) | JobBoardError::Json(_) => {
                "The job board service is unavailable. Please try again.".to_string()
            }
            JobBoardError::Url(_) | JobBoardError::Template(_) | JobBoardError::Config(_) => {
                "An internal error occurred.".to_string()
            }
        }
    }
}

impl IntoResponse for JobBoardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        let page = ErrorPage::new(status, self.user_message());
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => {
                error!(error = %render_err, "failed to render error page");
                (status, page.message).into_response()
            }
        }
    }
}
