use axum::body::Bytes;
use reqwest::header;
use tracing::info;
use url::Url;
use uuid::Uuid;

use super::{BackendClient, expect_success};
use crate::error::JobBoardError;

/// File types accepted for resumes, matching the form's `accept` filter.
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Lower-cased extension of an uploaded file name, if it is an accepted resume type.
pub fn resume_extension(file_name: &str) -> Result<String, JobBoardError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if RESUME_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(JobBoardError::UnsupportedUpload(format!(
            "Resumes must be a {} file.",
            RESUME_EXTENSIONS.join(", ")
        )))
    }
}

/// `resumes/<random>.<ext>`; the random name keeps uploads from colliding.
pub fn resume_object_path(file_name: &str) -> Result<String, JobBoardError> {
    let ext = resume_extension(file_name)?;
    Ok(format!("resumes/{}.{ext}", Uuid::new_v4()))
}

impl BackendClient {
    fn object_url(&self, prefix: &str, path: &str) -> Result<Url, JobBoardError> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&self.resume_bucket)
            .extend(path.split('/'));
        Ok(url)
    }

    /// Public download URL of an object in the resume bucket. Computed locally.
    pub fn public_url(&self, path: &str) -> Result<Url, JobBoardError> {
        self.object_url("storage/v1/object/public/", path)
    }

    pub async fn upload(
        &self,
        access_token: Option<&str>,
        path: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), JobBoardError> {
        let url = self.object_url("storage/v1/object/", path)?;
        let size = body.len();
        let request = self
            .authorize(self.http.post(url), access_token)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .build()?;
        expect_success(self.execute(request).await?).await?;
        info!(bucket = %self.resume_bucket, %path, size, "object uploaded");
        Ok(())
    }

    /// Stores a resume under a fresh name and returns its public URL.
    pub async fn upload_resume(
        &self,
        access_token: Option<&str>,
        file_name: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Url, JobBoardError> {
        let path = resume_object_path(file_name)?;
        let content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or("application/octet-stream");
        self.upload(access_token, &path, content_type, body).await?;
        self.public_url(&path)
    }
}
