use serde::{Deserialize, Serialize};
use url::Url;

/// Hosted backend (PostgREST + GoTrue + Storage) settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    /// Env: `SUPABASE_URL`. TOML: `backend.url`. Required.
    #[serde(default)]
    pub url: Option<Url>,

    /// Public (anon) API key sent with every request.
    /// Env: `SUPABASE_ANON_KEY`. TOML: `backend.anon_key`. Required.
    #[serde(default)]
    pub anon_key: String,

    /// Storage bucket receiving uploaded resumes.
    /// TOML: `backend.resume_bucket`. Default: `resumes`.
    #[serde(default = "default_resume_bucket")]
    pub resume_bucket: String,

    /// Optional upstream HTTP proxy for the reqwest client.
    /// TOML: `backend.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `backend.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// TOML: `backend.request_timeout_secs`. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Largest accepted resume upload in bytes.
    /// TOML: `backend.max_upload_bytes`. Default: 10 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: String::new(),
            resume_bucket: default_resume_bucket(),
            proxy: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_resume_bucket() -> String {
    "resumes".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
