mod backend;
mod basic;

pub use backend::BackendConfig;
pub use basic::BasicConfig;

use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock, time::Duration};
use tracing::warn;

use crate::error::JobBoardError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Hosted backend settings (see `backend` table in config.toml).
    #[serde(default)]
    pub backend: BackendConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "JOBBOARD_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and the environment.
    ///
    /// `JOBBOARD_BASIC__LISTEN_PORT` style variables override any field; the two well-known
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` variables map onto the backend section.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().filter_map(|key| {
                if key == "SUPABASE_URL" {
                    Some("backend.url".into())
                } else if key == "SUPABASE_ANON_KEY" {
                    Some("backend.anon_key".into())
                } else {
                    None
                }
            }))
    }

    /// Loads and validates configuration from every source.
    pub fn load() -> Result<Self, JobBoardError> {
        let cfg: Self = Self::figment()
            .extract()
            .map_err(|err| JobBoardError::Config(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), JobBoardError> {
        if self.backend.url.is_none() {
            return Err(JobBoardError::Config(
                "SUPABASE_URL (backend.url) must be set".to_string(),
            ));
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(JobBoardError::Config(
                "SUPABASE_ANON_KEY (backend.anon_key) must be set and non-empty".to_string(),
            ));
        }
        if self.basic.search_debounce_ms == 0 {
            return Err(JobBoardError::Config(
                "basic.search_debounce_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.basic.search_debounce_ms)
    }

    /// Resolves the cookie encryption key.
    ///
    /// Without `basic.cookie_secret` every restart invalidates existing sessions.
    pub fn cookie_key(&self) -> Result<Key, JobBoardError> {
        match self.basic.cookie_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(secret)
                    .map_err(|e| JobBoardError::Config(format!("basic.cookie_secret: {e}")))?;
                Key::try_from(bytes.as_slice()).map_err(|_| {
                    JobBoardError::Config(
                        "basic.cookie_secret must decode to at least 64 bytes".to_string(),
                    )
                })
            }
            _ => {
                warn!("basic.cookie_secret not set; sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|err| panic!("invalid configuration: {err}"))
});
