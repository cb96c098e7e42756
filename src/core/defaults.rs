use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
pub const DEFAULT_UPLOAD_URL: &str =
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

pub const ENV_API_URL: &str = "PLAY_PUBLISHER_API_URL";
pub const ENV_UPLOAD_URL: &str = "PLAY_PUBLISHER_UPLOAD_URL";
pub const ENV_TIMEOUT_SECS: &str = "PLAY_PUBLISHER_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "PLAY_PUBLISHER_MAX_ATTEMPTS";

/// Runtime settings that are not part of the release configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub upload_url: String,
    pub timeout: Duration,
    /// How many invalid answers a prompt tolerates before giving up.
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Defaults overridden by `PLAY_PUBLISHER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            settings.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup(ENV_UPLOAD_URL) {
            settings.upload_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_positive(ENV_TIMEOUT_SECS, &raw)?;
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            let attempts = parse_positive(ENV_MAX_ATTEMPTS, &raw)?;
            settings.max_attempts = u32::try_from(attempts).map_err(|_| {
                Error::config_invalid_value(ENV_MAX_ATTEMPTS, Some(raw.clone()), "value too large")
            })?;
        }

        Ok(settings)
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        if let Some(attempts) = max_attempts {
            self.max_attempts = attempts;
        }
        self
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::config_invalid_value(
            key,
            Some(raw.to_string()),
            "expected a positive integer",
        )),
    }
}
