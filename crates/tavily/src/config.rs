use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

pub const TAVILY_HOST: &str = "https://api.tavily.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const API_KEY_VAR: &str = "TAVILY_API_KEY";
const HOST_VAR: &str = "TAVILY_API_HOST";
const TIMEOUT_VAR: &str = "TAVILY_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub api_key: String,
    pub host: String,
    pub timeout: Duration,
}

impl TavilyConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            host: TAVILY_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `TAVILY_API_KEY`, `TAVILY_API_HOST` and `TAVILY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_env(API_KEY_VAR)?.ok_or_else(|| ConfigError::MissingEnvVar {
            env_var: API_KEY_VAR.to_string(),
        })?;

        let mut config = Self::new(api_key);
        if let Some(host) = get_env(HOST_VAR)? {
            config.host = host;
        }
        if let Some(secs) = get_env(TIMEOUT_VAR)? {
            let secs: u64 = secs.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar {
                    env_var: TIMEOUT_VAR.to_string(),
                    reason: e.to_string(),
                }
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn research_url(&self) -> String {
        format!("{}/research", self.host.trim_end_matches('/'))
    }
}

// Unset and empty variables both read as `None`; the caller decides whether that is an error.
fn get_env(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(Some(value)),
        Ok(_) | Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::InvalidEnvVar {
            env_var: key.to_string(),
            reason: e.to_string(),
        }),
    }
}
