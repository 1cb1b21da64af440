use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse, env_required};
use std::time::Duration;

use crate::severity::Severity;

pub const DEFAULT_LOG_INDEX: &str = "product_api_log";

/// Settings for shipping logs to the search backend
#[derive(Clone, Debug)]
pub struct SearchLogConfig {
    /// Base URL of the search backend, e.g. `http://localhost:9200`
    pub url: String,
    pub index: String,
    /// Value of the `Host` field on every document
    pub host: String,
    /// Least severe level still shipped
    pub min_severity: Severity,
    pub queue_capacity: usize,
    pub request_timeout: Duration,
}

impl SearchLogConfig {
    /// `None` when `SEARCH_URL` is unset, which disables shipping.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        match env_optional("SEARCH_URL") {
            Some(_) => Self::from_env().map(Some),
            None => Ok(None),
        }
    }
}

/// Environment variables:
/// - `SEARCH_URL` (required)
/// - `SEARCH_LOG_INDEX` (product_api_log)
/// - `SEARCH_LOG_HOST` (localhost)
/// - `SEARCH_LOG_LEVEL` (debug)
/// - `SEARCH_LOG_QUEUE_CAPACITY` (1024)
/// - `SEARCH_REQUEST_TIMEOUT_SECS` (5)
impl FromEnv for SearchLogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let min_severity = env_or_default("SEARCH_LOG_LEVEL", "debug")
            .parse::<Severity>()
            .map_err(|e| ConfigError::ParseError {
                key: "SEARCH_LOG_LEVEL".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            url: env_required("SEARCH_URL")?,
            index: env_or_default("SEARCH_LOG_INDEX", DEFAULT_LOG_INDEX),
            host: env_or_default("SEARCH_LOG_HOST", "localhost"),
            min_severity,
            queue_capacity: env_parse("SEARCH_LOG_QUEUE_CAPACITY", "1024")?,
            request_timeout: Duration::from_secs(env_parse("SEARCH_REQUEST_TIMEOUT_SECS", "5")?),
        })
    }
}
