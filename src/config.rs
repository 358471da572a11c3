use anyhow::{Context, Result};
use std::env;

/// Settings for the problem rendering layer
#[derive(Debug, Clone)]
pub struct ProblemConfig {
    /// Fill an unset `instance` with the request path
    pub fill_instance_from_path: bool,
    /// Log 4xx problems at warn instead of debug
    pub log_client_errors: bool,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            fill_instance_from_path: true,
            log_client_errors: false,
        }
    }
}

impl ProblemConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables take their defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ProblemConfig {
            fill_instance_from_path: lookup("PROBLEM_FILL_INSTANCE")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .context("PROBLEM_FILL_INSTANCE must be true or false")?,
            log_client_errors: lookup("PROBLEM_LOG_CLIENT_ERRORS")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("PROBLEM_LOG_CLIENT_ERRORS must be true or false")?,
        })
    }
}
