//! Environment-backed settings.
//!
//! Everything is read once at startup; a missing token is a configuration
//! error raised before any network call is attempted. Nothing here is
//! persisted — the remote services own all durable state.

use crate::consts;
use crate::error::{Error, Result};

/// Connection settings for the to-do service.
#[derive(Debug, Clone)]
pub struct TodoSettings {
    pub token: String,
    pub rest_url: String,
    pub sync_url: String,
}

/// Connection settings for the automation platform.
#[derive(Debug, Clone)]
pub struct JobsSettings {
    pub token: String,
    pub base_url: String,
    /// Skip TLS certificate verification. Off unless explicitly opted in;
    /// self-signed controller certs are the only reason to set it.
    pub insecure_tls: bool,
    pub acl_template_id: u64,
}

/// The full startup configuration snapshot.
#[derive(Debug, Clone)]
pub struct Settings {
    pub todo: TodoSettings,
    pub jobs: JobsSettings,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup. Tests pass a
    /// closure over a map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| -> Result<String> {
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::Config(format!("{var} is not set"))),
            }
        };

        let todo = TodoSettings {
            token: required(consts::ENV_TODO_TOKEN)?,
            rest_url: lookup(consts::ENV_TODO_REST_URL)
                .unwrap_or_else(|| consts::DEFAULT_TODO_REST_URL.to_string()),
            sync_url: lookup(consts::ENV_TODO_SYNC_URL)
                .unwrap_or_else(|| consts::DEFAULT_TODO_SYNC_URL.to_string()),
        };

        let acl_template_id = match lookup(consts::ENV_ACL_TEMPLATE_ID) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a numeric template id, got '{raw}'",
                    consts::ENV_ACL_TEMPLATE_ID
                ))
            })?,
            None => consts::DEFAULT_ACL_TEMPLATE_ID,
        };

        let jobs = JobsSettings {
            token: required(consts::ENV_JOBS_TOKEN)?,
            base_url: required(consts::ENV_JOBS_URL)?,
            insecure_tls: lookup(consts::ENV_JOBS_INSECURE_TLS)
                .map(|v| truthy(&v))
                .unwrap_or(false),
            acl_template_id,
        };

        Ok(Settings { todo, jobs })
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
