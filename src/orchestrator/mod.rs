//! Remote job orchestration.
//!
//! [`Orchestrator`] launches a job template on the automation platform,
//! polls the job at a fixed interval until it reaches a terminal status,
//! and pulls one named artifact out of the result. Jobs live entirely on
//! the remote side — nothing is persisted here, and an abandoned await
//! leaves the remote job running under the platform's own lifecycle.

pub mod aap;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::consts;
use crate::error::{Error, Result};

/// Job status as the platform reports it. Only `Successful` is
/// terminal-success; every stable state other than pending/running is
/// terminal-failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Pending,
    Running,
    Successful,
    Failed,
    /// Anything else the platform invents. Treated as terminal-failure.
    Other(String),
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        // "new" and "waiting" are queue states before the job runs.
        match raw.as_str() {
            "new" | "pending" | "waiting" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "successful" => JobStatus::Successful,
            "failed" | "error" | "canceled" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Successful => write!(f, "successful"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

/// Identifies one launched remote execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JobHandle {
    pub id: u64,
}

/// One polling read of a job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    pub status: JobStatus,
    /// Named outputs of the job. Meaningful only once status is
    /// `Successful`.
    #[serde(default)]
    pub artifacts: serde_json::Map<String, Value>,
}

/// What the orchestrator needs from the platform. The real implementation
/// lives in [`aap`]; tests script their own.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Start a job from a template. Idempotency is the platform's problem.
    async fn launch(&self, template_id: u64) -> Result<JobHandle>;
    /// Read the job's current status and artifacts.
    async fn fetch(&self, job_id: u64) -> Result<JobRecord>;
}

/// Polling cadence and budget.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Fixed wait between polls. No backoff.
    pub poll_interval: Duration,
    /// Attempts before a never-terminating job becomes an error.
    pub max_polls: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: consts::DEFAULT_POLL_INTERVAL,
            max_polls: consts::DEFAULT_MAX_POLLS,
        }
    }
}

/// Drives one job from launch to artifact.
pub struct Orchestrator<A: JobApi> {
    api: A,
    config: OrchestratorConfig,
}

impl<A: JobApi> Orchestrator<A> {
    pub fn new(api: A, config: OrchestratorConfig) -> Self {
        Self { api, config }
    }

    /// Start a remote job. A launch failure surfaces immediately; there
    /// is no retry at this layer.
    pub async fn launch(&self, template_id: u64) -> Result<JobHandle> {
        let handle = self.api.launch(template_id).await?;
        info!(template_id, job = handle.id, "job launched");
        Ok(handle)
    }

    /// Poll until the job terminates, then extract the artifact under
    /// `key`. A transport error during polling is immediately fatal; a
    /// terminal status other than successful, or an exhausted poll budget,
    /// is an orchestration error.
    pub async fn await_artifact(&self, handle: JobHandle, key: &str) -> Result<Value> {
        for attempt in 1..=self.config.max_polls {
            let job = self.api.fetch(handle.id).await?;
            match job.status {
                JobStatus::Successful => {
                    info!(job = handle.id, attempt, "job finished");
                    return job.artifacts.get(key).cloned().ok_or_else(|| {
                        Error::ArtifactMissing(format!(
                            "job {} succeeded but published no '{key}' artifact",
                            handle.id
                        ))
                    });
                }
                status if status.is_terminal() => {
                    return Err(Error::Orchestration(format!(
                        "job {} ended as '{status}'",
                        handle.id
                    )));
                }
                status => {
                    debug!(job = handle.id, attempt, %status, "job not finished, waiting");
                    if attempt < self.config.max_polls {
                        sleep(self.config.poll_interval).await;
                    }
                }
            }
        }
        Err(Error::Orchestration(format!(
            "job {} reached no terminal status after {} polls",
            handle.id, self.config.max_polls
        )))
    }

    /// Launch, await, extract: the operation the tool surface calls.
    pub async fn run_to_artifact(&self, template_id: u64, key: &str) -> Result<Value> {
        let handle = self.launch(template_id).await?;
        self.await_artifact(handle, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_platform_strings() {
        assert_eq!(JobStatus::from("pending".to_string()), JobStatus::Pending);
        assert_eq!(JobStatus::from("new".to_string()), JobStatus::Pending);
        assert_eq!(JobStatus::from("waiting".to_string()), JobStatus::Pending);
        assert_eq!(JobStatus::from("running".to_string()), JobStatus::Running);
        assert_eq!(
            JobStatus::from("successful".to_string()),
            JobStatus::Successful
        );
        assert_eq!(JobStatus::from("canceled".to_string()), JobStatus::Failed);
        assert_eq!(
            JobStatus::from("on-fire".to_string()),
            JobStatus::Other("on-fire".to_string())
        );
    }

    #[test]
    fn only_pending_and_running_are_non_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Successful.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Other("weird".to_string()).is_terminal());
    }

    #[test]
    fn job_record_deserializes_status_and_artifacts() {
        let json = r#"{
            "status": "successful",
            "artifacts": {"acl_data": {"rules": 12}},
            "elapsed": 42.5
        }"#;
        let record: JobRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, JobStatus::Successful);
        assert!(record.artifacts.contains_key("acl_data"));
    }

    #[test]
    fn job_record_tolerates_missing_artifacts() {
        let record: JobRecord = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert_eq!(record.status, JobStatus::Running);
        assert!(record.artifacts.is_empty());
    }
}
