//! Task query engine for the to-do service.
//!
//! [`TaskEngine`] fetches the remote task collection, resolves project
//! names, applies the filter chain from [`filter`], and issues mutations.
//! It holds no state of its own — every call re-fetches what it needs, so
//! independent tool invocations can never corrupt each other.

pub mod filter;
pub mod rest;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A project: a named folder for tasks. Read-only from this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Due-date payload as the remote reports it. Only the `date` part
/// participates in filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Due {
    pub date: String,
}

impl Due {
    /// The due date, if the remote sent a well-formed `YYYY-MM-DD`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// A to-do item as fetched from the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Free-text title. May contain markdown; opaque to filtering beyond
    /// substring match.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// None = inbox.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// 1 (normal) to 4 (urgent).
    #[serde(default = "priority_normal")]
    pub priority: u8,
    #[serde(default)]
    pub due: Option<Due>,
}

fn priority_normal() -> u8 {
    1
}

impl Task {
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_ref().and_then(Due::as_date)
    }
}

/// The id + title pair the task listing returns to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.content.clone(),
        }
    }
}

/// An item from the sync API's completed-task report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task_id: String,
    pub content: String,
    /// ISO-8601 completion timestamp, passed through untouched.
    pub completed_at: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Criteria for [`TaskEngine::list_tasks`]. Every field is optional; an
/// absent field makes its filter stage a no-op.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    /// Resolved to an id before filtering; a name that resolves to nothing
    /// aborts the query.
    pub project_name: Option<String>,
    /// Case-insensitive substring of the task title.
    pub content: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub overdue: Option<bool>,
    /// Task must carry every listed label.
    pub labels: Option<Vec<String>>,
    pub priority: Option<u8>,
    /// Cap on the result count, applied after all predicates.
    pub limit: Option<usize>,
}

/// Attributes for a new task. Only present fields are sent to the remote;
/// nothing is defaulted locally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

/// Sparse update: any attribute may change independently, absent fields
/// are not serialized and stay untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.description.is_none()
            && self.labels.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.deadline_date.is_none()
    }
}

/// What the engine needs from the to-do backend. The real implementation
/// lives in [`rest`]; tests script their own.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn projects(&self) -> Result<Vec<Project>>;
    async fn tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, draft: &NewTask) -> Result<Task>;
    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<()>;
    async fn close_task(&self, id: &str) -> Result<()>;
    async fn delete_task(&self, id: &str) -> Result<()>;
    async fn completed_since(&self, since: &str) -> Result<Vec<CompletedTask>>;
}

/// Strip literal quotation marks some callers wrap identifiers in.
/// Normalization, not validation: an unquoted id passes through as-is.
pub(crate) fn unquote(id: &str) -> &str {
    id.trim_matches('"')
}

/// The query engine over a to-do backend.
pub struct TaskEngine<A: TodoApi> {
    api: A,
}

impl<A: TodoApi> TaskEngine<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// All projects, as the remote reports them.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.api.projects().await
    }

    /// Case-insensitive exact match of a project name to its id.
    /// `Ok(None)` when no project carries that name.
    pub async fn resolve_project(&self, name: &str) -> Result<Option<String>> {
        let wanted = name.to_lowercase();
        let projects = self.api.projects().await?;
        Ok(projects
            .into_iter()
            .find(|p| p.name.to_lowercase() == wanted)
            .map(|p| p.id))
    }

    /// Fetch the full task collection once and run it through the filter
    /// chain. A `project_name` that resolves to nothing aborts with
    /// [`Error::NotFound`] — "no such project" is not "no tasks in project".
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskSummary>> {
        let mut effective = filter.clone();
        if effective.project_id.is_none()
            && let Some(name) = &effective.project_name
        {
            match self.resolve_project(name).await? {
                Some(id) => effective.project_id = Some(id),
                None => return Err(Error::NotFound(format!("project '{name}' not found"))),
            }
        }
        if let Some(id) = effective.project_id.take() {
            effective.project_id = Some(unquote(&id).to_string());
        }

        let tasks = self.api.tasks().await?;
        let today = Local::now().date_naive();
        let matched = filter::apply(tasks, &effective, today);
        debug!(count = matched.len(), "task query matched");
        Ok(matched.iter().map(TaskSummary::from).collect())
    }

    /// Create a task, returning the new id.
    pub async fn create_task(&self, draft: &NewTask) -> Result<String> {
        let mut draft = draft.clone();
        if let Some(id) = draft.project_id.take() {
            draft.project_id = Some(unquote(&id).to_string());
        }
        if let Some(id) = draft.section_id.take() {
            draft.section_id = Some(unquote(&id).to_string());
        }
        let task = self.api.create_task(&draft).await?;
        debug!(id = %task.id, "task created");
        Ok(task.id)
    }

    /// Apply a sparse update to one task.
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<()> {
        self.api.update_task(unquote(id), patch).await
    }

    /// Mark a task done.
    pub async fn complete_task(&self, id: &str) -> Result<()> {
        self.api.close_task(unquote(id)).await
    }

    /// Delete a task permanently.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.api.delete_task(unquote(id)).await
    }

    /// Everything completed in the last `days` days. The window starts at
    /// `today − days` at a fixed 01:00 offset.
    pub async fn completed_since(&self, days: i64) -> Result<Vec<CompletedTask>> {
        let since = completed_window_start(Local::now().date_naive(), days)?;
        self.api.completed_since(&since).await
    }
}

/// Start of the completed-task window: `today − days` at 01:00.
fn completed_window_start(today: NaiveDate, days: i64) -> Result<String> {
    let days: u64 = days
        .try_into()
        .map_err(|_| Error::Config(format!("days must be non-negative, got {days}")))?;
    let start = today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| Error::Config(format!("window of {days} days is out of range")))?;
    Ok(format!("{}T01:00", start.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_wrapping_quotes() {
        assert_eq!(unquote("\"8485234\""), "8485234");
        assert_eq!(unquote("8485234"), "8485234");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn completed_window_is_fixed_time_of_day() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            completed_window_start(today, 6).unwrap(),
            "2026-07-31T01:00"
        );
        assert_eq!(completed_window_start(today, 0).unwrap(), "2026-08-06T01:00");
    }

    #[test]
    fn completed_window_rejects_negative_days() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert!(completed_window_start(today, -1).is_err());
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            priority: Some(3),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = TaskPatch {
            priority: Some(3),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "priority": 3 }));
    }

    #[test]
    fn new_task_serializes_only_present_fields() {
        let draft = NewTask {
            content: "Buy groceries".to_string(),
            due_date: Some("2026-08-10".to_string()),
            ..NewTask::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "content": "Buy groceries", "due_date": "2026-08-10" })
        );
    }

    #[test]
    fn due_parses_plain_date_only() {
        let due = Due {
            date: "2026-08-06".to_string(),
        };
        assert_eq!(due.as_date(), NaiveDate::from_ymd_opt(2026, 8, 6));
        let bad = Due {
            date: "tomorrow".to_string(),
        };
        assert!(bad.as_date().is_none());
    }
}
