//! Task tools: thin adapters between string arguments and the query
//! engine. All parsing of the caller's string-typed arguments happens
//! here; the engine below works with typed records only.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{Tool, ToolArgs};
use crate::consts;
use crate::todo::{NewTask, TaskEngine, TaskFilter, TaskPatch, TodoApi};

fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_priority(raw: &str) -> Result<u8> {
    match raw.trim().parse() {
        Ok(p @ 1..=4) => Ok(p),
        _ => bail!("priority must be 1 (low) to 4 (urgent), got '{raw}'"),
    }
}

fn parse_limit(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("limit must be a non-negative integer, got '{raw}'"))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => bail!("expected a boolean, got '{raw}'"),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("dates must be YYYY-MM-DD, got '{raw}'"))
}

fn required<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing required arg: {key}"))
}

/// Lists all projects, the folders tasks live in.
pub struct ProjectsTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> ProjectsTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for ProjectsTool<A> {
    fn name(&self) -> &str {
        "get_projects"
    }

    fn description(&self) -> &str {
        "Get all todo projects. These are like folders for tasks. No args."
    }

    async fn execute(&self, _args: &ToolArgs) -> Result<String> {
        let projects = self.engine.projects().await?;
        Ok(serde_json::to_string(&projects)?)
    }
}

/// Fetches tasks, optionally filtered by any combination of criteria.
pub struct TasksTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> TasksTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for TasksTool<A> {
    fn name(&self) -> &str {
        "get_tasks"
    }

    fn description(&self) -> &str {
        "Fetch tasks, optionally filtered. With no args, all tasks are \
         returned. Args (all optional): {\"project_id\": \"<id>\", \
         \"project_name\": \"Work\", \"task_name\": \"<title substring>\", \
         \"due_date\": \"YYYY-MM-DD\", \"is_overdue\": \"true|false\", \
         \"labels\": \"comma,separated\", \"priority\": \"1-4 (4 = urgent)\", \
         \"limit\": \"<max results>\"}."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let filter = TaskFilter {
            project_id: args.get("project_id").cloned(),
            project_name: args.get("project_name").cloned(),
            content: args.get("task_name").cloned(),
            due_date: args.get("due_date").map(|d| parse_date(d)).transpose()?,
            overdue: args.get("is_overdue").map(|b| parse_bool(b)).transpose()?,
            labels: args.get("labels").map(|l| parse_labels(l)),
            priority: args.get("priority").map(|p| parse_priority(p)).transpose()?,
            limit: args.get("limit").map(|l| parse_limit(l)).transpose()?,
        };

        let tasks = self.engine.list_tasks(&filter).await?;
        Ok(serde_json::to_string(&tasks)?)
    }
}

/// Creates a task from a content line plus optional attributes.
pub struct CreateTaskTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> CreateTaskTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for CreateTaskTool<A> {
    fn name(&self) -> &str {
        "create_task"
    }

    fn description(&self) -> &str {
        "Create a new task. Args: {\"content\": \"<title, may contain \
         markdown>\"} plus optional {\"description\": \"...\", \
         \"project_id\": \"<id, default inbox>\", \"labels\": \
         \"comma,separated\", \"priority\": \"1-4\", \"due_date\": \
         \"YYYY-MM-DD\", \"section_id\": \"<id>\"}. Returns the new task id."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let draft = NewTask {
            content: required(args, "content")?.to_string(),
            description: args.get("description").cloned(),
            project_id: args.get("project_id").cloned(),
            labels: args.get("labels").map(|l| parse_labels(l)),
            priority: args.get("priority").map(|p| parse_priority(p)).transpose()?,
            due_date: args
                .get("due_date")
                .map(|d| parse_date(d).map(|date| date.to_string()))
                .transpose()?,
            section_id: args.get("section_id").cloned(),
        };

        let id = self.engine.create_task(&draft).await?;
        Ok(id)
    }
}

/// Updates any subset of a task's attributes.
pub struct UpdateTaskTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> UpdateTaskTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for UpdateTaskTool<A> {
    fn name(&self) -> &str {
        "update_task"
    }

    fn description(&self) -> &str {
        "Update attributes of a task by its ID. Only the supplied fields \
         change. Args: {\"task_id\": \"<id>\"} plus any of {\"content\", \
         \"description\", \"labels\": \"comma,separated\", \"priority\": \
         \"1-4\", \"due_date\": \"YYYY-MM-DD\", \"deadline_date\": \
         \"YYYY-MM-DD\"}."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let task_id = required(args, "task_id")?;
        let patch = TaskPatch {
            content: args.get("content").cloned(),
            description: args.get("description").cloned(),
            labels: args.get("labels").map(|l| parse_labels(l)),
            priority: args.get("priority").map(|p| parse_priority(p)).transpose()?,
            due_date: args
                .get("due_date")
                .map(|d| parse_date(d).map(|date| date.to_string()))
                .transpose()?,
            deadline_date: args
                .get("deadline_date")
                .map(|d| parse_date(d).map(|date| date.to_string()))
                .transpose()?,
        };
        if patch.is_empty() {
            bail!("nothing to update: supply at least one attribute");
        }

        self.engine.update_task(task_id, &patch).await?;
        Ok("Task updated successfully".to_string())
    }
}

/// Deletes a task permanently.
pub struct DeleteTaskTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> DeleteTaskTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for DeleteTaskTool<A> {
    fn name(&self) -> &str {
        "delete_task"
    }

    fn description(&self) -> &str {
        "Delete a task by its ID. Args: {\"task_id\": \"<id>\"}."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        self.engine.delete_task(required(args, "task_id")?).await?;
        Ok("Task deleted successfully".to_string())
    }
}

/// Marks a task done.
pub struct CompleteTaskTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> CompleteTaskTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for CompleteTaskTool<A> {
    fn name(&self) -> &str {
        "complete_task"
    }

    fn description(&self) -> &str {
        "Mark a task as done. Args: {\"task_id\": \"<id>\"}."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        self.engine.complete_task(required(args, "task_id")?).await?;
        Ok("Task closed successfully".to_string())
    }
}

/// Reports recently completed tasks.
pub struct CompletedTasksTool<A: TodoApi> {
    engine: Arc<TaskEngine<A>>,
}

impl<A: TodoApi> CompletedTasksTool<A> {
    pub fn new(engine: Arc<TaskEngine<A>>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<A: TodoApi + 'static> Tool for CompletedTasksTool<A> {
    fn name(&self) -> &str {
        "get_completed_tasks"
    }

    fn description(&self) -> &str {
        "Get completed tasks from the recent past. Args (optional): \
         {\"days\": \"<how many days back, default 6>\"}."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let days = match args.get("days") {
            Some(raw) => match raw.trim().parse() {
                Ok(days) if days >= 0 => days,
                _ => bail!("days must be a non-negative integer, got '{raw}'"),
            },
            None => consts::DEFAULT_COMPLETED_WINDOW_DAYS,
        };

        let completed = self.engine.completed_since(days).await?;
        Ok(serde_json::to_string(&completed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_split_on_commas_and_trim() {
        assert_eq!(parse_labels("work, urgent ,ops"), ["work", "urgent", "ops"]);
        assert_eq!(parse_labels("solo"), ["solo"]);
        assert!(parse_labels(" , ,").is_empty());
    }

    #[test]
    fn priority_range_is_enforced() {
        assert_eq!(parse_priority("4").unwrap(), 4);
        assert_eq!(parse_priority(" 1 ").unwrap(), 1);
        assert!(parse_priority("0").is_err());
        assert!(parse_priority("5").is_err());
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn bool_accepts_common_spellings() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn date_requires_iso_format() {
        assert!(parse_date("2026-08-06").is_ok());
        assert!(parse_date("08/06/2026").is_err());
        assert!(parse_date("tomorrow").is_err());
    }

    #[test]
    fn limit_rejects_negatives_and_junk() {
        assert_eq!(parse_limit("3").unwrap(), 3);
        assert!(parse_limit("-1").is_err());
        assert!(parse_limit("lots").is_err());
    }
}
