//! The real to-do backend: REST API for projects/tasks/mutations, sync API
//! for the completed-task report. Both share one bearer token but live on
//! different base URLs.

use async_trait::async_trait;
use serde::Deserialize;

use super::{CompletedTask, NewTask, Project, Task, TaskPatch, TodoApi};
use crate::client::ApiClient;
use crate::config::TodoSettings;
use crate::error::{Error, Result};

pub struct RestTodoApi {
    rest: ApiClient,
    sync: ApiClient,
}

impl RestTodoApi {
    pub fn new(settings: &TodoSettings) -> Result<Self> {
        Ok(Self {
            rest: ApiClient::new(&settings.rest_url, &settings.token, false)?,
            sync: ApiClient::new(&settings.sync_url, &settings.token, false)?,
        })
    }
}

/// Envelope of `GET completed/get_all`.
#[derive(Debug, Deserialize)]
struct CompletedEnvelope {
    #[serde(default)]
    items: Vec<CompletedTask>,
}

#[async_trait]
impl TodoApi for RestTodoApi {
    async fn projects(&self) -> Result<Vec<Project>> {
        self.rest.get("projects").await
    }

    async fn tasks(&self) -> Result<Vec<Task>> {
        self.rest.get("tasks").await
    }

    async fn create_task(&self, draft: &NewTask) -> Result<Task> {
        self.rest
            .post_json("tasks", draft)
            .await
            .map_err(Error::into_mutation)
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<()> {
        self.rest
            .post_json_unit(&format!("tasks/{id}"), patch)
            .await
            .map_err(Error::into_mutation)
    }

    async fn close_task(&self, id: &str) -> Result<()> {
        self.rest
            .post_unit(&format!("tasks/{id}/close"))
            .await
            .map_err(Error::into_mutation)
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        self.rest
            .delete(&format!("tasks/{id}"))
            .await
            .map_err(Error::into_mutation)
    }

    async fn completed_since(&self, since: &str) -> Result<Vec<CompletedTask>> {
        let envelope: CompletedEnvelope = self
            .sync
            .get(&format!("completed/get_all?since={since}"))
            .await?;
        Ok(envelope.items)
    }
}
