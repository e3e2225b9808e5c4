//! Automation-platform backend: an AWX-style controller API speaking
//! bearer-token JSON. Controllers are private deployments, frequently
//! behind self-signed certificates — TLS relaxation is the operator's
//! explicit opt-in, wired through [`JobsSettings`].

use async_trait::async_trait;

use super::{JobApi, JobHandle, JobRecord};
use crate::client::ApiClient;
use crate::config::JobsSettings;
use crate::error::Result;

pub struct AapJobApi {
    client: ApiClient,
}

impl AapJobApi {
    pub fn new(settings: &JobsSettings) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(&settings.base_url, &settings.token, settings.insecure_tls)?,
        })
    }
}

#[async_trait]
impl JobApi for AapJobApi {
    async fn launch(&self, template_id: u64) -> Result<JobHandle> {
        // The launch endpoint takes no body here; template variables are
        // baked into the template itself.
        self.client
            .post(&format!("job_templates/{template_id}/launch/"))
            .await
    }

    async fn fetch(&self, job_id: u64) -> Result<JobRecord> {
        self.client.get(&format!("jobs/{job_id}/")).await
    }
}
