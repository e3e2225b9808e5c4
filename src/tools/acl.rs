//! The ACL audit tool: one remote job, one artifact.

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{Tool, ToolArgs};
use crate::consts;
use crate::orchestrator::{JobApi, Orchestrator};

/// Audits a network device's access-control list by running the
/// ACL-gathering job template and returning its `acl_data` artifact.
pub struct AclAuditTool<A: JobApi> {
    orchestrator: Orchestrator<A>,
    template_id: u64,
}

impl<A: JobApi> AclAuditTool<A> {
    pub fn new(orchestrator: Orchestrator<A>, template_id: u64) -> Self {
        Self {
            orchestrator,
            template_id,
        }
    }
}

#[async_trait]
impl<A: JobApi> Tool for AclAuditTool<A> {
    fn name(&self) -> &str {
        "acl_audit"
    }

    fn description(&self) -> &str {
        "Verify the functionality of an ACL; returns the ACL object as JSON. \
         Args (optional): {\"template_id\": \"<numeric job template id>\"} to \
         override the configured ACL-gathering template."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let template_id = match args.get("template_id") {
            Some(raw) => match raw.trim_matches('"').parse() {
                Ok(id) => id,
                Err(_) => bail!("template_id must be numeric, got '{raw}'"),
            },
            None => self.template_id,
        };

        let acl = self
            .orchestrator
            .run_to_artifact(template_id, consts::ACL_ARTIFACT_KEY)
            .await?;
        Ok(acl.to_string())
    }
}
