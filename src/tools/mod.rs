//! The tool surface an agent layer calls into.
//!
//! Tools take string key-value arguments and hand back either a
//! string-renderable success payload or a string-rendered error — the
//! boundary contract with the (external) agent layer. Typed errors stop
//! here: the registry flattens any `Err` into [`Outcome::Error`].

pub mod acl;
pub mod todo;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments as the caller formats them: everything is a string, parsing
/// is the tool's job.
pub type ToolArgs = HashMap<String, String>;

/// Outcome of a single tool execution. Errors are information for the
/// caller, not failures of this process.
#[derive(Debug, Clone, serde::Serialize)]
pub enum Outcome {
    Success(String),
    Error(String),
}

/// Result of executing a tool call.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResult {
    pub tool: String,
    pub outcome: Outcome,
}

/// One callable operation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn execute(&self, args: &ToolArgs) -> Result<String>;
}

/// Holds the registered tools. The set is fixed at startup, so this is a
/// plain map behind shared references, no interior locking.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Execute a tool by name, rendering any error to a string outcome.
    pub async fn execute(&self, tool_name: &str, args: &ToolArgs) -> ToolResult {
        match self.tools.get(tool_name) {
            Some(tool) => match tool.execute(args).await {
                Ok(output) => ToolResult {
                    tool: tool_name.to_string(),
                    outcome: Outcome::Success(output),
                },
                Err(e) => ToolResult {
                    tool: tool_name.to_string(),
                    outcome: Outcome::Error(e.to_string()),
                },
            },
            None => ToolResult {
                tool: tool_name.to_string(),
                outcome: Outcome::Error(format!("unknown tool: {tool_name}")),
            },
        }
    }

    /// Name + description of every tool, sorted for stable listings.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        let mut all: Vec<_> = self
            .tools
            .values()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect();
        all.sort();
        all
    }
}
