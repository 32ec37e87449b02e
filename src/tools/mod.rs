//! Tool trait, registry, and the consent gate.
//!
//! Tools are capabilities the model may invoke during the agent loop.
//! Execution passes through a consent gate: unless bypassed via the
//! `BYPASS_TOOL_CONSENT` environment variable, every call must be
//! confirmed interactively before it runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

mod github;

pub use github::GitHubIssueViewer;

/// A capability exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, as referenced in model tool calls.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    /// Run the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Whether tool execution requires interactive confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentMode {
    /// Ask for y/N confirmation on stdin before each tool call.
    Prompt,
    /// Execute tool calls without asking.
    Bypass,
}

impl ConsentMode {
    /// Resolve the mode from the `BYPASS_TOOL_CONSENT` environment variable.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("BYPASS_TOOL_CONSENT").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if crate::config::parse_bool(v) == Ok(true) => ConsentMode::Bypass,
            _ => ConsentMode::Prompt,
        }
    }
}

/// Registry of available tools, dispatched by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    consent: ConsentMode,
}

impl ToolRegistry {
    pub fn new(consent: ConsentMode) -> Self {
        Self {
            tools: HashMap::new(),
            consent,
        }
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool schemas in the chat-completions `tools` format.
    pub fn tool_schemas(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Execute a tool by name, passing the gate first.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        if self.consent == ConsentMode::Prompt && !request_consent(name, &args).await? {
            return Err(anyhow::anyhow!("Tool call denied by user: {}", name));
        }

        tool.execute(args).await
    }
}

/// Ask on stdin whether the tool call may run.
async fn request_consent(name: &str, args: &Value) -> anyhow::Result<bool> {
    eprintln!("Allow tool '{}' to run with args {}? [y/N] ", name, args);

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
