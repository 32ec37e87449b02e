//! Chat wire types and the generator abstraction.
//!
//! Message shapes follow the OpenAI chat-completions format, which the
//! Bedrock runtime also speaks. The [`ChatGenerator`] trait is the seam
//! between the agent loop and the model backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod bedrock;

pub use bedrock::BedrockGenerator;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the assistant, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// For `Role::Tool` messages: the id of the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// The text content, if the message carries any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type", default = "function_call_type")]
    pub call_type: String,

    pub function: FunctionCall,
}

fn function_call_type() -> String {
    "function".to_string()
}

/// The function half of a tool call. `arguments` is a JSON-encoded string,
/// as on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Produces one model reply for a conversation.
///
/// Implementations are shared behind `Arc<dyn ChatGenerator>` so the agent
/// can be exercised with a scripted generator in tests.
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    /// Request a single chat completion. `tools` carries the JSON schemas
    /// of the tools the model may call.
    async fn chat(&self, messages: &[ChatMessage], tools: Option<&[Value]>)
        -> anyhow::Result<ChatMessage>;
}
