//! Core agent loop implementation.

use std::sync::Arc;

use crate::llm::{ChatGenerator, ChatMessage, ToolCall};
use crate::tools::ToolRegistry;

/// The tool-calling agent.
///
/// Constructed once at process start and shared read-only across
/// invocations; `run` holds no state between calls.
pub struct Agent {
    generator: Arc<dyn ChatGenerator>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    max_iterations: usize,
}

impl Agent {
    pub fn new(
        generator: Arc<dyn ChatGenerator>,
        tools: Arc<ToolRegistry>,
        system_prompt: String,
        max_iterations: usize,
    ) -> Self {
        Self {
            generator,
            tools,
            system_prompt,
            max_iterations,
        }
    }

    /// Run the loop over the caller's messages and return the full
    /// conversation, system message at the head and the model's final
    /// reply last.
    pub async fn run(&self, messages: Vec<ChatMessage>) -> anyhow::Result<Vec<ChatMessage>> {
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(&self.system_prompt));
        conversation.extend(messages);

        let tool_schemas = self.tools.tool_schemas();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let reply = self
                .generator
                .chat(&conversation, Some(&tool_schemas))
                .await?;

            // Check for tool calls
            if let Some(tool_calls) = reply.tool_calls.clone() {
                if !tool_calls.is_empty() {
                    conversation.push(reply);

                    for tool_call in &tool_calls {
                        tracing::info!(
                            "Calling tool: {} with args: {}",
                            tool_call.function.name,
                            tool_call.function.arguments
                        );

                        let result = match self.execute_tool_call(tool_call).await {
                            Ok(output) => output,
                            Err(e) => format!("Error: {}", e),
                        };

                        conversation.push(ChatMessage::tool_result(&tool_call.id, result));
                    }

                    continue;
                }
            }

            // No tool calls - this is the final response
            if reply.content.is_some() {
                conversation.push(reply);
                return Ok(conversation);
            }

            return Err(anyhow::anyhow!("Model returned an empty reply"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without a final answer",
            self.max_iterations
        ))
    }

    /// Execute a single tool call through the registry.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FunctionCall, Role};
    use crate::tools::{ConsentMode, Tool};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Generator returning scripted replies and recording every request.
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<anyhow::Result<ChatMessage>>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<anyhow::Result<ChatMessage>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<ChatMessage>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatGenerator for ScriptedGenerator {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            _tools: Option<&[Value]>,
        ) -> anyhow::Result<ChatMessage> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("scripted generator exhausted")))
        }
    }

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(args["text"].as_str().unwrap_or_default().to_uppercase())
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new(ConsentMode::Bypass);
        registry.register(Arc::new(UpperTool));
        Arc::new(registry)
    }

    fn assistant(content: &str) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_call_reply(name: &str, arguments: &str) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }]),
            tool_call_id: None,
        }
    }

    fn agent(generator: Arc<ScriptedGenerator>) -> Agent {
        Agent::new(generator, registry(), "be helpful".to_string(), 5)
    }

    #[tokio::test]
    async fn final_reply_ends_the_loop() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(assistant(
            "The issue is about X",
        ))]));
        let conversation = agent(generator.clone())
            .run(vec![ChatMessage::user("Summarize issue #42")])
            .await
            .unwrap();

        let last = conversation.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text(), Some("The issue is about X"));

        // One model call, seeded with exactly [system, user].
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[0][0].role, Role::System);
        assert_eq!(requests[0][1].role, Role::User);
        assert_eq!(requests[0][1].text(), Some("Summarize issue #42"));
    }

    #[tokio::test]
    async fn tool_call_result_is_fed_back() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(tool_call_reply("upper", r#"{"text":"done"}"#)),
            Ok(assistant("It says DONE")),
        ]));
        let conversation = agent(generator.clone())
            .run(vec![ChatMessage::user("shout it")])
            .await
            .unwrap();

        // system, user, assistant tool call, tool result, final assistant
        assert_eq!(conversation.len(), 5);
        assert_eq!(conversation[3].role, Role::Tool);
        assert_eq!(conversation[3].text(), Some("DONE"));
        assert_eq!(conversation[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(conversation[4].text(), Some("It says DONE"));

        // Second model call saw the tool result.
        let requests = generator.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1][3].role, Role::Tool);
    }

    #[tokio::test]
    async fn tool_failure_becomes_tool_result() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(tool_call_reply("no_such_tool", "{}")),
            Ok(assistant("I could not look that up")),
        ]));
        let conversation = agent(generator)
            .run(vec![ChatMessage::user("try it")])
            .await
            .unwrap();

        let tool_message = &conversation[3];
        assert_eq!(tool_message.role, Role::Tool);
        assert!(tool_message.text().unwrap().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn generator_error_propagates() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(anyhow::anyhow!(
            "model unavailable"
        ))]));
        let err = agent(generator)
            .run(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let empty = ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: None,
            tool_call_id: None,
        };
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(empty)]));
        let err = agent(generator)
            .run(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty reply"));
    }

    #[tokio::test]
    async fn iteration_cap_is_enforced() {
        let replies = (0..6)
            .map(|_| Ok(tool_call_reply("upper", r#"{"text":"loop"}"#)))
            .collect();
        let generator = Arc::new(ScriptedGenerator::new(replies));
        let err = agent(generator)
            .run(vec![ChatMessage::user("loop forever")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Max iterations"));
    }
}
