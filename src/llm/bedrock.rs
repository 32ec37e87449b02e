//! Chat generator backed by the Amazon Bedrock runtime.
//!
//! Talks to the runtime's OpenAI-compatible chat-completions endpoint with
//! a bearer API key, so the same client also works against any other
//! OpenAI-compatible server (useful for local development).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ChatGenerator, ChatMessage};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Bedrock chat generator with a fixed model id.
pub struct BedrockGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Value]>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl BedrockGenerator {
    /// Create a generator for `model` against `base_url`.
    pub fn new(base_url: String, api_key: String, model: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("issue-agent/0.1")
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ChatGenerator for BedrockGenerator {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> anyhow::Result<ChatMessage> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "chat completion failed: {} - {}",
                status,
                body
            ));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("malformed chat completion response: {} - {}", e, body))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| anyhow::anyhow!("chat completion returned no choices"))
    }
}
