//! Configuration management for issue-agent.
//!
//! Configuration can be set via environment variables:
//! - `AWS_BEARER_TOKEN_BEDROCK` - Required. API key for the Bedrock runtime.
//! - `BEDROCK_MODEL_ID` - Optional. Model identifier. Defaults to
//!   `us.anthropic.claude-3-7-sonnet-20250219-v1:0`.
//! - `AWS_REGION` - Optional. Bedrock region. Defaults to `us-east-1`.
//! - `BEDROCK_BASE_URL` - Optional. Overrides the region-derived endpoint.
//! - `GITHUB_TOKEN` - Optional. Token for the GitHub issue viewer tool.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `8080`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.
//! - `BYPASS_TOOL_CONSENT` - Optional. Skips the interactive tool consent
//!   prompt when truthy. The server binary sets it unconditionally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bedrock runtime API key
    pub api_key: String,

    /// Model identifier (Bedrock inference profile format)
    pub model_id: String,

    /// Bedrock region used to derive the endpoint
    pub region: String,

    /// Full endpoint override; takes precedence over the region
    pub base_url: Option<String>,

    /// Token for GitHub API requests (higher rate limits, private repos)
    pub github_token: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `AWS_BEARER_TOKEN_BEDROCK`
    /// is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("AWS_BEARER_TOKEN_BEDROCK")
            .map_err(|_| ConfigError::MissingEnvVar("AWS_BEARER_TOKEN_BEDROCK".to_string()))?;

        let model_id = std::env::var("BEDROCK_MODEL_ID")
            .unwrap_or_else(|_| "us.anthropic.claude-3-7-sonnet-20250219-v1:0".to_string());

        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let base_url = std::env::var("BEDROCK_BASE_URL").ok();

        let github_token = std::env::var("GITHUB_TOKEN").ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            api_key,
            model_id,
            region,
            base_url,
            github_token,
            host,
            port,
            max_iterations,
        })
    }

    /// The chat-completions base URL for the generator.
    ///
    /// `BEDROCK_BASE_URL` wins when set; otherwise the Bedrock runtime's
    /// OpenAI-compatible endpoint is derived from the region.
    pub fn generator_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com/openai/v1", self.region),
        }
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model_id: String) -> Self {
        Self {
            api_key,
            model_id,
            region: "us-east-1".to_string(),
            base_url: None,
            github_token: None,
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_iterations: 10,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for v in ["1", "true", "True", "YES", "on", " y "] {
            assert_eq!(parse_bool(v), Ok(true), "value: {:?}", v);
        }
        for v in ["0", "false", "no", "OFF", "n"] {
            assert_eq!(parse_bool(v), Ok(false), "value: {:?}", v);
        }
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn generator_base_url_derives_from_region() {
        let mut config = Config::new("key".to_string(), "model".to_string());
        config.region = "eu-west-1".to_string();
        assert_eq!(
            config.generator_base_url(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com/openai/v1"
        );
    }

    #[test]
    fn generator_base_url_prefers_override() {
        let mut config = Config::new("key".to_string(), "model".to_string());
        config.base_url = Some("http://localhost:9000/v1/".to_string());
        assert_eq!(config.generator_base_url(), "http://localhost:9000/v1");
    }
}
