//! issue-agent - HTTP server entry point.
//!
//! Starts the runtime HTTP server that exposes the agent invocation
//! endpoint.

use issue_agent::{api, config::Config};
use issue_agent::agent::{Agent, DEFAULT_SYSTEM_PROMPT};
use issue_agent::llm::BedrockGenerator;
use issue_agent::tools::{ConsentMode, GitHubIssueViewer, ToolRegistry};

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The runtime is headless: there is no operator terminal to answer a
    // tool confirmation prompt. Must happen before the consent mode is
    // resolved below.
    std::env::set_var("BYPASS_TOOL_CONSENT", "true");

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "issue_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model_id);

    // One process-wide agent; invocations share it read-only.
    let mut tools = ToolRegistry::new(ConsentMode::from_env());
    tools.register(Arc::new(GitHubIssueViewer::new(config.github_token.clone())?));

    let generator = BedrockGenerator::new(
        config.generator_base_url(),
        config.api_key.clone(),
        config.model_id.clone(),
    )?;

    let agent = Agent::new(
        Arc::new(generator),
        Arc::new(tools),
        DEFAULT_SYSTEM_PROMPT.to_string(),
        config.max_iterations,
    );

    // Start HTTP server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    api::serve(&config, agent).await?;

    Ok(())
}
