//! # issue-agent
//!
//! A minimal GitHub issue summarizer agent served behind an
//! AgentCore-style HTTP runtime.
//!
//! This library provides:
//! - An HTTP runtime exposing `POST /invocations` and `GET /ping`
//! - A tool-based agent loop for answering questions about GitHub issues
//! - A chat generator backed by the Amazon Bedrock runtime
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a prompt via the invocation endpoint
//! 2. Build context with system prompt and available tools
//! 3. Call the model, parse the reply, execute any tool calls
//! 4. Feed results back to the model, repeat until a final answer
//!
//! ## Example
//!
//! ```rust,ignore
//! use issue_agent::{config::Config, agent::Agent};
//!
//! let config = Config::from_env()?;
//! let agent = build_agent(&config)?;
//! let reply = agent.run(vec![ChatMessage::user("Summarize issue #42")]).await?;
//! ```

pub mod api;
pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
