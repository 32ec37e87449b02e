//! System prompt for the issue agent.

/// Handed to the agent at construction; callers may substitute their own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You're a helpful agent. When asked about GitHub issues, use the github issue viewer tool to find the information and then summarize the findings based on the link provided.";
