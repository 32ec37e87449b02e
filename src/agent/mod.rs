//! Agent module - the core agent logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the caller's messages
//! 2. Call the model with available tools
//! 3. If the model requests tool calls, execute them and feed results back
//! 4. Repeat until the model produces a final response or max iterations

mod agent_loop;
mod prompt;

pub use agent_loop::Agent;
pub use prompt::DEFAULT_SYSTEM_PROMPT;
