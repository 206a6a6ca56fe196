mod agent_service;
mod system_prompt;
mod tools;

pub use agent_service::{AgentAnswer, AgentConfig, AgentError, AgentService};
pub use system_prompt::{build_system_prompt, feedback_instructions};
pub use tools::{RetrievalTools, SEARCH_ACROSS_USER_COLLECTIONS, SEARCH_IN_COLLECTION, ToolError};
