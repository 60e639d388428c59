//! squirrelgraph - LLM decision workflows for a squirrel guarding its acorns
//!
//! The core is a hazard analysis loop (generate, validate, route, report)
//! driven as an explicit state machine over a substitutable language model.
//! Around it sit a small agent graph with tool calling, used by the
//! strategist and mission crews, and a tool-less advisor.

pub mod agents;
pub mod config;
pub mod errors;
pub mod generate;
pub mod missions;
pub mod models;
pub mod prompts;
pub mod toolbox;
pub mod workflow;

// Re-export commonly used types for convenience
pub use errors::{LLMGraphError, LLMGraphResult};
pub use generate::{ChatClient, LanguageModel};
pub use models::graph::{Agent, Graph};
pub use models::record::HazardRecord;
pub use models::tools::{Message, Tool, ToolRegistry, ToolRegistryTrait};
pub use workflow::HazardWorkflow;

#[cfg(test)]
mod tests;
