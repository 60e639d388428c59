//! Error handling module for squirrelgraph.
//!
//! Every layer (model calls, tools, agents, the graph, the hazard workflow and
//! configuration) has its own error enum; all of them convert into
//! [`LLMGraphError`].

use thiserror::Error;

/// Main error type for the squirrelgraph library
#[derive(Debug, Error)]
pub enum LLMGraphError {
    /// Node-related errors
    #[error("Node error: {0}")]
    NodeError(#[from] NodeError),
    /// Tool execution errors
    #[error("Tool error: {0}")]
    ToolError(#[from] ToolError),
    /// API/Network errors
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
    /// Agent execution errors
    #[error("Agent error: {0}")]
    AgentError(#[from] AgentError),
    /// Graph structure errors
    #[error("Graph error: {0}")]
    GraphError(#[from] GraphError),
    /// Validator verdict errors
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
    /// Configuration errors
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Errors related to node operations
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Node {0} not found")]
    NodeNotFound(i32),
    #[error("Node {0} already exists")]
    NodeAlreadyExists(i32),
}

/// Errors related to tool operations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),
    #[error("Tool '{name}' execution failed: {error}")]
    ToolExecutionFailed { name: String, error: String },
    #[error("Invalid arguments for tool '{name}': {error}")]
    InvalidArguments { name: String, error: String },
}

/// Errors related to calls against the language model endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("API rate limit exceeded")]
    RateLimitExceeded,
    #[error("API authentication failed")]
    AuthenticationFailed,
    #[error("API request timed out")]
    Timeout,
    #[error("Model '{0}' does not support tool calling")]
    ToolsUnsupported(String),
}

/// Errors related to agent execution
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent '{0}' exceeded its tool-calling iterations")]
    MaxIterationsExceeded(String),
}

/// Errors related to graph structure and traversal
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid edge from {from} to {to}")]
    InvalidEdge { from: i32, to: i32 },
    #[error("Graph is empty")]
    EmptyGraph,
    #[error("Graph run exceeded {0} steps")]
    MaxStepsExceeded(usize),
}

/// Errors raised while interpreting a validator verdict
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Malformed verdict, expected 'VALID:' and 'FEEDBACK:' lines: {0}")]
    MalformedVerdict(String),
    #[error("Validator ran before a solution was generated")]
    MissingSolution,
}

/// Errors related to loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Result type alias for squirrelgraph operations
pub type LLMGraphResult<T> = Result<T, LLMGraphError>;

impl From<serde_json::Error> for LLMGraphError {
    fn from(error: serde_json::Error) -> Self {
        LLMGraphError::SerializationError(error.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return ApiError::Timeout;
        }
        match error.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => ApiError::AuthenticationFailed,
            Some(429) => ApiError::RateLimitExceeded,
            _ if error.is_decode() => ApiError::InvalidResponse(error.to_string()),
            _ => ApiError::RequestFailed(error.to_string()),
        }
    }
}
