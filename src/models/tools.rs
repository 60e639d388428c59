//! Tool and message definitions for function calling in AI agents.
//!
//! This module provides the wire types shared with the chat completions
//! endpoint and the registries agents use to look up and execute tools.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolError;

// -----------------------------
// Tool definitions
// -----------------------------

/// Represents a tool/function that can be called by an AI agent.
///
/// # Example
/// ```rust
/// use squirrelgraph::models::tools::Tool;
///
/// let tool = Tool::function("get_name", "Get a name for a squirrel")
///     .with_param("characteristic", "string", "A characteristic of the squirrel", true);
/// assert_eq!(tool.function.parameters.required, vec!["characteristic".to_string()]);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tool {
    /// The type of tool (typically "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function definition
    pub function: Function,
}

impl Tool {
    /// Start a function tool with no parameters.
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: Function {
                name: name.into(),
                description: description.into(),
                parameters: Parameters {
                    param_type: "object".to_string(),
                    properties: HashMap::new(),
                    required: Vec::new(),
                },
            },
        }
    }

    /// Add a scalar parameter to the function schema.
    pub fn with_param(
        mut self,
        name: impl Into<String>,
        prop_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.function.parameters.properties.insert(
            name.clone(),
            Property {
                prop_type: prop_type.into(),
                description: Some(description.into()),
                items: None,
            },
        );
        if required {
            self.function.parameters.required.push(name);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Defines a function that can be called by an AI agent.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Function {
    pub name: String,
    pub description: String,
    pub parameters: Parameters,
}

/// Defines the parameters for a function.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Parameters {
    /// The type of parameters (typically "object")
    #[serde(rename = "type")]
    pub param_type: String,
    pub properties: HashMap<String, Property>,
    pub required: Vec<String>,
}

/// Defines a single parameter property.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property {
    /// The type of the property (e.g., "string", "number", "array")
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// For array types, defines the items in the array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
}

/// Represents a tool call request from an AI model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Details of a function call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// The arguments as a JSON string
    pub arguments: String,
}

/// A role-tagged message in a conversation.
///
/// # Example
/// ```rust
/// use squirrelgraph::models::tools::Message;
///
/// let message = Message::user("Hello, squirrel!");
/// assert_eq!(message.role, "user");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    /// The role of the message sender ("system", "user", "assistant", "tool")
    pub role: String,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Set on "tool" messages to answer a specific call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text("assistant", content)
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::text("tool", content)
        }
    }

    /// True when the message asks for at least one tool invocation.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LLMResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Choice {
    pub message: Message,
    pub finish_reason: Option<String>,
}

// -----------------------------
// Tool Registry Trait
// -----------------------------
/// Trait for implementing tool registries.
///
/// A tool registry manages available tools and their execution.
pub trait ToolRegistryTrait: Send + Sync {
    /// Get all available tools in this registry.
    fn get_tools(&self) -> Vec<Tool>;

    /// Whether a tool with this name is registered.
    fn has_tool(&self, name: &str) -> bool;

    /// Execute a tool by name with JSON-encoded arguments.
    fn execute_tool(&self, name: &str, arguments: &str) -> Result<Value, ToolError>;
}

// -----------------------------
// Tool Registry Implementation
// -----------------------------
/// Type alias for tool functions.
pub type ToolFunction = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// A registry for managing tools and their implementations.
///
/// # Example
/// ```rust
/// use squirrelgraph::models::tools::{Tool, ToolRegistry, ToolRegistryTrait};
///
/// let mut registry = ToolRegistry::new();
/// registry.register_tool(Tool::function("ping", "Reply with pong"), |_| {
///     Ok(serde_json::json!("pong"))
/// });
/// assert_eq!(registry.execute_tool("ping", "{}").unwrap(), "pong");
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
    functions: HashMap<String, Box<ToolFunction>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with its implementation. A tool with the same name is replaced.
    pub fn register_tool<F>(&mut self, tool: Tool, function: F)
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        let name = tool.function.name.clone();
        self.tools.insert(name.clone(), tool);
        self.functions.insert(name, Box::new(function));
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistryTrait for ToolRegistry {
    fn get_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.tools.values().cloned().collect();
        tools.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        tools
    }

    fn has_tool(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn execute_tool(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ToolError::ToolNotFound(name.to_string()))?;
        let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
        let args: Value = serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments {
            name: name.to_string(),
            error: e.to_string(),
        })?;
        function(args).map_err(|error| ToolError::ToolExecutionFailed {
            name: name.to_string(),
            error,
        })
    }
}

// -----------------------------
// Combined Tool Registry
// -----------------------------
/// A registry that combines two tool registries.
///
/// The primary registry takes precedence over the secondary registry
/// when tools have the same name.
pub struct CombinedToolRegistry<'a> {
    primary: &'a dyn ToolRegistryTrait,
    secondary: &'a dyn ToolRegistryTrait,
}

impl<'a> CombinedToolRegistry<'a> {
    pub fn new(primary: &'a dyn ToolRegistryTrait, secondary: &'a dyn ToolRegistryTrait) -> Self {
        Self { primary, secondary }
    }
}

impl ToolRegistryTrait for CombinedToolRegistry<'_> {
    fn get_tools(&self) -> Vec<Tool> {
        let mut tools = self.secondary.get_tools();
        let primary_tools = self.primary.get_tools();

        tools.retain(|tool| !primary_tools.iter().any(|t| t.function.name == tool.function.name));
        tools.extend(primary_tools);
        tools
    }

    fn has_tool(&self, name: &str) -> bool {
        self.primary.has_tool(name) || self.secondary.has_tool(name)
    }

    fn execute_tool(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        if self.primary.has_tool(name) {
            return self.primary.execute_tool(name, arguments);
        }
        self.secondary.execute_tool(name, arguments)
    }
}
