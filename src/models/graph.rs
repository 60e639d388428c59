//! Graph-based multi-agent system for AI workflows
//!
//! This module provides the agent trait and the graph that passes work from
//! one agent to the next. The crews (`strategist`, `mission`) and the tool-less
//! advisor run on it.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::{GraphError, LLMGraphResult, NodeError};
use crate::models::tools::{CombinedToolRegistry, Tool, ToolRegistry, ToolRegistryTrait};

/// Default bound on the number of agent invocations in one [`Graph::run`].
pub const DEFAULT_MAX_STEPS: usize = 16;

/// One completed agent invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub node: i32,
    pub agent: String,
    pub output: String,
}

/// What an agent receives when it is run: the input passed to it by the
/// previous agent (or the caller) and every turn completed so far.
#[derive(Debug, Clone, Copy)]
pub struct Handoff<'a> {
    pub input: &'a str,
    pub history: &'a [Turn],
}

impl<'a> Handoff<'a> {
    pub fn new(input: &'a str, history: &'a [Turn]) -> Self {
        Self { input, history }
    }

    /// Output of the most recent turn produced by `node`, if it has run.
    pub fn output_of(&self, node: i32) -> Option<&'a Turn> {
        self.history.iter().rev().find(|turn| turn.node == node)
    }
}

/// Result of one agent invocation: its output and the node to hand off to.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutput {
    pub output: String,
    /// `None` ends the run.
    pub next: Option<i32>,
}

impl AgentOutput {
    pub fn finish(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            next: None,
        }
    }

    pub fn handoff(output: impl Into<String>, next: i32) -> Self {
        Self {
            output: output.into(),
            next: Some(next),
        }
    }
}

/// Trait for implementing agents that can process inputs and communicate within the graph.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use squirrelgraph::models::graph::{Agent, AgentOutput, Handoff};
/// use squirrelgraph::models::tools::ToolRegistryTrait;
/// use squirrelgraph::LLMGraphResult;
///
/// pub struct MyAgent;
///
/// #[async_trait]
/// impl Agent for MyAgent {
///     async fn run(
///         &mut self,
///         handoff: Handoff<'_>,
///         _tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
///     ) -> LLMGraphResult<AgentOutput> {
///         Ok(AgentOutput::finish(format!("Processed: {}", handoff.input)))
///     }
///
///     fn get_name(&self) -> &str {
///         "MyAgent"
///     }
/// }
/// ```
#[async_trait]
pub trait Agent: Send {
    /// Process the handoff and optionally route to the next agent.
    ///
    /// `tool_registry` holds the node's own tools layered over the graph's
    /// global tools.
    async fn run(
        &mut self,
        handoff: Handoff<'_>,
        tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
    ) -> LLMGraphResult<AgentOutput>;

    /// Get the name of this agent for identification purposes.
    fn get_name(&self) -> &str;
}

/// The turns produced by one graph run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphRun {
    pub turns: Vec<Turn>,
}

impl GraphRun {
    /// Output of the last agent that ran.
    pub fn final_output(&self) -> Option<&str> {
        self.turns.last().map(|turn| turn.output.as_str())
    }

    /// Every output, one per line block, prefixed with the agent name.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("[{}] {}", turn.agent, turn.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A directed graph of agents that pass work to each other.
///
/// The graph supports:
/// - Agent registration under integer ids
/// - Tool registration (both global and node-specific)
/// - Sequential handoff along declared edges, bounded by a step limit
///
/// # Example
/// ```rust,no_run
/// use squirrelgraph::{Agent, Graph, LLMGraphResult, ToolRegistryTrait};
/// use squirrelgraph::models::graph::{AgentOutput, Handoff};
/// use async_trait::async_trait;
///
/// struct SimpleAgent(Option<i32>);
///
/// #[async_trait]
/// impl Agent for SimpleAgent {
///     async fn run(
///         &mut self,
///         h: Handoff<'_>,
///         _: &(dyn ToolRegistryTrait + Send + Sync),
///     ) -> LLMGraphResult<AgentOutput> {
///         Ok(AgentOutput { output: format!("Processed: {}", h.input), next: self.0 })
///     }
///     fn get_name(&self) -> &str { "Simple" }
/// }
///
/// #[tokio::main]
/// async fn main() -> LLMGraphResult<()> {
///     let mut graph = Graph::new();
///     graph.add_node(0, Box::new(SimpleAgent(Some(1))))?;
///     graph.add_node(1, Box::new(SimpleAgent(None)))?;
///     graph.add_edge(0, 1)?;
///
///     let run = graph.run(0, "Hello").await?;
///     println!("Result: {:?}", run.final_output());
///     Ok(())
/// }
/// ```
pub struct Graph {
    nodes: HashMap<i32, Node>,
    tool_registry: ToolRegistry,
    max_steps: usize,
}

struct Node {
    agent: Box<dyn Agent>,
    neighbors: Vec<i32>,
    tool_registry: ToolRegistry,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            tool_registry: ToolRegistry::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Bound the number of agent invocations per run.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Register a tool globally (available to all agents).
    pub fn register_tool<F>(&mut self, tool: Tool, function: F)
    where
        F: Fn(serde_json::Value) -> Result<serde_json::Value, String> + Send + Sync + 'static,
    {
        self.tool_registry.register_tool(tool, function);
    }

    /// Register a tool for a specific node only. Node tools shadow global
    /// tools of the same name.
    pub fn register_tool_for_node<F>(
        &mut self,
        node_id: i32,
        tool: Tool,
        function: F,
    ) -> LLMGraphResult<()>
    where
        F: Fn(serde_json::Value) -> Result<serde_json::Value, String> + Send + Sync + 'static,
    {
        let node = self.nodes.get_mut(&node_id).ok_or(NodeError::NodeNotFound(node_id))?;
        node.tool_registry.register_tool(tool, function);
        Ok(())
    }

    /// Move every tool of `registry` onto a node.
    pub fn set_node_tools(&mut self, node_id: i32, registry: ToolRegistry) -> LLMGraphResult<()> {
        let node = self.nodes.get_mut(&node_id).ok_or(NodeError::NodeNotFound(node_id))?;
        node.tool_registry = registry;
        Ok(())
    }

    pub fn get_node_tool_registry(&self, node_id: i32) -> Option<&ToolRegistry> {
        self.nodes.get(&node_id).map(|node| &node.tool_registry)
    }

    pub fn get_shared_tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Add a new agent node to the graph.
    pub fn add_node(&mut self, id: i32, agent: Box<dyn Agent>) -> LLMGraphResult<()> {
        if self.nodes.contains_key(&id) {
            return Err(NodeError::NodeAlreadyExists(id).into());
        }
        self.nodes.insert(
            id,
            Node {
                agent,
                neighbors: Vec::new(),
                tool_registry: ToolRegistry::new(),
            },
        );
        Ok(())
    }

    /// Declare that the agent at `from` may hand off to the agent at `to`.
    pub fn add_edge(&mut self, from: i32, to: i32) -> LLMGraphResult<()> {
        if !self.nodes.contains_key(&to) {
            return Err(NodeError::NodeNotFound(to).into());
        }
        let node = self.nodes.get_mut(&from).ok_or(NodeError::NodeNotFound(from))?;
        if !node.neighbors.contains(&to) {
            node.neighbors.push(to);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Execute the graph starting from a specific node.
    ///
    /// Each agent receives the previous agent's output as its input along with
    /// the full history. The run ends when an agent returns no next node; a
    /// handoff along an undeclared edge or past the step limit is an error.
    pub async fn run(&mut self, start_id: i32, input: &str) -> LLMGraphResult<GraphRun> {
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph.into());
        }

        let mut current_id = start_id;
        let mut current_input = input.to_string();
        let mut run = GraphRun::default();

        loop {
            if run.turns.len() >= self.max_steps {
                return Err(GraphError::MaxStepsExceeded(self.max_steps).into());
            }

            let node = self
                .nodes
                .get_mut(&current_id)
                .ok_or(NodeError::NodeNotFound(current_id))?;
            let combined_registry =
                CombinedToolRegistry::new(&node.tool_registry, &self.tool_registry);
            let agent_name = node.agent.get_name().to_string();

            debug!(node = current_id, agent = agent_name.as_str(), "Running agent");
            let handoff = Handoff::new(&current_input, &run.turns);
            let AgentOutput { output, next } = node.agent.run(handoff, &combined_registry).await?;

            if let Some(next) = next {
                if !node.neighbors.contains(&next) {
                    return Err(GraphError::InvalidEdge { from: current_id, to: next }.into());
                }
            }

            info!(node = current_id, agent = agent_name.as_str(), next = ?next, "Agent finished");
            run.turns.push(Turn {
                node: current_id,
                agent: agent_name,
                output: output.clone(),
            });

            match next {
                Some(next) => {
                    current_id = next;
                    current_input = output;
                }
                None => break,
            }
        }

        Ok(run)
    }
}

impl fmt::Display for Graph {
    /// Adjacency list, one node per line in id order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&i32> = self.nodes.keys().collect();
        ids.sort();
        for id in ids {
            let node = &self.nodes[id];
            write!(f, "{} (Agent: {}) ->", id, node.agent.get_name())?;
            for neighbor in &node.neighbors {
                write!(f, " {}", neighbor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
