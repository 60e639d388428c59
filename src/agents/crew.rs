//! Crew members: persona-driven agents that complete one task each and hand
//! the result to the next member.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::errors::{AgentError, LLMGraphResult};
use crate::generate::LanguageModel;
use crate::models::graph::{Agent, AgentOutput, Handoff};
use crate::models::tools::{Message, ToolRegistryTrait};
use crate::prompts;

/// Tool-calling rounds allowed before a member gives up.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// The work assigned to one crew member.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewTask {
    pub description: String,
    pub expected_output: String,
    /// Graph nodes whose outputs this task builds on.
    pub context: Vec<i32>,
}

impl CrewTask {
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, nodes: impl IntoIterator<Item = i32>) -> Self {
        self.context.extend(nodes);
        self
    }
}

/// A crew member with a role, goal and backstory.
///
/// When the graph gives the member tools, it runs a tool-calling loop: every
/// requested call is executed and fed back until the model answers in text.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use squirrelgraph::agents::crew::{CrewMember, CrewTask};
/// use squirrelgraph::config::ModelConfig;
/// use squirrelgraph::generate::ChatClient;
///
/// # fn demo() -> squirrelgraph::LLMGraphResult<()> {
/// let model = Arc::new(ChatClient::new(ModelConfig::from_env()?)?);
/// let pip = CrewMember::new("Pip Squeak", "Tactical Problem Solver", model)
///     .with_goal("Devise nature-based tactics")
///     .with_task(CrewTask::new("Cross the gravel quietly", "One tactic").with_context([0]))
///     .hand_off_to(2);
/// # Ok(())
/// # }
/// ```
pub struct CrewMember {
    name: String,
    role: String,
    goal: String,
    backstory: String,
    task: CrewTask,
    next: Option<i32>,
    model: Arc<dyn LanguageModel>,
    max_iterations: usize,
}

impl CrewMember {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            task: CrewTask::new("", ""),
            next: None,
            model,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    pub fn with_task(mut self, task: CrewTask) -> Self {
        self.task = task;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Pass the result to `node` instead of ending the run.
    pub fn hand_off_to(mut self, node: i32) -> Self {
        self.next = Some(node);
        self
    }

    fn build_messages(&self, handoff: &Handoff<'_>) -> Vec<Message> {
        let mut context: Vec<(&str, &str)> = self
            .task
            .context
            .iter()
            .filter_map(|node| handoff.output_of(*node))
            .map(|turn| (turn.agent.as_str(), turn.output.as_str()))
            .collect();
        if self.task.context.is_empty() && !handoff.input.trim().is_empty() {
            context.push(("Request", handoff.input));
        }

        vec![
            Message::system(prompts::crew_persona(&self.role, &self.goal, &self.backstory)),
            Message::user(prompts::crew_task(
                &self.task.description,
                &self.task.expected_output,
                &context,
            )),
        ]
    }

    async fn run_with_tools(
        &self,
        mut messages: Vec<Message>,
        tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
    ) -> LLMGraphResult<String> {
        let tools = tool_registry.get_tools();

        for iteration in 1..=self.max_iterations {
            debug!(agent = self.name.as_str(), iteration, "Requesting completion with tools");
            let reply = self
                .model
                .generate_with_tools(messages.clone(), tools.clone())
                .await?;
            messages.push(reply.clone());

            let Some(tool_calls) = reply.tool_calls.filter(|calls| !calls.is_empty()) else {
                return Ok(reply.content.unwrap_or_default());
            };

            for tool_call in tool_calls {
                info!(
                    agent = self.name.as_str(),
                    tool = tool_call.function.name.as_str(),
                    arguments = tool_call.function.arguments.as_str(),
                    "Executing tool"
                );
                let content = match tool_registry
                    .execute_tool(&tool_call.function.name, &tool_call.function.arguments)
                {
                    Ok(result) => match result {
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    },
                    Err(e) => {
                        warn!(agent = self.name.as_str(), error = %e, "Tool call failed");
                        format!("Error: {}", e)
                    }
                };
                messages.push(Message::tool_result(tool_call.id, content));
            }
        }

        Err(AgentError::MaxIterationsExceeded(self.name.clone()).into())
    }
}

#[async_trait]
impl Agent for CrewMember {
    async fn run(
        &mut self,
        handoff: Handoff<'_>,
        tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
    ) -> LLMGraphResult<AgentOutput> {
        let messages = self.build_messages(&handoff);

        let output = if tool_registry.get_tools().is_empty() {
            self.model.generate(messages).await?
        } else {
            self.run_with_tools(messages, tool_registry).await?
        };

        Ok(AgentOutput {
            output,
            next: self.next,
        })
    }

    fn get_name(&self) -> &str {
        &self.name
    }
}
