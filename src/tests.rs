//! Test suite for the squirrelgraph library
//!
//! This module contains:
//! - `ScriptedModel`, the language model fake shared by every test module
//! - Agent graph behaviour (handoff, edges, step limit, tools)
//! - The hazard workflow end to end, single run and batch
//! - The strategist, mission and advisor graphs
//! - Error display

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{ApiError, LLMGraphResult};
use crate::generate::LanguageModel;
use crate::models::tools::{Message, Tool};

type Responder = Box<dyn Fn(&[Message]) -> String + Send + Sync>;

enum Reply {
    Text(String),
    Message(Message),
}

/// A language model that plays back canned replies and records every prompt.
///
/// Replies are consumed in order; once the script runs out every call fails.
/// A model built with [`ScriptedModel::responding`] computes each reply from
/// the prompt instead, which keeps concurrent runs deterministic.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    responder: Option<Responder>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Reply::Text(r.into())).collect()),
            responder: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails.
    pub(crate) fn failing() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub(crate) fn responding<F>(responder: F) -> Self
    where
        F: Fn(&[Message]) -> String + Send + Sync + 'static,
    {
        Self {
            replies: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(responder)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a full assistant message, e.g. one carrying tool calls.
    pub(crate) fn then_message(self, message: Message) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Message(message));
        self
    }

    pub(crate) fn then_text(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Text(text.into()));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompt(&self, index: usize) -> Vec<Message> {
        self.prompts.lock().unwrap()[index].clone()
    }

    /// Text of every message in the most recent call.
    pub(crate) fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m.content.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }

    fn next_reply(&self, messages: Vec<Message>) -> LLMGraphResult<Message> {
        let reply = match &self.responder {
            Some(responder) => Some(Reply::Text(responder(&messages))),
            None => self.replies.lock().unwrap().pop_front(),
        };
        self.prompts.lock().unwrap().push(messages);

        match reply {
            Some(Reply::Text(text)) => Ok(Message::assistant(text)),
            Some(Reply::Message(message)) => Ok(message),
            None => Err(ApiError::RequestFailed("script exhausted".to_string()).into()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, messages: Vec<Message>) -> LLMGraphResult<String> {
        self.next_reply(messages)
            .map(|message| message.content.unwrap_or_default())
    }

    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        _tools: Vec<Tool>,
    ) -> LLMGraphResult<Message> {
        self.next_reply(messages)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::ScriptedModel;
    use crate::agents::advisor::AdvisorAgent;
    use crate::agents::crew::{CrewMember, CrewTask};
    use crate::agents::validator::VerdictPolicy;
    use crate::errors::{AgentError, GraphError, LLMGraphError, LLMGraphResult, NodeError};
    use crate::generate::LanguageModel;
    use crate::missions;
    use crate::models::graph::{Agent, AgentOutput, Graph, Handoff};
    use crate::models::record::{HazardRecord, VerdictMode};
    use crate::models::tools::{FunctionCall, Message, Tool, ToolCall, ToolRegistryTrait};
    use crate::prompts;
    use crate::toolbox;
    use crate::workflow::{run_batch, BatchConfig, HazardWorkflow, Stage};

    // ================================
    // TEST AGENTS
    // ================================

    /// Echoes its input and hands off to a fixed node, if any.
    struct EchoAgent {
        name: String,
        next: Option<i32>,
    }

    impl EchoAgent {
        fn new(name: impl Into<String>, next: Option<i32>) -> Self {
            Self {
                name: name.into(),
                next,
            }
        }
    }

    #[async_trait]
    impl Agent for EchoAgent {
        async fn run(
            &mut self,
            handoff: Handoff<'_>,
            _tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
        ) -> LLMGraphResult<AgentOutput> {
            let output = format!("{} saw: {}", self.name, handoff.input);
            Ok(match self.next {
                Some(next) => AgentOutput::handoff(output, next),
                None => AgentOutput::finish(output),
            })
        }

        fn get_name(&self) -> &str {
            &self.name
        }
    }

    /// Reports which tools its registry offers.
    struct ToolListAgent;

    #[async_trait]
    impl Agent for ToolListAgent {
        async fn run(
            &mut self,
            _handoff: Handoff<'_>,
            tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
        ) -> LLMGraphResult<AgentOutput> {
            let names: Vec<String> = tool_registry
                .get_tools()
                .iter()
                .map(|tool| tool.name().to_string())
                .collect();
            let result = tool_registry.execute_tool("shout", r#"{"text":"hi"}"#)?;
            Ok(AgentOutput::finish(format!("{} | {}", names.join(","), result)))
        }

        fn get_name(&self) -> &str {
            "ToolLister"
        }
    }

    fn shout_tool() -> Tool {
        Tool::function("shout", "Shout the text").with_param(
            "text",
            "string",
            "What to shout",
            true,
        )
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> Message {
        Message {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }]),
            tool_call_id: None,
        }
    }

    /// Answers each workflow prompt by what it asks for.
    fn workflow_responder(valid: bool) -> impl Fn(&[Message]) -> String + Send + Sync + 'static {
        move |messages: &[Message]| {
            let prompt = messages
                .last()
                .and_then(|m| m.content.clone())
                .unwrap_or_default();
            if prompt.contains("Generate a realistic hazard") {
                "A hawk circles overhead".to_string()
            } else if prompt.contains("Review this solution") {
                format!("VALID: {valid}\nFEEDBACK: checked")
            } else if prompt.contains("comprehensive summary report") {
                "Summary of all hazards".to_string()
            } else if prompt.contains("structured report") {
                "Report".to_string()
            } else {
                "Hide under a bush".to_string()
            }
        }
    }

    // ================================
    // GRAPH TESTS
    // ================================

    #[tokio::test]
    async fn test_graph_construction() {
        let mut graph = Graph::new();
        assert!(graph.is_empty());

        graph.add_node(0, Box::new(EchoAgent::new("A", Some(1)))).unwrap();
        graph.add_node(1, Box::new(EchoAgent::new("B", None))).unwrap();
        graph.add_edge(0, 1).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.to_string(), "0 (Agent: A) -> 1\n1 (Agent: B) ->\n");

        let err = graph.add_node(1, Box::new(EchoAgent::new("C", None))).unwrap_err();
        assert!(matches!(err, LLMGraphError::NodeError(NodeError::NodeAlreadyExists(1))));

        let err = graph.add_edge(0, 7).unwrap_err();
        assert!(matches!(err, LLMGraphError::NodeError(NodeError::NodeNotFound(7))));
    }

    #[tokio::test]
    async fn test_chain_passes_output_and_history() {
        let mut graph = Graph::new();
        graph.add_node(0, Box::new(EchoAgent::new("A", Some(1)))).unwrap();
        graph.add_node(1, Box::new(EchoAgent::new("B", None))).unwrap();
        graph.add_edge(0, 1).unwrap();

        let run = graph.run(0, "acorn").await.unwrap();

        assert_eq!(run.turns.len(), 2);
        assert_eq!(run.turns[0].output, "A saw: acorn");
        assert_eq!(run.final_output(), Some("B saw: A saw: acorn"));
        assert_eq!(run.transcript(), "[A] A saw: acorn\n[B] B saw: A saw: acorn");
    }

    #[tokio::test]
    async fn test_undeclared_edge_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node(0, Box::new(EchoAgent::new("A", Some(1)))).unwrap();
        graph.add_node(1, Box::new(EchoAgent::new("B", None))).unwrap();

        let err = graph.run(0, "acorn").await.unwrap_err();
        assert!(matches!(
            err,
            LLMGraphError::GraphError(GraphError::InvalidEdge { from: 0, to: 1 })
        ));
    }

    #[tokio::test]
    async fn test_cycle_hits_step_limit() {
        let mut graph = Graph::new().with_max_steps(4);
        graph.add_node(0, Box::new(EchoAgent::new("Ping", Some(1)))).unwrap();
        graph.add_node(1, Box::new(EchoAgent::new("Pong", Some(0)))).unwrap();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 0).unwrap();

        let err = graph.run(0, "ball").await.unwrap_err();
        assert!(matches!(err, LLMGraphError::GraphError(GraphError::MaxStepsExceeded(4))));
    }

    #[tokio::test]
    async fn test_empty_graph_and_unknown_start() {
        let mut graph = Graph::new();
        assert!(matches!(
            graph.run(0, "x").await.unwrap_err(),
            LLMGraphError::GraphError(GraphError::EmptyGraph)
        ));

        graph.add_node(0, Box::new(EchoAgent::new("A", None))).unwrap();
        assert!(matches!(
            graph.run(5, "x").await.unwrap_err(),
            LLMGraphError::NodeError(NodeError::NodeNotFound(5))
        ));
    }

    #[tokio::test]
    async fn test_node_tools_shadow_global_tools() {
        let mut graph = Graph::new();
        graph.register_tool(shout_tool(), |_| Ok(serde_json::json!("global")));
        graph.register_tool(
            Tool::function("whisper", "Whisper the text"),
            |_| Ok(serde_json::json!("psst")),
        );
        graph.add_node(0, Box::new(ToolListAgent)).unwrap();
        graph
            .register_tool_for_node(0, shout_tool(), |args| {
                Ok(serde_json::json!(args["text"].as_str().unwrap_or_default().to_uppercase()))
            })
            .unwrap();

        let run = graph.run(0, "").await.unwrap();

        assert_eq!(run.final_output(), Some("whisper,shout | \"HI\""));
        assert_eq!(graph.get_node_tool_registry(0).map(|r| r.len()), Some(1));
        assert_eq!(graph.get_shared_tool_registry().len(), 2);
    }

    // ================================
    // HAZARD WORKFLOW TESTS
    // ================================

    #[tokio::test]
    async fn test_always_invalid_run_stops_after_three_attempts() {
        let model = Arc::new(ScriptedModel::new([
            "A hawk circles overhead",
            "Build a tiny umbrella",
            "VALID: false\nFEEDBACK: umbrellas are human technology",
            "Dig a tunnel",
            "VALID: false\nFEEDBACK: too slow",
            "Use a drone",
            "VALID: false\nFEEDBACK: drones are human technology",
            "- Hazard: hawk\n- Recommendation: keep trying",
        ]));
        let workflow = HazardWorkflow::new(model.clone());

        let run = workflow.run(HazardRecord::new()).await.unwrap();

        assert_eq!(run.record.attempts, 3);
        assert!(!run.record.is_valid);
        assert_eq!(run.record.hazard, "A hawk circles overhead");
        assert_eq!(run.record.solution, "Use a drone");
        assert_eq!(run.record.validation_feedback, "drones are human technology");
        assert_eq!(
            run.record.report.as_deref(),
            Some("- Hazard: hawk\n- Recommendation: keep trying")
        );
        assert_eq!(model.calls(), 8);

        let mut expected = Vec::new();
        for _ in 0..3 {
            expected.extend([Stage::Generate, Stage::Validate, Stage::Route]);
        }
        expected.push(Stage::Report);
        assert_eq!(run.path, expected);

        // The report prompt carries the final state.
        let report_prompt = model.last_prompt();
        assert!(report_prompt.contains("ATTEMPTS: 3"));
        assert!(report_prompt.contains("✗ Invalid"));
    }

    #[tokio::test]
    async fn test_valid_first_pass_goes_straight_to_report() {
        let model = Arc::new(ScriptedModel::new([
            "A hawk circles overhead",
            "Freeze under the leaves",
            "VALID: true\nFEEDBACK: looks good",
            "Great plan",
        ]));
        let run = HazardWorkflow::new(model.clone())
            .run(HazardRecord::new())
            .await
            .unwrap();

        assert_eq!(run.record.attempts, 1);
        assert!(run.record.is_valid);
        assert_eq!(run.record.verdict_mode, Some(VerdictMode::Strict));
        assert_eq!(
            run.path,
            vec![Stage::Generate, Stage::Validate, Stage::Route, Stage::Report]
        );
        assert!(run.record.is_reported());
    }

    #[tokio::test]
    async fn test_retry_feeds_back_validator_feedback() {
        let model = Arc::new(ScriptedModel::new([
            "Use a ladder",
            "VALID: false\nFEEDBACK: ladders are human technology",
            "Climb the bark",
            "VALID: true\nFEEDBACK: fine",
            "Report",
        ]));
        let run = HazardWorkflow::new(model.clone())
            .run(HazardRecord::with_hazard("A fence blocks the tree"))
            .await
            .unwrap();

        assert_eq!(run.record.attempts, 2);
        assert_eq!(run.record.hazard, "A fence blocks the tree");
        let retry_prompt: String = model
            .prompt(2)
            .iter()
            .filter_map(|m| m.content.clone())
            .collect();
        assert!(retry_prompt.contains("Previous attempt feedback: ladders are human technology"));
    }

    #[tokio::test]
    async fn test_attempts_grow_by_one_per_generation() {
        let model = Arc::new(ScriptedModel::new([
            "A storm",
            "Shelter in a hollow",
            "VALID: false\nFEEDBACK: no hollow nearby",
            "Shelter under a root",
        ]));
        let workflow = HazardWorkflow::new(model.clone());
        let mut record = HazardRecord::new();

        assert_eq!(
            workflow.step(Stage::Generate, &mut record).await.unwrap(),
            crate::workflow::Transition::Next(Stage::Validate)
        );
        assert_eq!(record.attempts, 1);
        workflow.step(Stage::Validate, &mut record).await.unwrap();
        assert_eq!(
            workflow.step(Stage::Route, &mut record).await.unwrap(),
            crate::workflow::Transition::Next(Stage::Generate)
        );
        assert_eq!(record.attempts, 1);
        workflow.step(Stage::Generate, &mut record).await.unwrap();
        assert_eq!(record.attempts, 2);
    }

    #[tokio::test]
    async fn test_degraded_verdict_is_flagged() {
        let model = Arc::new(ScriptedModel::new([
            "Hide in a hollow log",
            "I think that is true, nicely done.",
            "Report",
        ]));
        let run = HazardWorkflow::new(model)
            .run(HazardRecord::with_hazard("A fox"))
            .await
            .unwrap();

        assert!(run.record.is_valid);
        assert_eq!(run.record.verdict_mode, Some(VerdictMode::Degraded));
    }

    #[tokio::test]
    async fn test_strict_policy_propagates_malformed_verdict() {
        let model = Arc::new(ScriptedModel::new(["Hide in a hollow log", "I think that is true"]));
        let workflow = HazardWorkflow::new(model).with_verdict_policy(VerdictPolicy::Strict);

        let err = workflow.run(HazardRecord::with_hazard("A fox")).await.unwrap_err();
        assert!(matches!(err, LLMGraphError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_model_failure_aborts_run() {
        let workflow = HazardWorkflow::new(Arc::new(ScriptedModel::failing()));
        let err = workflow.run(HazardRecord::new()).await.unwrap_err();
        assert!(matches!(err, LLMGraphError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_custom_attempt_cap() {
        let model = Arc::new(ScriptedModel::responding(workflow_responder(false)));
        let run = HazardWorkflow::new(model)
            .with_max_attempts(1)
            .run(HazardRecord::new())
            .await
            .unwrap();
        assert_eq!(run.record.attempts, 1);
        assert!(run.record.is_reported());
    }

    // ================================
    // BATCH TESTS
    // ================================

    #[tokio::test]
    async fn test_batch_keeps_run_order() {
        let mut script = Vec::new();
        for i in 1..=5 {
            script.push(format!("Hazard {i}"));
            script.push(format!("Solution {i}"));
            script.push("VALID: true\nFEEDBACK: ok".to_string());
            script.push(format!("Report {i}"));
        }
        script.push("Everything summarised".to_string());
        let model = Arc::new(ScriptedModel::new(script));
        let workflow = HazardWorkflow::new(model.clone());

        let report = run_batch(&workflow, BatchConfig::default()).await.unwrap();

        let hazards: Vec<&str> = report.analyses.iter().map(|a| a.hazard.as_str()).collect();
        assert_eq!(hazards, ["Hazard 1", "Hazard 2", "Hazard 3", "Hazard 4", "Hazard 5"]);
        assert_eq!(report.summary, "Everything summarised");
        assert_eq!(model.calls(), 21);

        let summary_prompt = model.last_prompt();
        assert!(summary_prompt.contains("HAZARD 5:\n- Hazard: Hazard 5\n- Solution: Solution 5"));
    }

    #[tokio::test]
    async fn test_concurrent_batch_collects_every_run() {
        let model = Arc::new(ScriptedModel::responding(workflow_responder(false)));
        let workflow = HazardWorkflow::new(model.clone());

        let report = run_batch(&workflow, BatchConfig::default().with_runs(5).with_concurrency(3))
            .await
            .unwrap();

        assert_eq!(report.analyses.len(), 5);
        assert!(report.analyses.iter().all(|a| a.attempts == 3 && !a.is_valid));
        assert_eq!(report.summary, "Summary of all hazards");
        // 5 runs of (hazard + 3 x (solution + verdict) + report) plus one summary
        assert_eq!(model.calls(), 5 * 8 + 1);
    }

    #[tokio::test]
    async fn test_batch_stops_on_first_failure() {
        let model = Arc::new(ScriptedModel::new(["Hazard 1", "Solution 1"]));
        let workflow = HazardWorkflow::new(model);
        assert!(run_batch(&workflow, BatchConfig::default()).await.is_err());
    }

    // ================================
    // CREW TESTS
    // ================================

    #[tokio::test]
    async fn test_strategist_runs_tool_loop() {
        let model = Arc::new(
            ScriptedModel::new(Vec::<String>::new())
                .then_message(tool_call(
                    "call_1",
                    toolbox::DECOY_DROP,
                    r#"{"hazard_description":"A human is near"}"#,
                ))
                .then_text("I chose decoy_drop because humans are curious."),
        );

        let run = missions::run_strategist(model.clone(), "A human is near").await.unwrap();

        assert_eq!(run.final_output(), Some("I chose decoy_drop because humans are curious."));
        assert_eq!(model.calls(), 2);

        let second = model.prompt(1);
        let tool_message = second.iter().find(|m| m.role == "tool").unwrap();
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        let tool_output = tool_message.content.as_deref().unwrap();
        assert!(tool_output.starts_with("SOLUTION: Implement 'Decoy Drop'"));
        let task = second[1].content.as_deref().unwrap();
        assert!(task.contains("The current hazard is: 'A human is near'"));
    }

    #[test]
    fn test_strategist_task_describes_tool_input() {
        let task = missions::strategist_task("A cat");
        assert!(task.description.contains("**NOTE**: The tool expects a single string input"));
        assert!(task
            .description
            .contains(r#"{ "hazard_description": "<insert the full hazard as a plain string>" }"#));
        for tool in toolbox::STRATEGIST_TOOLS {
            assert!(task.description.contains(&format!("- {tool}\n")));
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_back_to_model() {
        let model = Arc::new(
            ScriptedModel::new(Vec::<String>::new())
                .then_message(tool_call("call_1", "teleport", "{}"))
                .then_text("Fine, I will hide instead."),
        );

        let run = missions::run_strategist(model.clone(), "A cat").await.unwrap();

        assert_eq!(run.final_output(), Some("Fine, I will hide instead."));
        let tool_message = model.prompt(1).into_iter().find(|m| m.role == "tool").unwrap();
        assert_eq!(
            tool_message.content.as_deref(),
            Some("Error: Tool 'teleport' not found")
        );
    }

    #[tokio::test]
    async fn test_tool_loop_gives_up_after_max_iterations() {
        let mut scripted = ScriptedModel::new(Vec::<String>::new());
        for i in 0..2 {
            let id = format!("call_{i}");
            scripted = scripted.then_message(tool_call(&id, "shout", r#"{"text":"a"}"#));
        }
        let model: Arc<dyn LanguageModel> = Arc::new(scripted);
        let member = CrewMember::new("Loud", "Shouter", model)
            .with_task(CrewTask::new("Shout", "Noise"))
            .with_max_iterations(2);

        let mut graph = Graph::new();
        graph.add_node(0, Box::new(member)).unwrap();
        graph.register_tool(shout_tool(), |_| Ok(serde_json::json!("A!")));

        let err = graph.run(0, "go").await.unwrap_err();
        assert!(matches!(
            err,
            LLMGraphError::AgentError(AgentError::MaxIterationsExceeded(ref name)) if name == "Loud"
        ));
    }

    #[tokio::test]
    async fn test_mission_hands_context_down_the_chain() {
        let model = Arc::new(
            ScriptedModel::new(Vec::<String>::new())
                .then_message(tool_call("call_1", toolbox::INTEL_BRIEFING, "{}"))
                .then_message(tool_call(
                    "call_2",
                    toolbox::WEB_SEARCH,
                    r#"{"query":"weather Fort Erie"}"#,
                ))
                .then_text("Enter by the oak at 13:30.")
                .then_text("Use moss to muffle the gravel.")
                .then_text("13:30 approach, 13:35 grab, 13:40 exit."),
        );

        let run = missions::run_acorn_hoard(model.clone()).await.unwrap();

        let agents: Vec<&str> = run.turns.iter().map(|t| t.agent.as_str()).collect();
        assert_eq!(agents, ["Commander Chip", "Pip Squeak", "Slink Stripe"]);
        assert_eq!(run.final_output(), Some("13:30 approach, 13:35 grab, 13:40 exit."));
        assert_eq!(model.calls(), 5);

        let commander_followup = model.prompt(2);
        let tool_outputs: Vec<&str> = commander_followup
            .iter()
            .filter(|m| m.role == "tool")
            .filter_map(|m| m.content.as_deref())
            .collect();
        assert_eq!(tool_outputs, [toolbox::INTEL_REPORT, toolbox::WEATHER_REPORT]);

        let pip_prompt = model.prompt(3)[1].content.clone().unwrap();
        assert!(pip_prompt.contains("Enter by the oak at 13:30."));
        assert!(!pip_prompt.contains("Use moss"));

        let slink_prompt = model.last_prompt();
        assert!(slink_prompt.contains("Enter by the oak at 13:30."));
        assert!(slink_prompt.contains("Use moss to muffle the gravel."));
    }

    #[tokio::test]
    async fn test_mission_failure_surfaces_error() {
        let err = missions::run_acorn_hoard(Arc::new(ScriptedModel::failing()))
            .await
            .unwrap_err();
        assert!(matches!(err, LLMGraphError::ApiError(_)));
    }

    // ================================
    // ADVISOR TESTS
    // ================================

    #[tokio::test]
    async fn test_advisor_answers_empty_hazard_without_model() {
        let model = Arc::new(ScriptedModel::failing());
        let answer = missions::run_advisor(model.clone(), "   ").await.unwrap();

        assert_eq!(answer, prompts::ADVISOR_NO_HAZARD_REPLY);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_advisor_without_model_gives_placeholder() {
        let answer = missions::ask_advisor(
            AdvisorAgent::without_model(),
            missions::DEFAULT_ADVISOR_HAZARD,
        )
        .await
        .unwrap();
        assert_eq!(answer, prompts::ADVISOR_NO_MODEL_REPLY);

        // An empty hazard is still asked for first.
        let answer = missions::ask_advisor(AdvisorAgent::without_model(), "").await.unwrap();
        assert_eq!(answer, prompts::ADVISOR_NO_HAZARD_REPLY);
    }

    #[tokio::test]
    async fn test_advisor_asks_wise_squirrel() {
        let model = Arc::new(ScriptedModel::new(["Wait in the branches until they pack up."]));
        let answer = missions::run_advisor(model.clone(), missions::DEFAULT_ADVISOR_HAZARD)
            .await
            .unwrap();

        assert_eq!(answer, "Wait in the branches until they pack up.");
        let prompt = model.prompt(0);
        assert_eq!(prompt[0].role, "system");
        assert_eq!(
            prompt[1].content.as_deref(),
            Some("The hazard is: 'A human is having a picnic right under the best acorn tree!'. What's your low-tech advice?")
        );
    }

    // ================================
    // ERROR HANDLING TESTS
    // ================================

    #[test]
    fn test_error_handling() {
        use crate::errors::*;

        let llm_err: LLMGraphError = NodeError::NodeNotFound(42).into();
        assert!(llm_err.to_string().contains("Node 42 not found"));

        let llm_err: LLMGraphError = ToolError::ToolNotFound("my_tool".to_string()).into();
        assert!(llm_err.to_string().contains("Tool 'my_tool' not found"));

        let llm_err: LLMGraphError = ApiError::RateLimitExceeded.into();
        assert!(llm_err.to_string().contains("rate limit"));

        let llm_err: LLMGraphError = ValidationError::MissingSolution.into();
        assert!(llm_err.to_string().starts_with("Validation error:"));

        let llm_err: LLMGraphError = ConfigError::MissingEnv("OPENAI_API_KEY").into();
        assert_eq!(
            llm_err.to_string(),
            "Config error: environment variable OPENAI_API_KEY is not set"
        );
    }
}
