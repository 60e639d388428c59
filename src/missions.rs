//! Ready-made graphs: the strategist crew, Operation Acorn Hoard and the
//! tool-less advisor.

use std::sync::Arc;

use crate::agents::advisor::AdvisorAgent;
use crate::agents::crew::{CrewMember, CrewTask};
use crate::errors::LLMGraphResult;
use crate::generate::LanguageModel;
use crate::models::graph::{Graph, GraphRun};
use crate::toolbox;

pub const DEFAULT_STRATEGIST_HAZARD: &str = "A big, scary dog is barking near the acorn pile!";
pub const DEFAULT_ADVISOR_HAZARD: &str = "A human is having a picnic right under the best acorn tree!";

pub const STRATEGIST: i32 = 0;

pub const COMMANDER_CHIP: i32 = 0;
pub const PIP_SQUEAK: i32 = 1;
pub const SLINK_STRIPE: i32 = 2;

pub const ADVISOR: i32 = 0;

pub fn strategist_task(hazard: &str) -> CrewTask {
    let tool_list: String = toolbox::STRATEGIST_TOOLS
        .iter()
        .map(|name| format!("- {name}\n"))
        .collect();
    CrewTask::new(
        format!(
            "The current hazard is: '{hazard}'\n\n\
             You must choose the single best tool to use from your toolbox and then apply it.\n\
             **IMPORTANT**: First, name the exact tool you want to use.\n\
             Then explain why this tool is ideal for this hazard.\n\
             Finally, execute it by calling the tool with the hazard description.\n\n\
             **NOTE**: The tool expects a single string input in this format:\n\
             {{ \"hazard_description\": \"<insert the full hazard as a plain string>\" }}\n\n\
             Available tools:\n{tool_list}\n\
             Avoid magic, human technology, or unrealistic abilities. \
             Your strategy must be plausible for a clever squirrel."
        ),
        "Tool name + justification + result from tool execution.",
    )
}

/// One strategist armed with the four tactics.
pub fn strategist_crew(model: Arc<dyn LanguageModel>, hazard: &str) -> LLMGraphResult<Graph> {
    let strategist = CrewMember::new("Wise Squirrel Strategist", "Wise Squirrel Strategist", model)
        .with_goal(
            "Provide clever, low-tech acorn survival strategies using natural squirrel abilities.",
        )
        .with_backstory(
            "You are a legendary squirrel mentor known for brilliant escape tactics and sneaky strategies. \
             You train young squirrels to navigate dangerous environments without using human tools. \
             Your advice must always be practical, action-oriented, and believable for a squirrel.",
        )
        .with_task(strategist_task(hazard));

    let mut graph = Graph::new();
    graph.add_node(STRATEGIST, Box::new(strategist))?;
    graph.set_node_tools(STRATEGIST, toolbox::strategist_registry())?;
    Ok(graph)
}

pub async fn run_strategist(
    model: Arc<dyn LanguageModel>,
    hazard: &str,
) -> LLMGraphResult<GraphRun> {
    strategist_crew(model, hazard)?.run(STRATEGIST, "").await
}

/// Commander Chip gathers intel, Pip Squeak solves obstacles with it, and
/// Slink Stripe turns both into a timed plan.
pub fn acorn_hoard_crew(model: Arc<dyn LanguageModel>) -> LLMGraphResult<Graph> {
    let commander = CrewMember::new(
        "Commander Chip",
        "Lead Planner & Intel Integrator for the Squirrel Secret Service (SSS)",
        model.clone(),
    )
    .with_goal("Integrate intelligence from tools and form a solid mission plan to acquire the Golden Acorn.")
    .with_backstory(
        "Commander Chip 'Strategy' Swiftpaw is a seasoned SSS operative, renowned for meticulous \
         planning and the ability to synthesize complex information into actionable strategies. \
         Chip trusts custom intel sources but always cross-references with current conditions.",
    )
    .with_task(CrewTask::new(
        "1. Call the `badger_garden_intel_briefing_tool` for foundational intel.\n\
         2. Use `web_search_tool` to find short-term weather forecast for 'Fort Erie, Ontario'.\n\
         3. Synthesize this information and identify the MOST viable mission approach \
         (entry point, timing considering Grumples' nap from 13:00-16:00, and current weather).\n\
         4. Outline 2-3 critical risks for that approach.",
        "Report with: (a) Summary of key intel, (b) weather summary, \
         (c) proposed mission approach, (d) 2-3 risks.",
    ))
    .hand_off_to(PIP_SQUEAK);

    let pip = CrewMember::new(
        "Pip Squeak",
        "Tactical Problem Solver & Resource Optimizer for SSS",
        model.clone(),
    )
    .with_goal("Devise creative, nature-based tactics to bypass threats and obstacles using squirrel ingenuity.")
    .with_backstory(
        "Pip 'Solutions' Squeak is the SSS gadget guru, though the 'gadgets' are purely natural. \
         Pip can improvise a solution for anything using twigs, leaves, and cleverness.",
    )
    .with_task(
        CrewTask::new(
            "Using the mission plan from Commander Chip:\n\
             1. Propose a simple, nature-based method to overcome one physical obstacle \
             (e.g., crossing gravel quietly, avoiding thorns).\n\
             2. Propose a distraction or handling technique for one minor threat (like FiFi the Poodle).\n\
             Solutions must be low-tech and squirrel-realistic.",
            "List of 1-2 tactical solutions with materials and explanation.",
        )
        .with_context([COMMANDER_CHIP]),
    )
    .hand_off_to(SLINK_STRIPE);

    let slink = CrewMember::new(
        "Slink Stripe",
        "Operational Sequencer & Contingency Planner for SSS",
        model,
    )
    .with_goal("Create an executable operational timeline for the Golden Acorn mission, with contingencies.")
    .with_backstory(
        "Slink 'Executioner' Stripe is the field ops master of the SSS, \
         turning high-level strategy into minute-by-minute plans and always preparing for the unexpected.",
    )
    .with_task(
        CrewTask::new(
            "Based on Commander Chip's strategy and Pip Squeak's tactics:\n\
             Draft a minute-by-minute plan for 'Operation: Acorn Hoard' starting at 13:30 (within nap time).\n\
             Plan must include: approach, obstacle handling, acorn grab, exfiltration.\n\
             Also identify one possible failure during the acorn grab and give a squirrel-level contingency plan.",
            "Detailed ops plan with backup step for failure at the grab point.",
        )
        .with_context([COMMANDER_CHIP, PIP_SQUEAK]),
    );

    let mut graph = Graph::new();
    graph.add_node(COMMANDER_CHIP, Box::new(commander))?;
    graph.add_node(PIP_SQUEAK, Box::new(pip))?;
    graph.add_node(SLINK_STRIPE, Box::new(slink))?;
    graph.add_edge(COMMANDER_CHIP, PIP_SQUEAK)?;
    graph.add_edge(PIP_SQUEAK, SLINK_STRIPE)?;
    graph.set_node_tools(COMMANDER_CHIP, toolbox::intel_registry())?;
    Ok(graph)
}

pub async fn run_acorn_hoard(model: Arc<dyn LanguageModel>) -> LLMGraphResult<GraphRun> {
    acorn_hoard_crew(model)?.run(COMMANDER_CHIP, "").await
}

pub fn advisor_graph(advisor: AdvisorAgent) -> LLMGraphResult<Graph> {
    let mut graph = Graph::new().with_max_steps(1);
    graph.add_node(ADVISOR, Box::new(advisor))?;
    Ok(graph)
}

/// Ask the advisor about one hazard and return its answer.
pub async fn ask_advisor(advisor: AdvisorAgent, hazard: &str) -> LLMGraphResult<String> {
    let run = advisor_graph(advisor)?.run(ADVISOR, hazard).await?;
    Ok(run.final_output().unwrap_or_default().to_string())
}

pub async fn run_advisor(model: Arc<dyn LanguageModel>, hazard: &str) -> LLMGraphResult<String> {
    ask_advisor(AdvisorAgent::new(model), hazard).await
}
