//! Prompt text for every agent in the crate.

use crate::models::record::{validity_label, HazardAnalysis};

pub const HAZARD_PROMPT: &str = "\
Generate a realistic hazard that a squirrel might face while trying to steal an acorn.
Consider:
- Environmental factors (weather, terrain)
- Predators and competitors
- Physical challenges
- Human-related obstacles

Make it specific and realistic.
Return only the hazard statement.";

/// Ask for a low-tech mitigation; on a retry, include the validator's feedback.
pub fn mitigation_prompt(hazard: &str, attempts: u32, previous_feedback: &str) -> String {
    let feedback = if attempts > 0 {
        format!("Previous attempt feedback: {previous_feedback}")
    } else {
        String::new()
    };
    let revision = if attempts > 0 {
        "IMPORTANT: This is a revision attempt. Please address the previous feedback."
    } else {
        ""
    };

    format!(
        "Given the following hazard for a squirrel trying to steal an acorn:
{hazard}

{feedback}

Provide a simple, low-tech solution that a squirrel could implement to mitigate this risk.
Focus on natural, easily accessible solutions that don't require human technology.
Keep the response concise and practical.

{revision}"
    )
}

pub fn validation_prompt(hazard: &str, solution: &str) -> String {
    format!(
        "Review this solution for a squirrel facing the following hazard:
Hazard: {hazard}
Proposed Solution: {solution}

Evaluate if this solution is:
1. Truly low-tech (no human technology)
2. Realistically implementable by a squirrel
3. Safe and effective

IMPORTANT: Respond in exactly this format:
VALID: [true/false]
FEEDBACK: [your feedback here]

Consider a solution valid if it meets these criteria:
- Uses only natural materials or squirrel-accessible resources
- Is something a squirrel could reasonably do
- Would effectively address the hazard
- Doesn't require human intervention or technology

Be generous in your validation - if the solution is mostly good but needs minor adjustments, consider it valid."
    )
}

pub fn report_prompt(
    hazard: &str,
    solution: &str,
    is_valid: bool,
    feedback: &str,
    attempts: u32,
) -> String {
    let status = validity_label(is_valid);
    format!(
        "Create a structured report for a squirrel's hazard mitigation plan:

HAZARD: {hazard}
PROPOSED SOLUTION: {solution}
VALIDATION STATUS: {status}
VALIDATION FEEDBACK: {feedback}
ATTEMPTS: {attempts}

Format the report as a clear, concise summary that:
1. Highlights the key points
2. Uses bullet points for clarity
3. Includes a final recommendation
4. Is written in a friendly, encouraging tone

Keep it brief but informative."
    )
}

pub fn batch_summary_prompt(analyses: &[HazardAnalysis]) -> String {
    let sections: Vec<String> = analyses
        .iter()
        .enumerate()
        .map(|(i, analysis)| {
            format!(
                "HAZARD {}:
- Hazard: {}
- Solution: {}
- Validation: {}
- Feedback: {}
- Attempts: {}",
                i + 1,
                analysis.hazard,
                analysis.solution,
                validity_label(analysis.is_valid),
                analysis.validation_feedback,
                analysis.attempts
            )
        })
        .collect();

    format!(
        "Create a comprehensive summary report for a squirrel's hazard mitigation strategies.
The report should cover all the following hazard analyses:

{}

Format the report to include:
1. An executive summary of all hazards and solutions
2. A detailed analysis of each hazard and its solution
3. Common themes or patterns across the solutions
4. Overall recommendations for the squirrel
5. A risk assessment matrix (high/medium/low) for each hazard

Use clear headings, bullet points, and a friendly, encouraging tone.
Make it comprehensive but easy to understand.",
        sections.join("\n\n")
    )
}

pub const ADVISOR_SYSTEM_PROMPT: &str = "\
You are a wise old squirrel, an expert in survival and outsmarting hazards when trying to secure acorns.
A younger squirrel has come to you with a problem.
Your task is to provide a creative, low-tech, and practical solution that a squirrel could realistically implement.
Focus on natural squirrel abilities (climbing, speed, agility, observation, digging, camouflage, using the environment) and simple tricks.
Do NOT suggest using any human tools, complex multi-squirrel coordinated plans unless very simple, or abilities squirrels don't possess.
The solution should be actionable and specific to the hazard.

Think step-by-step for your plan. For example:
1. Assess the situation (e.g., distance to threat, escape routes).
2. Describe the core tactic (e.g., distraction, stealth, quick grab).
3. Detail the execution.
4. Mention a quick getaway.";

pub fn advisor_request(hazard: &str) -> String {
    format!("The hazard is: '{hazard}'. What's your low-tech advice?")
}

pub const ADVISOR_NO_HAZARD_REPLY: &str = "What's the acorn hazard, little buddy? (No Tools mode)";

pub const ADVISOR_NO_MODEL_REPLY: &str =
    "My brain's a bit fuzzy for direct advice now (LLM not configured for 'no tools').";

/// System message describing a crew member.
pub fn crew_persona(role: &str, goal: &str, backstory: &str) -> String {
    format!(
        "You are {role}.
{backstory}

Your personal goal is: {goal}"
    )
}

/// User message for a crew task, with the outputs of the tasks it depends on.
pub fn crew_task(description: &str, expected_output: &str, context: &[(&str, &str)]) -> String {
    let mut prompt = format!(
        "Current Task: {description}\n\n\
         This is the expected criteria for your final answer: {expected_output}\n"
    );
    if !context.is_empty() {
        prompt.push_str("\nThis is the context you're working with:\n");
        for (agent, output) in context {
            prompt.push_str(&format!("\n--- From {agent} ---\n{output}\n"));
        }
    }
    prompt.push_str("\nBegin! Return your final answer only once the task is complete.");
    prompt
}
