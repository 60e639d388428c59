//! Validator node: asks the model to judge a solution and interprets the verdict.
//!
//! The model is asked for exactly two lines:
//!
//! ```text
//! VALID: true
//! FEEDBACK: looks good
//! ```
//!
//! A JSON object `{"valid": bool, "feedback": "..."}` is accepted as well.
//! Anything else either goes through the keyword heuristic (flagged as
//! [`VerdictMode::Degraded`]) or is rejected, depending on [`VerdictPolicy`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{LLMGraphResult, ValidationError};
use crate::generate::LanguageModel;
use crate::models::record::{HazardRecord, VerdictMode};
use crate::models::tools::Message;
use crate::prompts;

const VALID_MARKER: &str = "VALID:";
const FEEDBACK_MARKER: &str = "FEEDBACK:";

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

/// What to do with a response that does not follow the requested format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerdictPolicy {
    /// Fall back to the keyword heuristic and mark the verdict degraded.
    #[default]
    Lenient,
    /// Reject the response with [`ValidationError::MalformedVerdict`].
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub feedback: String,
    pub mode: VerdictMode,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StructuredVerdict {
    valid: bool,
    feedback: String,
}

/// Parse a response that follows the requested format, or `None`.
pub fn parse_strict(response: &str) -> Option<Verdict> {
    let response = response.trim();
    parse_marker_lines(response).or_else(|| parse_json(response))
}

fn parse_marker_lines(response: &str) -> Option<Verdict> {
    let mut lines = response.lines().map(str::trim);
    let valid_line = lines.clone().find(|line| line.starts_with(VALID_MARKER))?;
    let feedback_line = lines.find(|line| line.starts_with(FEEDBACK_MARKER))?;

    Some(Verdict {
        is_valid: valid_line.to_lowercase().contains("true"),
        feedback: after_last_feedback_marker(feedback_line),
        mode: VerdictMode::Strict,
    })
}

fn parse_json(response: &str) -> Option<Verdict> {
    let object = JSON_OBJECT.find(response)?;
    let structured: StructuredVerdict = serde_json::from_str(object.as_str()).ok()?;
    Some(Verdict {
        is_valid: structured.valid,
        feedback: structured.feedback.trim().to_string(),
        mode: VerdictMode::Strict,
    })
}

fn after_last_feedback_marker(text: &str) -> String {
    text.rsplit(FEEDBACK_MARKER).next().unwrap_or_default().trim().to_string()
}

/// Keyword heuristic for malformed responses: valid only if "true" appears
/// and "false" does not; feedback is whatever follows the last feedback
/// marker, or the whole response.
pub fn parse_degraded(response: &str) -> Verdict {
    let response = response.trim();
    let lower = response.to_lowercase();
    let feedback = if response.contains(FEEDBACK_MARKER) {
        after_last_feedback_marker(response)
    } else {
        response.to_string()
    };

    Verdict {
        is_valid: lower.contains("true") && !lower.contains("false"),
        feedback,
        mode: VerdictMode::Degraded,
    }
}

pub fn parse_verdict(response: &str, policy: VerdictPolicy) -> Result<Verdict, ValidationError> {
    if let Some(verdict) = parse_strict(response) {
        return Ok(verdict);
    }
    match policy {
        VerdictPolicy::Lenient => {
            warn!("Validator response did not follow the verdict format, using keyword heuristic");
            Ok(parse_degraded(response))
        }
        VerdictPolicy::Strict => Err(ValidationError::MalformedVerdict(
            response.trim().to_string(),
        )),
    }
}

/// Validator node.
///
/// # Example
/// ```rust
/// use squirrelgraph::agents::validator::{Validator, VerdictPolicy};
///
/// let validator = Validator::new().with_policy(VerdictPolicy::Strict);
/// assert_eq!(validator.policy(), VerdictPolicy::Strict);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: VerdictPolicy,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: VerdictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> VerdictPolicy {
        self.policy
    }

    /// Judge the record's current solution and store the verdict on it.
    pub async fn run(
        &self,
        record: &mut HazardRecord,
        model: &dyn LanguageModel,
    ) -> LLMGraphResult<Verdict> {
        if record.attempts == 0 {
            return Err(ValidationError::MissingSolution.into());
        }

        let prompt = prompts::validation_prompt(&record.hazard, &record.solution);
        let response = model.generate(vec![Message::user(prompt)]).await?;
        let verdict = parse_verdict(&response, self.policy)?;

        record.is_valid = verdict.is_valid;
        record.validation_feedback = verdict.feedback.clone();
        record.verdict_mode = Some(verdict.mode);

        info!(
            is_valid = verdict.is_valid,
            mode = ?verdict.mode,
            attempts = record.attempts,
            "Validated solution"
        );
        Ok(verdict)
    }
}
