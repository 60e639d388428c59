//! The record that flows through the hazard workflow.

use serde::{Deserialize, Serialize};

use crate::errors::LLMGraphResult;

/// How the validator's verdict was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictMode {
    /// The response followed the requested format.
    Strict,
    /// The response was malformed and the keyword heuristic was applied.
    Degraded,
}

/// State of one hazard analysis run.
///
/// `hazard` is written once, by the first generator pass. `attempts` only
/// grows, by one per generator pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardRecord {
    pub hazard: String,
    pub solution: String,
    pub is_valid: bool,
    pub validation_feedback: String,
    pub attempts: u32,
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict_mode: Option<VerdictMode>,
}

impl HazardRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known hazard instead of asking the model for one.
    pub fn with_hazard(hazard: impl Into<String>) -> Self {
        Self {
            hazard: hazard.into(),
            ..Self::default()
        }
    }

    pub fn is_reported(&self) -> bool {
        self.report.is_some()
    }

    pub fn to_json(&self) -> LLMGraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> LLMGraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The per-run summary kept by the batch variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardAnalysis {
    pub hazard: String,
    pub solution: String,
    pub is_valid: bool,
    pub validation_feedback: String,
    pub attempts: u32,
}

impl From<&HazardRecord> for HazardAnalysis {
    fn from(record: &HazardRecord) -> Self {
        Self {
            hazard: record.hazard.clone(),
            solution: record.solution.clone(),
            is_valid: record.is_valid,
            validation_feedback: record.validation_feedback.clone(),
            attempts: record.attempts,
        }
    }
}

/// Marker shown for a verdict in reports.
pub fn validity_label(is_valid: bool) -> &'static str {
    if is_valid {
        "✓ Valid"
    } else {
        "✗ Invalid"
    }
}
