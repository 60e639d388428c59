//! Reporter node: turns the final record, or a batch of them, into prose.

use tracing::info;

use crate::errors::LLMGraphResult;
use crate::generate::LanguageModel;
use crate::models::record::{HazardAnalysis, HazardRecord};
use crate::models::tools::Message;
use crate::prompts;

#[derive(Debug, Clone, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the report for a finished run. Terminal: nothing runs after it.
    pub async fn run(
        &self,
        record: &mut HazardRecord,
        model: &dyn LanguageModel,
    ) -> LLMGraphResult<()> {
        let prompt = prompts::report_prompt(
            &record.hazard,
            &record.solution,
            record.is_valid,
            &record.validation_feedback,
            record.attempts,
        );
        let report = model.generate(vec![Message::user(prompt)]).await?;
        info!(attempts = record.attempts, is_valid = record.is_valid, "Report written");
        record.report = Some(report);
        Ok(())
    }

    /// One comprehensive report across independent runs.
    pub async fn summarize(
        &self,
        analyses: &[HazardAnalysis],
        model: &dyn LanguageModel,
    ) -> LLMGraphResult<String> {
        let prompt = prompts::batch_summary_prompt(analyses);
        let summary = model.generate(vec![Message::user(prompt)]).await?;
        info!(runs = analyses.len(), "Batch summary written");
        Ok(summary)
    }
}
