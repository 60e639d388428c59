//! Generator node: names a hazard (first pass only) and proposes a mitigation.

use tracing::{debug, info};

use crate::errors::LLMGraphResult;
use crate::generate::LanguageModel;
use crate::models::record::HazardRecord;
use crate::models::tools::Message;
use crate::prompts;

#[derive(Debug, Clone, Default)]
pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    /// Ask the model for a fresh hazard statement.
    pub async fn generate_hazard(&self, model: &dyn LanguageModel) -> LLMGraphResult<String> {
        let hazard = model.generate(vec![Message::user(prompts::HAZARD_PROMPT)]).await?;
        Ok(hazard.trim().to_string())
    }

    /// One generator pass. Makes one call, or two on the first pass when the
    /// record has no hazard yet, and bumps `attempts` by exactly one.
    pub async fn run(
        &self,
        record: &mut HazardRecord,
        model: &dyn LanguageModel,
    ) -> LLMGraphResult<()> {
        if record.attempts == 0 && record.hazard.is_empty() {
            record.hazard = self.generate_hazard(model).await?;
            info!(hazard = record.hazard.as_str(), "Generated hazard");
        }

        let prompt = prompts::mitigation_prompt(
            &record.hazard,
            record.attempts,
            &record.validation_feedback,
        );
        record.solution = model.generate(vec![Message::user(prompt)]).await?;
        record.attempts += 1;

        debug!(
            attempts = record.attempts,
            solution = record.solution.as_str(),
            "Proposed solution"
        );
        Ok(())
    }
}
