//! A single conversational node with no tools: the wise old squirrel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::LLMGraphResult;
use crate::generate::LanguageModel;
use crate::models::graph::{Agent, AgentOutput, Handoff};
use crate::models::tools::{Message, ToolRegistryTrait};
use crate::prompts;

pub struct AdvisorAgent {
    model: Option<Arc<dyn LanguageModel>>,
}

impl AdvisorAgent {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// An advisor that answers every hazard with a fixed placeholder.
    pub fn without_model() -> Self {
        Self { model: None }
    }
}

#[async_trait]
impl Agent for AdvisorAgent {
    async fn run(
        &mut self,
        handoff: Handoff<'_>,
        _tool_registry: &(dyn ToolRegistryTrait + Send + Sync),
    ) -> LLMGraphResult<AgentOutput> {
        let hazard = handoff.input.trim();
        if hazard.is_empty() {
            return Ok(AgentOutput::finish(prompts::ADVISOR_NO_HAZARD_REPLY));
        }

        let Some(model) = &self.model else {
            warn!("No model configured for the advisor, using the placeholder reply");
            return Ok(AgentOutput::finish(prompts::ADVISOR_NO_MODEL_REPLY));
        };

        info!(hazard, "Asking the wise squirrel");
        let solution = model
            .generate(vec![
                Message::system(prompts::ADVISOR_SYSTEM_PROMPT),
                Message::user(prompts::advisor_request(hazard)),
            ])
            .await?;
        Ok(AgentOutput::finish(solution))
    }

    fn get_name(&self) -> &str {
        "Squirrel Strategist (No Tools)"
    }
}
