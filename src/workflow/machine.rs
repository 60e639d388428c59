//! The hazard workflow as an explicit state machine:
//! Generate → Validate → Route → {Generate | Report}, with Report terminal.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::agents::generator::Generator;
use crate::agents::reporter::Reporter;
use crate::agents::router::{Route, Router};
use crate::agents::validator::{Validator, VerdictPolicy};
use crate::errors::LLMGraphResult;
use crate::generate::LanguageModel;
use crate::models::record::HazardRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Validate,
    Route,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Generate => "generate",
            Stage::Validate => "validate",
            Stage::Route => "route",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(Stage),
    /// The report has been written.
    Finished,
}

/// A finished run: the final record and every stage visited, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRun {
    pub record: HazardRecord,
    pub path: Vec<Stage>,
}

/// Hazard analysis workflow over a substitutable language model.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use squirrelgraph::config::ModelConfig;
/// use squirrelgraph::generate::ChatClient;
/// use squirrelgraph::models::record::HazardRecord;
/// use squirrelgraph::workflow::HazardWorkflow;
///
/// # async fn demo() -> squirrelgraph::LLMGraphResult<()> {
/// let model = Arc::new(ChatClient::new(ModelConfig::from_env()?)?);
/// let run = HazardWorkflow::new(model).run(HazardRecord::new()).await?;
/// println!("{}", run.record.report.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct HazardWorkflow {
    model: Arc<dyn LanguageModel>,
    generator: Generator,
    validator: Validator,
    router: Router,
    reporter: Reporter,
}

impl HazardWorkflow {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            generator: Generator::new(),
            validator: Validator::new(),
            router: Router::new(),
            reporter: Reporter::new(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.router = self.router.with_max_attempts(max_attempts);
        self
    }

    pub fn with_verdict_policy(mut self, policy: VerdictPolicy) -> Self {
        self.validator = self.validator.with_policy(policy);
        self
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn max_attempts(&self) -> u32 {
        self.router.max_attempts()
    }

    /// Execute one stage against the record and say where to go next.
    pub async fn step(
        &self,
        stage: Stage,
        record: &mut HazardRecord,
    ) -> LLMGraphResult<Transition> {
        let model = self.model.as_ref();
        let transition = match stage {
            Stage::Generate => {
                self.generator.run(record, model).await?;
                Transition::Next(Stage::Validate)
            }
            Stage::Validate => {
                self.validator.run(record, model).await?;
                Transition::Next(Stage::Route)
            }
            Stage::Route => match self.router.decide(record) {
                Route::Generate => Transition::Next(Stage::Generate),
                Route::Report => Transition::Next(Stage::Report),
            },
            Stage::Report => {
                self.reporter.run(record, model).await?;
                Transition::Finished
            }
        };
        debug!(%stage, ?transition, attempts = record.attempts, "Stage complete");
        Ok(transition)
    }

    /// Drive a record from Generate until the report is written.
    pub async fn run(&self, mut record: HazardRecord) -> LLMGraphResult<WorkflowRun> {
        let mut path = Vec::new();
        let mut stage = Stage::Generate;

        loop {
            path.push(stage);
            match self.step(stage, &mut record).await? {
                Transition::Next(next) => stage = next,
                Transition::Finished => break,
            }
        }

        info!(
            attempts = record.attempts,
            is_valid = record.is_valid,
            "Hazard workflow finished"
        );
        Ok(WorkflowRun { record, path })
    }
}
