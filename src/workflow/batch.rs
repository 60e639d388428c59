//! Several independent workflow runs, summarised together.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::errors::LLMGraphResult;
use crate::models::record::{HazardAnalysis, HazardRecord};
use crate::workflow::machine::HazardWorkflow;

pub const DEFAULT_RUNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub runs: usize,
    /// Runs in flight at once. `1` runs them strictly one after another.
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            concurrency: 1,
        }
    }
}

impl BatchConfig {
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// One entry per run, in run order.
    pub analyses: Vec<HazardAnalysis>,
    pub summary: String,
}

/// Run the workflow `config.runs` times on fresh records, then ask for one
/// comprehensive summary. The first failing run aborts the batch.
pub async fn run_batch(
    workflow: &HazardWorkflow,
    config: BatchConfig,
) -> LLMGraphResult<BatchReport> {
    let analyses: Vec<HazardAnalysis> = stream::iter(0..config.runs)
        .map(|index| async move {
            info!(run = index + 1, total = config.runs, "Starting hazard run");
            workflow
                .run(HazardRecord::new())
                .await
                .map(|run| HazardAnalysis::from(&run.record))
        })
        .buffered(config.concurrency.max(1))
        .try_collect()
        .await?;

    let summary = workflow
        .reporter()
        .summarize(&analyses, workflow.model())
        .await?;

    Ok(BatchReport { analyses, summary })
}
