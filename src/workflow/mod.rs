//! The hazard analysis retry loop and its batch variant.

pub mod batch;
pub mod machine;

pub use batch::{run_batch, BatchConfig, BatchReport};
pub use machine::{HazardWorkflow, Stage, Transition, WorkflowRun};
