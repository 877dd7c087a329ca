//! App - the maintenance run built from the ports
//!
//! # Main components
//! - **filter**: which plugin directories are pulled
//! - **plan**: the full task list for a run
//! - **PipelineBuilder**: wiring plus start-up validation
//! - **Pipeline**: runs every task, then the post-processors
//! - **RunReport**: per-task outcomes

pub mod builder;
pub mod filter;
pub mod pipeline;
pub mod plan;
pub mod post_process;
pub mod report;

pub use self::builder::{BuildError, PipelineBuilder};
pub use self::filter::{FilterDecision, should_update};
pub use self::pipeline::Pipeline;
pub use self::plan::plan_tasks;
pub use self::post_process::{PostProcessResult, run_post_processors};
pub use self::report::{OutcomeCounts, RunReport};
