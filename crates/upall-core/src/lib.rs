//! upall-core
//!
//! Building blocks for the `upall` maintenance run: pull every plugin
//! checkout, run the package-manager upkeep commands concurrently, cache each
//! command's combined output, then hand the cache to the post-processors.
//!
//! # Modules
//! - **domain**: tasks, routes, outcomes
//! - **ports**: `CommandExecutor` and `OutputCache` seams
//! - **impls**: process and filesystem implementations of the ports
//! - **runtime**: `TaskRunner`, executes one task
//! - **worker**: `WorkerGroup`, the pool that drains the task queue
//! - **app**: planning, the pipeline and its report
//! - **config**: the fixed directories and commands

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod runtime;
pub mod worker;

pub use app::{Pipeline, PipelineBuilder, RunReport};
pub use config::UpallConfig;
pub use error::UpallError;
