//! Ports - seams to the outside world
//!
//! Every side effect the pipeline has goes through one of these traits:
//! spawning processes and writing cached output.

pub mod command;
pub mod output_cache;

pub use self::command::{Captured, CommandExecutor, CommandSpec};
pub use self::output_cache::OutputCache;
