//! Domain model (tasks, routes, outcomes).

pub mod outcome;
pub mod task;

pub use outcome::{OutcomeKind, TaskOutcome};
pub use task::{Route, Task};
