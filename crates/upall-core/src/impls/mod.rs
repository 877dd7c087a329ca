//! Impls - implementations of the ports
//!
//! # Included
//! - **SystemCommandExecutor**: spawns real processes
//! - **FsOutputCache**: one text file per route
//! - **ScriptedExecutor** (tests only): canned process results

pub mod fs_cache;
pub mod process;
#[cfg(test)]
pub mod scripted;

pub use self::fs_cache::FsOutputCache;
pub use self::process::SystemCommandExecutor;
