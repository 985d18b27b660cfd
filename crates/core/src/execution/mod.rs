//! Execution primitives: command invocation, ordered task running, polling

pub mod command;
pub mod runner;
pub mod wait;

pub use command::{CommandExecutor, CommandOutcome};
pub use runner::{ExecutionResult, Task};
pub use wait::Waiter;
