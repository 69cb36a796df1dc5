//! Batch execution shared by all maintenance tasks
//!
//! - [`runner`]: confirmation, iteration, per-item error capture
//! - [`report`]: outcomes, aggregation and summary output
//! - [`tasks`]: the frontmatter edits and the restructuring as runnable tasks

pub mod report;
pub mod runner;
pub mod tasks;

pub use report::{ItemReport, Outcome, Report, ReportFormat, Summary};
pub use runner::{
    ask, is_yes, AssumeYes, BatchRunner, Confirm, RunStatus, RunnerConfig, StdinConfirm, Task,
};
pub use tasks::{EditTask, EditorConfig, RestructureTask};
