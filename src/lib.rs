//! matterfix: one-shot maintenance for a static blog's posts tree
//!
//! The library rewrites frontmatter fields in post documents and moves post
//! directories into a date-based hierarchy. All tasks share a single batch
//! runner that asks for confirmation, processes every item, captures per-item
//! failures and prints a summary.
//!
//! # Editing frontmatter
//!
//! ```rust
//! use matterfix::{Edit, EditOutcome, FrontMatterEditor, Result};
//!
//! fn main() -> Result<()> {
//!     let editor = FrontMatterEditor::new()?;
//!     let post = "---\ntitle: Hello\ndate: 2024-03-07\n---\nBody text.\n";
//!
//!     match editor.apply(&Edit::insert_layout("single_post.njk"), post) {
//!         EditOutcome::Changed(text) => assert!(text.contains("layout: single_post.njk")),
//!         EditOutcome::Skipped(reason) => println!("skipped: {}", reason),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Restructuring the posts tree
//!
//! ```rust,no_run
//! use matterfix::{
//!     AssumeYes, BatchRunner, FsRelocator, RestructureConfig, RestructureTask, Result,
//!     RunnerConfig,
//! };
//!
//! fn main() -> Result<()> {
//!     let config = RestructureConfig {
//!         dry_run: true,
//!         ..Default::default()
//!     };
//!     let mut task = RestructureTask::new("_posts", config, FsRelocator)?;
//!     let mut runner = BatchRunner::new(RunnerConfig::default(), AssumeYes, std::io::stdout());
//!     let status = runner.run(&mut task)?;
//!     if let Some(report) = status.report() {
//!         println!("{} moves planned", report.summary().changed);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: frontmatter detection, the edits, date extraction, tree walking
//! - [`io`]: markdown file resolution, atomic writes, directory relocation
//! - [`batch`]: the runner, outcomes and reports, and the runnable tasks
//! - [`error`]: the library error type

pub use crate::error::{MatterFixError, Result};

pub use crate::batch::{
    AssumeYes, BatchRunner, Confirm, EditTask, EditorConfig, Outcome, Report, ReportFormat,
    RestructureTask, RunStatus, RunnerConfig, StdinConfirm, Summary, Task,
};
pub use crate::core::{
    Document, Edit, EditOutcome, FrontMatterEditor, PlanAction, PlanEntry, PostDirectory,
    RestructureConfig, Restructurer, SkipReason,
};
pub use crate::io::{FsRelocator, Relocator};

pub mod batch;
pub mod core;
pub mod error;
pub mod io;

/// Posts directory used when none is given
pub const DEFAULT_POSTS_DIR: &str = "_posts";

/// Convenience functions for single files
pub mod convenience {
    //! Apply an edit to one file without going through the batch runner.

    use crate::{Edit, EditOutcome, FrontMatterEditor, Result};
    use std::path::Path;

    /// Read `path`, apply `edit`, and write the file back if it changed
    pub fn edit_file<P: AsRef<Path>>(path: P, edit: &Edit) -> Result<EditOutcome> {
        let path = path.as_ref();
        let content = crate::io::read_to_string(path)?;
        let outcome = FrontMatterEditor::new()?.apply(edit, &content);
        if let EditOutcome::Changed(updated) = &outcome {
            crate::io::write_atomic(path, updated)?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_edit_file_round() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.md");
        fs::write(&path, "---\ntitle: Hello\n---\nBody\n").unwrap();

        let edit = Edit::insert_layout("single_post.njk");
        let first = convenience::edit_file(&path, &edit).unwrap();
        assert!(first.is_changed());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "---\ntitle: Hello\nlayout: single_post.njk\n---\nBody\n"
        );

        let second = convenience::edit_file(&path, &edit).unwrap();
        assert_eq!(second, EditOutcome::Skipped(SkipReason::AlreadyHasLayout));
    }

    #[test]
    fn test_edit_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let err = convenience::edit_file(temp_dir.path().join("nope.md"), &Edit::AddDefaultTag)
            .unwrap_err();
        assert!(matches!(err, MatterFixError::FileAccess { .. }));
    }
}
