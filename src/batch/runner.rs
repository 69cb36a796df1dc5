//! The shared batch loop: confirm, enumerate, process each item, report
//!
//! Every maintenance task goes through [`BatchRunner::run`]. The runner owns
//! confirmation and catches per-item failures, so a task only has to list its
//! items and turn each one into an [`Outcome`].

use crate::batch::report::{Outcome, Report, ReportFormat};
use crate::error::Result;
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Capability to ask the user whether a destructive run may start
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Asks on stdout and reads the answer from stdin; `y`/`yes` in any case confirms.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        ask(prompt, &mut stdin.lock(), &mut stdout)
    }
}

/// Confirms without asking, for `--yes`
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Write `prompt`, read one line and report whether it was a yes
pub fn ask<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} (y/N): ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A maintenance task the runner can drive
pub trait Task {
    /// Human name used in the summary, e.g. "Tag addition"
    fn title(&self) -> String;

    /// Lines explaining what the run will do, shown before confirmation
    fn explanation(&self) -> Vec<String>;

    /// Whether the run modifies anything; read-only runs skip confirmation
    fn is_dry_run(&self) -> bool;

    /// Items to process, in order. Errors here abort the run.
    fn items(&mut self) -> Result<Vec<PathBuf>>;

    /// Process one item. Recoverable errors are recorded against the item,
    /// any other error aborts the run.
    fn process(&mut self, item: &Path) -> Result<Outcome>;

    /// Label for changed items in per-item lines
    fn changed_label(&self) -> &'static str {
        if self.is_dry_run() {
            "Would update"
        } else {
            "Updated"
        }
    }

    /// Lines printed after the summary
    fn epilogue(&self, _report: &Report) -> Vec<String> {
        Vec::new()
    }
}

/// Runner settings
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub format: ReportFormat,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The user declined; nothing was processed
    Cancelled,
    Completed(Report),
}

impl RunStatus {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Cancelled => None,
        }
    }
}

pub struct BatchRunner<C, W> {
    config: RunnerConfig,
    confirm: C,
    out: W,
}

impl<C: Confirm, W: Write> BatchRunner<C, W> {
    pub fn new(config: RunnerConfig, confirm: C, out: W) -> Self {
        Self {
            config,
            confirm,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run<T: Task + ?Sized>(&mut self, task: &mut T) -> Result<RunStatus> {
        let human = self.config.format == ReportFormat::Human;
        let dry_run = task.is_dry_run();

        if human {
            writeln!(self.out, "Starting {}...", task.title().to_lowercase())?;
            for line in task.explanation() {
                writeln!(self.out, "{}", line)?;
            }
            writeln!(self.out)?;
        }

        if !dry_run && !self.confirm.confirm("Continue?")? {
            writeln!(self.out, "{} cancelled.", task.title())?;
            info!("{} cancelled by user", task.title());
            return Ok(RunStatus::Cancelled);
        }

        let items = task.items()?;
        debug!("{}: {} items to process", task.title(), items.len());

        let mut report = Report::new(task.title(), dry_run);
        for item in items {
            let outcome = match task.process(&item) {
                Ok(outcome) => outcome,
                Err(e) if e.is_recoverable() => Outcome::Error(e.to_string()),
                Err(e) => return Err(e),
            };
            if human {
                self.write_item(task.changed_label(), &item, &outcome)?;
            }
            report.record(item, outcome);
        }

        report.write_summary(&mut self.out, self.config.format)?;
        if human {
            let epilogue = task.epilogue(&report);
            if !epilogue.is_empty() {
                writeln!(self.out)?;
                for line in epilogue {
                    writeln!(self.out, "{}", line)?;
                }
            }
        }
        info!("{}: {}", task.title(), report.summary());
        Ok(RunStatus::Completed(report))
    }

    fn write_item(&mut self, changed_label: &str, item: &Path, outcome: &Outcome) -> Result<()> {
        let item = item.display();
        match outcome {
            Outcome::Changed(detail) => writeln!(self.out, "{}: {} ({})", changed_label, item, detail)?,
            Outcome::Skipped(reason) => writeln!(self.out, "Skipped: {} - {}", item, reason)?,
            Outcome::Warning(message) => writeln!(self.out, "Warning: {} - {}", item, message)?,
            Outcome::Error(message) => writeln!(self.out, "Error: {} - {}", item, message)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatterFixError;
    use std::io::Cursor;

    struct FakeTask {
        items: Vec<PathBuf>,
        dry_run: bool,
        processed: Vec<PathBuf>,
    }

    impl FakeTask {
        fn new(dry_run: bool) -> Self {
            Self {
                items: vec!["a".into(), "b".into(), "c".into()],
                dry_run,
                processed: Vec::new(),
            }
        }
    }

    impl Task for FakeTask {
        fn title(&self) -> String {
            "Fake run".to_string()
        }

        fn explanation(&self) -> Vec<String> {
            vec!["This does fake things.".to_string()]
        }

        fn is_dry_run(&self) -> bool {
            self.dry_run
        }

        fn items(&mut self) -> Result<Vec<PathBuf>> {
            Ok(self.items.clone())
        }

        fn process(&mut self, item: &Path) -> Result<Outcome> {
            self.processed.push(item.to_path_buf());
            match item.to_str() {
                Some("a") => Ok(Outcome::Changed("done".into())),
                Some("b") => Ok(Outcome::Skipped("nothing to do".into())),
                Some("gone") => Err(MatterFixError::root_not_found("gone")),
                _ => Err(MatterFixError::validation("boom")),
            }
        }
    }

    #[test]
    fn test_is_yes() {
        for answer in ["y", "Y\n", " yes ", "YES\r\n"] {
            assert!(is_yes(answer), "{:?}", answer);
        }
        for answer in ["", "n", "no", "yep", "\n"] {
            assert!(!is_yes(answer), "{:?}", answer);
        }
    }

    #[test]
    fn test_ask_reads_one_line() {
        let mut input = Cursor::new("yes\nno\n");
        let mut output = Vec::new();
        assert!(ask("Continue?", &mut input, &mut output).unwrap());
        assert_eq!(String::from_utf8(output).unwrap(), "Continue? (y/N): ");
    }

    #[test]
    fn test_declined_confirmation_processes_nothing() {
        let mut task = FakeTask::new(false);
        let mut runner = BatchRunner::new(RunnerConfig::default(), |_: &str| false, Vec::new());
        let status = runner.run(&mut task).unwrap();

        assert_eq!(status, RunStatus::Cancelled);
        assert!(task.processed.is_empty());
        let out = String::from_utf8(runner.into_output()).unwrap();
        assert!(out.contains("Fake run cancelled."));
    }

    #[test]
    fn test_errors_do_not_abort_batch() {
        let mut task = FakeTask::new(false);
        let mut runner = BatchRunner::new(RunnerConfig::default(), AssumeYes, Vec::new());
        let status = runner.run(&mut task).unwrap();

        let report = status.report().unwrap();
        assert_eq!(report.items.len(), 3);
        assert_eq!(report.items[2].outcome, Outcome::Error("Validation error: boom".into()));
        let out = String::from_utf8(runner.into_output()).unwrap();
        assert!(out.contains("Updated: a (done)"));
        assert!(out.contains("Skipped: b - nothing to do"));
        assert!(out.contains("Error: c - Validation error: boom"));
        assert!(out.contains("Items processed: 3"));
    }

    #[test]
    fn test_unrecoverable_error_aborts_batch() {
        let mut task = FakeTask::new(false);
        task.items = vec!["a".into(), "gone".into(), "b".into()];
        let mut runner = BatchRunner::new(RunnerConfig::default(), AssumeYes, Vec::new());
        let err = runner.run(&mut task).unwrap_err();

        assert!(matches!(err, MatterFixError::RootNotFound { .. }));
        assert_eq!(task.processed, vec![PathBuf::from("a"), PathBuf::from("gone")]);
    }

    #[test]
    fn test_dry_run_never_prompts() {
        let mut task = FakeTask::new(true);
        let mut asked = false;
        let mut runner = BatchRunner::new(
            RunnerConfig::default(),
            |_: &str| {
                asked = true;
                false
            },
            Vec::new(),
        );
        let status = runner.run(&mut task).unwrap();
        drop(runner);

        assert!(!asked);
        assert_eq!(status.report().unwrap().items.len(), 3);
    }

    #[test]
    fn test_json_format_prints_only_report() {
        let mut task = FakeTask::new(true);
        let config = RunnerConfig {
            format: ReportFormat::Json,
        };
        let mut runner = BatchRunner::new(config, AssumeYes, Vec::new());
        runner.run(&mut task).unwrap();

        let out = runner.into_output();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["processed"], 3);
    }
}
