//! Per-item outcomes and the run report built from them

use crate::error::Result;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Already-correct posts listed by name in the human summary before truncating
const LISTED_UNCHANGED_LIMIT: usize = 10;

/// Result of processing one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    /// The item was (or in a dry run, would be) changed
    Changed(String),
    /// Nothing to do, with the reason
    Skipped(String),
    /// Left alone because of a problem worth a look
    Warning(String),
    /// Processing the item failed
    Error(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Changed(m) | Self::Skipped(m) | Self::Warning(m) | Self::Error(m) => m,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// One processed item and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub item: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Output style for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Per-item lines and a readable summary
    #[default]
    Human,
    Json,
    Yaml,
}

/// Everything a batch run did, in processing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub task: String,
    pub dry_run: bool,
    pub items: Vec<ItemReport>,
}

/// Counts derived from a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub processed: usize,
    pub changed: usize,
    pub skipped: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} changed, {} skipped, {} warnings, {} errors",
            self.processed, self.changed, self.skipped, self.warnings, self.errors
        )
    }
}

impl Report {
    pub fn new(task: impl Into<String>, dry_run: bool) -> Self {
        Self {
            task: task.into(),
            dry_run,
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, item: impl Into<PathBuf>, outcome: Outcome) {
        self.items.push(ItemReport {
            item: item.into(),
            outcome,
        });
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            processed: self.items.len(),
            ..Default::default()
        };
        for entry in &self.items {
            match entry.outcome {
                Outcome::Changed(_) => summary.changed += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Warning(_) => summary.warnings += 1,
                Outcome::Error(_) => summary.errors += 1,
            }
        }
        summary
    }

    pub fn changed(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| i.outcome.is_changed())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Skipped(_)))
    }

    /// Warnings and errors, in processing order
    pub fn problems(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Warning(_) | Outcome::Error(_)))
    }

    /// Write the end-of-run summary in the requested format
    pub fn write_summary<W: Write>(&self, out: &mut W, format: ReportFormat) -> Result<()> {
        match format {
            ReportFormat::Human => self.write_human(out),
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &SerializedReport::from(self))?;
                writeln!(out)?;
                Ok(())
            }
            ReportFormat::Yaml => {
                let yaml = serde_yaml::to_string(&SerializedReport::from(self))?;
                write!(out, "{}", yaml)?;
                Ok(())
            }
        }
    }

    fn write_human<W: Write>(&self, out: &mut W) -> Result<()> {
        let summary = self.summary();
        let changed_verb = if self.dry_run { "would change" } else { "changed" };

        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(60))?;
        if self.dry_run {
            writeln!(out, "{} complete (dry run, nothing was modified)", self.task)?;
        } else {
            writeln!(out, "{} complete!", self.task)?;
        }
        writeln!(out, "Items processed: {}", summary.processed)?;
        writeln!(out, "Items {}: {}", changed_verb, summary.changed)?;
        writeln!(out, "Items skipped: {}", summary.skipped)?;
        writeln!(out, "Warnings: {}", summary.warnings)?;
        writeln!(out, "Errors: {}", summary.errors)?;

        if summary.changed > 0 {
            writeln!(out)?;
            writeln!(out, "Items that {}:", changed_verb)?;
            for entry in self.changed() {
                writeln!(out, "  {} ({})", entry.item.display(), entry.outcome.message())?;
            }
        }

        if summary.skipped > 0 {
            writeln!(out)?;
            writeln!(out, "Items that were skipped:")?;
            let skipped: Vec<_> = self.skipped().collect();
            for entry in skipped.iter().take(LISTED_UNCHANGED_LIMIT) {
                writeln!(out, "  {} - {}", entry.item.display(), entry.outcome.message())?;
            }
            if skipped.len() > LISTED_UNCHANGED_LIMIT {
                writeln!(out, "  ... and {} more", skipped.len() - LISTED_UNCHANGED_LIMIT)?;
            }
        }

        if summary.warnings + summary.errors > 0 {
            writeln!(out)?;
            writeln!(out, "Problems encountered:")?;
            for entry in self.problems() {
                let label = match entry.outcome {
                    Outcome::Error(_) => "error",
                    _ => "warning",
                };
                writeln!(
                    out,
                    "  {} [{}] {}",
                    entry.item.display(),
                    label,
                    entry.outcome.message()
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SerializedReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    summary: Summary,
}

impl<'a> From<&'a Report> for SerializedReport<'a> {
    fn from(report: &'a Report) -> Self {
        Self {
            report,
            summary: report.summary(),
        }
    }
}
