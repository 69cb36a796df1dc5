//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use matterfix::core::{DEFAULT_INDEX_FILE, DEFAULT_LAYOUT};
use matterfix::{ReportFormat, DEFAULT_POSTS_DIR};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "matterfix",
    version,
    about = "One-shot maintenance tasks for a static blog's posts tree",
    long_about = "matterfix rewrites frontmatter fields across every post (layout, tags, \
                  categories) and moves post directories into a YYYY/MM/DD hierarchy. \
                  Every destructive run asks for confirmation first."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Posts directory to operate on
    #[arg(long, global = true, default_value = DEFAULT_POSTS_DIR, value_name = "DIR")]
    pub root: PathBuf,

    /// Do not ask for confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Report output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a layout key to every post without one
    AddLayout(AddLayoutArgs),
    /// Add `tags: post` to posts without any tags
    AddTags(EditArgs),
    /// Replace `categories: - "portfolio"` with `tags: portfolio`
    CategoriesToTags(EditArgs),
    /// Move YYYY/MM/slug post directories into YYYY/MM/DD/slug
    Restructure(RestructureArgs),
}

/// Options shared by the frontmatter edits
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Report changes without modifying files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddLayoutArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Layout value to write
    #[arg(long, default_value = DEFAULT_LAYOUT)]
    pub layout: String,
}

#[derive(Args, Debug, Clone)]
pub struct RestructureArgs {
    /// Show the moves that would be made without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Name of the file that marks a post directory
    #[arg(long, default_value = DEFAULT_INDEX_FILE, value_name = "NAME")]
    pub index_file: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Per-item lines and a readable summary
    Human,
    /// JSON report
    Json,
    /// YAML report
    Yaml,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => ReportFormat::Human,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Yaml => ReportFormat::Yaml,
        }
    }
}
