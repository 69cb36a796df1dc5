//! CLI command handlers that turn parsed arguments into batch runs

use crate::cli_bin::args::*;
use log::debug;
use matterfix::{
    AssumeYes, BatchRunner, Confirm, Edit, EditTask, EditorConfig, FsRelocator,
    RestructureConfig, RestructureTask, Result, RunStatus, RunnerConfig, StdinConfirm, Task,
};
use std::io::Write;
use std::path::PathBuf;

/// Execute the parsed command line, writing all output to `out`
pub fn execute<W: Write>(cli: Cli, out: W) -> Result<RunStatus> {
    debug!("Executing command: {:?}", cli.command);
    let runner_config = RunnerConfig {
        format: cli.format.into(),
    };
    let mut task = build_task(cli.command, cli.root)?;
    if cli.yes {
        run_task(task.as_mut(), runner_config, AssumeYes, out)
    } else {
        run_task(task.as_mut(), runner_config, StdinConfirm, out)
    }
}

fn run_task<C: Confirm, W: Write>(
    task: &mut dyn Task,
    config: RunnerConfig,
    confirm: C,
    out: W,
) -> Result<RunStatus> {
    BatchRunner::new(config, confirm, out).run(task)
}

fn build_task(command: Commands, root: PathBuf) -> Result<Box<dyn Task>> {
    let task: Box<dyn Task> = match command {
        Commands::AddLayout(args) => Box::new(edit_task(
            Edit::insert_layout(args.layout),
            root,
            &args.edit,
        )?),
        Commands::AddTags(args) => Box::new(edit_task(Edit::AddDefaultTag, root, &args)?),
        Commands::CategoriesToTags(args) => {
            Box::new(edit_task(Edit::CategoriesToTags, root, &args)?)
        }
        Commands::Restructure(args) => {
            let config = RestructureConfig {
                index_file: args.index_file,
                dry_run: args.dry_run,
            };
            Box::new(RestructureTask::new(root, config, FsRelocator)?)
        }
    };
    Ok(task)
}

fn edit_task(edit: Edit, root: PathBuf, args: &EditArgs) -> Result<EditTask> {
    EditTask::new(
        edit,
        EditorConfig {
            root,
            dry_run: args.dry_run,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use matterfix::Outcome;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_execute_add_tags_with_yes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("_posts");
        fs::create_dir_all(root.join("2024/03/hello")).unwrap();
        let index = root.join("2024/03/hello/index.md");
        fs::write(&index, "---\ntitle: Hello\n---\n").unwrap();

        let cli = Cli::try_parse_from([
            "matterfix".into(),
            "--root".into(),
            root.clone().into_os_string(),
            "-y".into(),
            "add-tags".into(),
        ])
        .unwrap();
        let mut out = Vec::new();
        let status = execute(cli, &mut out).unwrap();

        let report = status.report().unwrap();
        assert_eq!(report.items[0].outcome, Outcome::Changed("added tags: post".into()));
        assert_eq!(
            fs::read_to_string(&index).unwrap(),
            "---\ntitle: Hello\ntags: post\n---\n"
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Starting tag addition..."));
    }

    #[test]
    fn test_execute_restructure_dry_run_without_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("_posts");
        fs::create_dir_all(root.join("2024/03/hello")).unwrap();
        fs::write(root.join("2024/03/hello/index.md"), "date: 2024-03-07\n").unwrap();

        let cli = Cli::try_parse_from([
            "matterfix".into(),
            "--root".into(),
            root.clone().into_os_string(),
            "restructure".into(),
            "--dry-run".into(),
        ])
        .unwrap();
        let status = execute(cli, Vec::new()).unwrap();

        assert_eq!(status.report().unwrap().summary().changed, 1);
        assert!(root.join("2024/03/hello").exists());
    }

    #[test]
    fn test_execute_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "matterfix".into(),
            "--root".into(),
            temp_dir.path().join("missing").into_os_string(),
            "-y".into(),
            "categories-to-tags".into(),
        ])
        .unwrap();
        assert!(execute(cli, Vec::new()).is_err());
    }
}
