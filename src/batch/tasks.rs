//! The four maintenance tasks, expressed as [`Task`]s for the batch runner

use crate::batch::report::{Outcome, Report};
use crate::batch::runner::Task;
use crate::core::edit::{Edit, EditOutcome, FrontMatterEditor};
use crate::core::restructure::{PlanAction, PostDirectory, RestructureConfig, Restructurer};
use crate::error::{MatterFixError, Result};
use crate::io::{read_to_string, resolve_files, write_atomic, Relocator};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Frontmatter editing settings
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Posts directory to search for markdown files
    pub root: PathBuf,
    /// Report changes without writing files
    pub dry_run: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(crate::DEFAULT_POSTS_DIR),
            dry_run: false,
        }
    }
}

/// Applies one [`Edit`] to every markdown file under the posts root
pub struct EditTask {
    edit: Edit,
    config: EditorConfig,
    editor: FrontMatterEditor,
}

impl EditTask {
    pub fn new(edit: Edit, config: EditorConfig) -> Result<Self> {
        Ok(Self {
            edit,
            config,
            editor: FrontMatterEditor::new()?,
        })
    }
}

impl Task for EditTask {
    fn title(&self) -> String {
        match self.edit {
            Edit::InsertLayout { .. } => "Layout addition",
            Edit::AddDefaultTag => "Tag addition",
            Edit::CategoriesToTags => "Categories to tags conversion",
        }
        .to_string()
    }

    fn explanation(&self) -> Vec<String> {
        let what = match &self.edit {
            Edit::InsertLayout { layout } => format!(
                "This will add 'layout: {}' to every post that has no layout.",
                layout
            ),
            Edit::AddDefaultTag => {
                "This will add 'tags: post' to posts that don't have any tags.".to_string()
            }
            Edit::CategoriesToTags => {
                "This will change 'categories: - \"portfolio\"' to 'tags: portfolio'.".to_string()
            }
        };
        let mut lines = vec![what];
        lines.push(format!(
            "Markdown files under {} are rewritten in place.",
            self.config.root.display()
        ));
        if self.config.dry_run {
            lines.push("DRY RUN - no files will be modified.".to_string());
        }
        lines
    }

    fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    fn items(&mut self) -> Result<Vec<PathBuf>> {
        resolve_files(&self.config.root)
    }

    fn process(&mut self, item: &Path) -> Result<Outcome> {
        let content = read_to_string(item)?;
        match self.editor.apply(&self.edit, &content) {
            EditOutcome::Changed(updated) => {
                if self.config.dry_run {
                    debug!("{}", line_diff(item, &content, &updated));
                } else {
                    write_atomic(item, &updated)?;
                }
                Ok(Outcome::Changed(self.edit.change_description()))
            }
            EditOutcome::Skipped(reason) => Ok(Outcome::Skipped(reason.to_string())),
        }
    }
}

/// Moves posts into day directories
pub struct RestructureTask<R> {
    root: PathBuf,
    restructurer: Restructurer<R>,
    posts: HashMap<PathBuf, PostDirectory>,
}

impl<R: Relocator> RestructureTask<R> {
    pub fn new(root: impl Into<PathBuf>, config: RestructureConfig, relocator: R) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            restructurer: Restructurer::new(config, relocator)?,
            posts: HashMap::new(),
        })
    }
}

impl<R: Relocator> Task for RestructureTask<R> {
    fn title(&self) -> String {
        "Restructuring".to_string()
    }

    fn explanation(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "This will move {root}/YYYY/MM/post-slug/ into {root}/YYYY/MM/DD/post-slug/.",
            root = self.root.display()
        )];
        if self.is_dry_run() {
            lines.push("DRY RUN - no actual changes will be made!".to_string());
        } else {
            lines.push("Make sure you have a backup or Git commit before proceeding!".to_string());
        }
        lines
    }

    fn is_dry_run(&self) -> bool {
        self.restructurer.config().dry_run
    }

    fn items(&mut self) -> Result<Vec<PathBuf>> {
        let posts = self.restructurer.find_posts(&self.root)?;
        let items = posts.iter().map(|p| p.path.clone()).collect();
        self.posts = posts.into_iter().map(|p| (p.path.clone(), p)).collect();
        Ok(items)
    }

    fn process(&mut self, item: &Path) -> Result<Outcome> {
        let post = self.posts.get(item).ok_or_else(|| {
            MatterFixError::validation(format!("{} is not a known post", item.display()))
        })?;
        let entry = self.restructurer.process(post)?;

        let outcome = match entry.action {
            PlanAction::Move { destination, date } => Outcome::Changed(format!(
                "{} → {} (date: {})",
                post.path.display(),
                destination.display(),
                date
            )),
            PlanAction::AlreadyCorrect { .. } => Outcome::Skipped("already correct".to_string()),
            PlanAction::MissingDate => Outcome::Warning(format!(
                "could not extract date from {}",
                post.index.display()
            )),
            PlanAction::Collision { destination } => Outcome::Warning(format!(
                "target already exists: {}",
                destination.display()
            )),
        };
        Ok(outcome)
    }

    fn changed_label(&self) -> &'static str {
        if self.is_dry_run() {
            "Would move"
        } else {
            "Moved"
        }
    }

    fn epilogue(&self, report: &Report) -> Vec<String> {
        if self.is_dry_run() {
            if report.summary().changed == 0 {
                return Vec::new();
            }
            return vec![
                "To actually make these changes, run:".to_string(),
                "  matterfix restructure".to_string(),
            ];
        }
        vec![
            "Next steps:".to_string(),
            "1. Review the changes above".to_string(),
            "2. Rebuild the site and check for errors".to_string(),
            "3. Check that URLs work with the new structure: /YYYY/MM/DD/post-slug/".to_string(),
            "4. Update the permalink configuration if needed".to_string(),
        ]
    }
}

/// Minimal unified-style diff for dry-run previews
fn line_diff(path: &Path, old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_middle = &old_lines[prefix..old_lines.len() - suffix];
    let new_middle = &new_lines[prefix..new_lines.len() - suffix];

    let mut diff = vec![
        format!("--- {}", path.display()),
        format!("+++ {}", path.display()),
        format!(
            "@@ -{},{} +{},{} @@",
            prefix + 1,
            old_middle.len(),
            prefix + 1,
            new_middle.len()
        ),
    ];
    diff.extend(old_middle.iter().map(|l| format!("-{}", l)));
    diff.extend(new_middle.iter().map(|l| format!("+{}", l)));
    diff.join("\n")
}
