//! Moving posts into day directories
//!
//! Posts live at `root/YYYY/MM/slug/index.md`. The restructurer moves each one
//! to `root/YYYY/MM/DD/slug/`, where `DD` comes from the post's own `date:`.
//! Posts already under a day directory are visited too, so a second run
//! reports them as already placed instead of silently skipping them.

use crate::core::post_date::{day_dir_name, parse_post_date, DateExtractor};
use crate::error::{MatterFixError, Result};
use crate::io::{child_dirs, read_to_string, Relocator};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default name of a post's index document
pub const DEFAULT_INDEX_FILE: &str = "index.md";

/// Restructurer settings
#[derive(Debug, Clone)]
pub struct RestructureConfig {
    /// File that marks a directory as a post and carries its date
    pub index_file: String,
    /// Compute and report moves without touching the filesystem
    pub dry_run: bool,
}

impl Default for RestructureConfig {
    fn default() -> Self {
        Self {
            index_file: DEFAULT_INDEX_FILE.to_string(),
            dry_run: false,
        }
    }
}

/// One post directory found in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDirectory {
    pub year: String,
    pub month: String,
    /// Day directory the post currently sits in, if any
    pub day: Option<String>,
    pub slug: String,
    /// The `YYYY/MM` directory the post belongs to
    pub month_dir: PathBuf,
    pub path: PathBuf,
    pub index: PathBuf,
}

impl PostDirectory {
    /// Where the post belongs for a given day directory name
    pub fn target_for(&self, day: &str) -> PathBuf {
        self.month_dir.join(day).join(&self.slug)
    }
}

/// What the restructurer decided for one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Post must move to `destination`
    Move { destination: PathBuf, date: NaiveDate },
    /// Post already sits in the day directory matching its date
    AlreadyCorrect { date: NaiveDate },
    /// No recognizable `date:` in the index document
    MissingDate,
    /// Something already exists at the destination
    Collision { destination: PathBuf },
}

/// A post paired with the action decided for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub post: PostDirectory,
    pub action: PlanAction,
}

/// Moves decided earlier in a run.
///
/// Dry runs never touch the disk, so later posts are checked against this
/// instead: a destination claimed by an earlier move is occupied, and a path
/// under an earlier move's source is free. Apply runs record the same moves,
/// which keeps both modes deciding identically.
#[derive(Debug, Default)]
pub struct MoveLedger {
    claimed: HashSet<PathBuf>,
    vacated: Vec<PathBuf>,
}

impl MoveLedger {
    /// Whether `path` is taken once every recorded move has happened
    pub fn is_occupied(&self, path: &Path) -> bool {
        if self.claimed.contains(path) {
            return true;
        }
        path.exists() && !self.vacated.iter().any(|source| path.starts_with(source))
    }

    pub fn record(&mut self, source: &Path, destination: &Path) {
        self.vacated.push(source.to_path_buf());
        self.claimed.insert(destination.to_path_buf());
    }
}

pub struct Restructurer<R> {
    config: RestructureConfig,
    dates: DateExtractor,
    relocator: R,
    ledger: MoveLedger,
}

impl<R: Relocator> Restructurer<R> {
    pub fn new(config: RestructureConfig, relocator: R) -> Result<Self> {
        Ok(Self {
            config,
            dates: DateExtractor::new()?,
            relocator,
            ledger: MoveLedger::default(),
        })
    }

    pub fn config(&self) -> &RestructureConfig {
        &self.config
    }

    /// Every post directory under `root`, in path order.
    ///
    /// Years are 4-digit directories, months 2-digit ones. Inside a month, a
    /// directory holding the index file is a post; a 2-digit directory without
    /// one is a day directory whose children with an index file are posts.
    /// Anything else is ignored.
    pub fn find_posts(&self, root: &Path) -> Result<Vec<PostDirectory>> {
        if !root.is_dir() {
            return Err(MatterFixError::root_not_found(root));
        }

        let mut posts = Vec::new();
        for year_dir in child_dirs(root)?.into_iter().filter(|d| is_digits(d, 4)) {
            let year = dir_name(&year_dir);
            debug!("Processing year: {}", year);

            for month_dir in child_dirs(&year_dir)?.into_iter().filter(|d| is_digits(d, 2)) {
                let month = dir_name(&month_dir);
                debug!("Processing month: {}/{}", year, month);

                for candidate in child_dirs(&month_dir)? {
                    let index = candidate.join(&self.config.index_file);
                    if index.is_file() {
                        posts.push(PostDirectory {
                            year: year.clone(),
                            month: month.clone(),
                            day: None,
                            slug: dir_name(&candidate),
                            month_dir: month_dir.clone(),
                            path: candidate,
                            index,
                        });
                    } else if is_digits(&candidate, 2) {
                        let day = dir_name(&candidate);
                        for post_dir in child_dirs(&candidate)? {
                            let index = post_dir.join(&self.config.index_file);
                            if index.is_file() {
                                posts.push(PostDirectory {
                                    year: year.clone(),
                                    month: month.clone(),
                                    day: Some(day.clone()),
                                    slug: dir_name(&post_dir),
                                    month_dir: month_dir.clone(),
                                    path: post_dir,
                                    index,
                                });
                            }
                        }
                    }
                }
            }
        }
        posts.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(posts)
    }

    /// Decide what to do with `post` without changing anything.
    ///
    /// A post is already correct only when it sits in a day directory named
    /// after its date. The parent directory name alone is not compared, so a
    /// month-level post whose day equals its month (`2024/03/x` dated
    /// `2024-03-03`) still moves. A destination taken on disk or by an
    /// earlier move of this run is a collision.
    ///
    /// Errors are per-post: an unreadable index or an impossible date.
    pub fn plan(&self, post: &PostDirectory) -> Result<PlanEntry> {
        let content = read_to_string(&post.index)?;
        let Some(date_str) = self.dates.extract(&content) else {
            return Ok(self.entry(post, PlanAction::MissingDate));
        };
        let date = parse_post_date(&date_str)?;
        let day = day_dir_name(date);

        if post.day.as_deref() == Some(day.as_str()) {
            return Ok(self.entry(post, PlanAction::AlreadyCorrect { date }));
        }

        let destination = post.target_for(&day);
        if self.ledger.is_occupied(&destination) {
            return Ok(self.entry(post, PlanAction::Collision { destination }));
        }
        Ok(self.entry(post, PlanAction::Move { destination, date }))
    }

    /// Carry out a planned move. Anything but [`PlanAction::Move`] is a no-op.
    pub fn apply(&self, entry: &PlanEntry) -> Result<()> {
        let PlanAction::Move { destination, .. } = &entry.action else {
            return Ok(());
        };
        let source = &entry.post.path;
        if let Some(day_dir) = destination.parent() {
            self.relocator
                .ensure_dir(day_dir)
                .map_err(|e| MatterFixError::relocate(source, destination, e))?;
        }
        self.relocator
            .relocate(source, destination)
            .map_err(|e| MatterFixError::relocate(source, destination, e))
    }

    /// Plan `post` and, unless this is a dry run, apply the plan.
    ///
    /// Moves are recorded so later posts in the same run see them.
    pub fn process(&mut self, post: &PostDirectory) -> Result<PlanEntry> {
        let entry = self.plan(post)?;
        if !self.config.dry_run {
            self.apply(&entry)?;
        }
        if let PlanAction::Move { destination, .. } = &entry.action {
            self.ledger.record(&entry.post.path, destination);
        }
        Ok(entry)
    }

    fn entry(&self, post: &PostDirectory, action: PlanAction) -> PlanEntry {
        PlanEntry {
            post: post.clone(),
            action,
        }
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_digits(path: &Path, len: usize) -> bool {
    let name = dir_name(path);
    name.len() == len && name.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::FsRelocator;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(root: &Path, rel: &str, date_line: &str) -> PathBuf {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("index.md"),
            format!("---\ntitle: Post\n{}\n---\nBody\n", date_line),
        )
        .unwrap();
        dir
    }

    fn restructurer(dry_run: bool) -> Restructurer<FsRelocator> {
        let config = RestructureConfig {
            dry_run,
            ..Default::default()
        };
        Restructurer::new(config, FsRelocator).unwrap()
    }

    #[test]
    fn test_find_posts_filters_levels() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_post(root, "2024/03/hello", "date: 2024-03-07");
        write_post(root, "2024/03/09/placed", "date: 2024-03-09");
        write_post(root, "2024/3/short-month", "date: 2024-03-01");
        write_post(root, "24/03/short-year", "date: 2024-03-01");
        write_post(root, ".drafts/03/hidden", "date: 2024-03-01");
        write_post(root, "2024/03/.hidden", "date: 2024-03-01");
        fs::create_dir_all(root.join("2024/03/assets")).unwrap();

        let posts = restructurer(true).find_posts(root).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| (p.slug.as_str(), p.day.clone())).collect();
        assert_eq!(
            slugs,
            vec![("placed", Some("09".to_string())), ("hello", None)]
        );
        assert_eq!(posts[1].month_dir, root.join("2024/03"));
    }

    #[test]
    fn test_plan_move() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_post(root, "2024/03/hello-world", "date: 2024-03-07");

        let r = restructurer(true);
        let posts = r.find_posts(root).unwrap();
        let entry = r.plan(&posts[0]).unwrap();
        assert_eq!(
            entry.action,
            PlanAction::Move {
                destination: root.join("2024/03/07/hello-world"),
                date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            }
        );
    }

    #[test]
    fn test_month_named_like_day_still_moves() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_post(root, "2024/03/coincidence", "date: 2024-03-03");

        let r = restructurer(true);
        let posts = r.find_posts(root).unwrap();
        assert!(matches!(r.plan(&posts[0]).unwrap().action, PlanAction::Move { .. }));
    }

    #[test]
    fn test_plan_wrong_day_directory_moves_to_right_one() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_post(root, "2024/03/05/misplaced", "date: 2024/03/21");

        let r = restructurer(true);
        let posts = r.find_posts(root).unwrap();
        match r.plan(&posts[0]).unwrap().action {
            PlanAction::Move { destination, .. } => {
                assert_eq!(destination, root.join("2024/03/21/misplaced"))
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_plan_missing_and_invalid_dates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_post(root, "2024/03/a-no-date", "published: yes");
        write_post(root, "2024/03/b-bad-date", "date: 2024-02-31");

        let r = restructurer(true);
        let posts = r.find_posts(root).unwrap();
        assert_eq!(r.plan(&posts[0]).unwrap().action, PlanAction::MissingDate);
        assert!(matches!(
            r.plan(&posts[1]).unwrap_err(),
            MatterFixError::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_dry_run_process_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let post = write_post(root, "2024/03/hello", "date: 2024-03-07");

        let mut r = restructurer(true);
        let posts = r.find_posts(root).unwrap();
        let entry = r.process(&posts[0]).unwrap();
        assert!(matches!(entry.action, PlanAction::Move { .. }));
        assert!(post.exists());
        assert!(!root.join("2024/03/07").exists());
    }

    #[test]
    fn test_process_moves_post() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let post = write_post(root, "2024/03/hello", "date: 2024-03-07");

        let mut r = restructurer(false);
        let posts = r.find_posts(root).unwrap();
        r.process(&posts[0]).unwrap();
        assert!(!post.exists());
        assert!(root.join("2024/03/07/hello/index.md").is_file());
    }

    #[test]
    fn test_same_slug_claims_destination_once() {
        for dry_run in [true, false] {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path();
            write_post(root, "2024/03/05/hello", "date: 2024-03-07");
            write_post(root, "2024/03/hello", "date: 2024-03-07");

            let mut r = restructurer(dry_run);
            let posts = r.find_posts(root).unwrap();
            let actions: Vec<_> = posts
                .iter()
                .map(|p| r.process(p).unwrap().action)
                .collect();
            let destination = root.join("2024/03/07/hello");
            assert!(matches!(&actions[0], PlanAction::Move { destination: d, .. } if *d == destination));
            assert_eq!(actions[1], PlanAction::Collision { destination });
        }
    }

    #[test]
    fn test_destination_freed_by_earlier_move() {
        for dry_run in [true, false] {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path();
            write_post(root, "2024/03/07/hello", "date: 2024-03-05");
            write_post(root, "2024/03/hello", "date: 2024-03-07");

            let mut r = restructurer(dry_run);
            let posts = r.find_posts(root).unwrap();
            let actions: Vec<_> = posts
                .iter()
                .map(|p| r.process(p).unwrap().action)
                .collect();
            assert!(matches!(&actions[0], PlanAction::Move { destination, .. } if *destination == root.join("2024/03/05/hello")));
            assert!(matches!(&actions[1], PlanAction::Move { destination, .. } if *destination == root.join("2024/03/07/hello")));
        }
    }

    #[test]
    fn test_ledger_occupancy() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let existing = write_post(root, "2024/03/hello", "date: 2024-03-07");

        let mut ledger = MoveLedger::default();
        assert!(ledger.is_occupied(&existing));
        assert!(!ledger.is_occupied(&root.join("2024/03/07/hello")));

        ledger.record(&existing, &root.join("2024/03/07/hello"));
        assert!(!ledger.is_occupied(&existing));
        assert!(!ledger.is_occupied(&existing.join("index.md")));
        assert!(ledger.is_occupied(&root.join("2024/03/07/hello")));
    }

    #[test]
    fn test_custom_index_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dir = root.join("2024/03/hello");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.md"), "date: 2024-03-07\n").unwrap();

        let config = RestructureConfig {
            index_file: "README.md".to_string(),
            dry_run: true,
        };
        let r = Restructurer::new(config, FsRelocator).unwrap();
        assert_eq!(r.find_posts(root).unwrap().len(), 1);
        assert!(restructurer(true).find_posts(root).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let err = restructurer(true)
            .find_posts(&temp_dir.path().join("_posts"))
            .unwrap_err();
        assert!(matches!(err, MatterFixError::RootNotFound { .. }));
    }
}
