//! Core logic, independent of how tasks are run
//!
//! - [`front_matter`]: locating the frontmatter block in a document
//! - [`edit`]: the frontmatter rewrites
//! - [`post_date`]: reading a post's declared date
//! - [`restructure`]: walking the posts tree and moving posts into day directories

pub mod edit;
pub mod front_matter;
pub mod post_date;
pub mod restructure;

pub use edit::{Edit, EditOutcome, FrontMatterEditor, SkipReason, DEFAULT_LAYOUT};
pub use front_matter::{closing_delimiter, Document, FrontMatterSpan};
pub use post_date::{day_dir_name, parse_post_date, DateExtractor};
pub use restructure::{
    MoveLedger, PlanAction, PlanEntry, PostDirectory, RestructureConfig, Restructurer,
    DEFAULT_INDEX_FILE,
};
