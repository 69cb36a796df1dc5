pub mod fs;
pub mod relocate;

pub use fs::{child_dirs, is_markdown, read_to_string, resolve_files, write_atomic};
pub use relocate::{FsRelocator, Relocator};
