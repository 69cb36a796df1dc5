//! Moving post directories
//!
//! The restructurer never touches the filesystem for mutations directly; it
//! goes through a [`Relocator`], so moves can be simulated or made to fail.

use std::fs;
use std::io;
use std::path::Path;

/// Capability to create directories and move whole directory subtrees
pub trait Relocator {
    /// Create `dir` and any missing parents
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Move the subtree at `from` so it lives at `to`
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Relocator backed by `std::fs::rename`.
///
/// Rename is atomic within one filesystem. Moves across filesystems fail
/// with the OS error rather than falling back to copy-and-delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRelocator;

impl Relocator for FsRelocator {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

impl<R: Relocator + ?Sized> Relocator for &R {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        (**self).ensure_dir(dir)
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).relocate(from, to)
    }
}
