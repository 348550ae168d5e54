//! Host filesystem access
//!
//! Everything srcfs asks of the operating system goes through
//! [`HostFilesystem`], so canonicalization and reads can be exercised against
//! a mock in tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem queries needed to canonicalize paths and serve reads
#[cfg_attr(test, mockall::automock)]
pub trait HostFilesystem {
    /// Current working directory of the process
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Strict canonicalization; fails when the path does not exist
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Whether something exists at `path`, including unresolvable symlinks
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` resolves to a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`HostFilesystem`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl HostFilesystem for OsFilesystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // dunce avoids `\\?\` verbatim prefixes on Windows
        dunce::canonicalize(path)
    }

    fn exists(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // dangling links are reported as missing
                false
            }
            // e.g. a symlink loop: the entry is there but cannot be followed
            Err(_) => fs::symlink_metadata(path).is_ok(),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
