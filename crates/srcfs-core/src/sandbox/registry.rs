//! Search roots and allowed directories for source reads

use crate::vfs::{canonicalize_with, is_path_prefix, CanonicalPath, HostFilesystem, OsFilesystem};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sandbox configuration: where sources are searched for and which
/// directories reads may touch.
///
/// Configure it once before serving reads; afterwards only
/// [`allow_directory`](Self::allow_directory) may still add to it.
#[derive(Debug, Default)]
pub struct SandboxRegistry<F: HostFilesystem = OsFilesystem> {
    fs: F,
    /// Primary search root, `None` when configured empty
    base_path: Option<CanonicalPath>,
    /// Additional search roots in declaration order
    include_paths: Vec<CanonicalPath>,
    /// Explicitly allowed directories, lexically canonical. Symlinks are
    /// resolved on every check.
    allowed_directories: BTreeSet<CanonicalPath>,
}

impl SandboxRegistry<OsFilesystem> {
    pub fn new() -> Self {
        Self::with_filesystem(OsFilesystem)
    }
}

impl<F: HostFilesystem> SandboxRegistry<F> {
    pub fn with_filesystem(fs: F) -> Self {
        Self {
            fs,
            base_path: None,
            include_paths: Vec::new(),
            allowed_directories: BTreeSet::new(),
        }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Set the base path. An empty path clears it, which is only legal while
    /// there are no include paths.
    ///
    /// # Panics
    ///
    /// When clearing the base path while include paths are configured.
    pub fn set_base_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            assert!(
                self.include_paths.is_empty(),
                "empty base path cannot be combined with include paths"
            );
            info!("Clearing base path");
            self.base_path = None;
        } else {
            let canonical = canonicalize_with(&self.fs, path, false);
            info!("Setting base path: {:?}", canonical.as_str());
            self.base_path = Some(canonical);
        }
    }

    /// Append an include path after the existing ones.
    ///
    /// # Panics
    ///
    /// When no base path is set or `path` is empty.
    pub fn add_include_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(self.base_path.is_some(), "include paths require a base path");
        assert!(!path.as_os_str().is_empty(), "include path must not be empty");

        let canonical = canonicalize_with(&self.fs, path, false);
        info!("Adding include path: {:?}", canonical.as_str());
        self.include_paths.push(canonical);
    }

    /// Allow reads below `path`. Adding the same directory twice has no
    /// further effect.
    ///
    /// A relative `path` is anchored at the working directory of this call.
    ///
    /// # Panics
    ///
    /// When `path` is empty.
    pub fn allow_directory(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        assert!(!path.as_os_str().is_empty(), "allowed directory must not be empty");

        let mut canonical = canonicalize_with(&self.fs, &path, false);
        if canonical.is_directory() {
            // `/shared/` and `/shared` allow the same reads
            canonical = canonicalize_with(&self.fs, canonical.as_str().trim_end_matches('/'), false);
        }
        if self.allowed_directories.insert(canonical.clone()) {
            info!("Allowing directory: {:?}", canonical.as_str());
        }
    }

    pub fn base_path(&self) -> Option<&CanonicalPath> {
        self.base_path.as_ref()
    }

    pub fn include_paths(&self) -> &[CanonicalPath] {
        &self.include_paths
    }

    pub fn allowed_directories(&self) -> impl Iterator<Item = &CanonicalPath> + '_ {
        self.allowed_directories.iter()
    }

    /// Prefixes used to name sources: the base path (the working directory
    /// when empty) followed by the include paths.
    pub fn naming_prefixes(&self) -> Vec<CanonicalPath> {
        let base = match &self.base_path {
            Some(base) => base.clone(),
            None => canonicalize_with(&self.fs, ".", false),
        };

        std::iter::once(base)
            .chain(self.include_paths.iter().cloned())
            .collect()
    }

    /// Whether `candidate` lies inside an allowed directory, the base path
    /// (the working directory when empty) or an include path.
    ///
    /// Every directory is canonicalized with symlinks resolved at check time.
    pub fn is_allowed(&self, candidate: &CanonicalPath) -> bool {
        let base = self
            .base_path
            .as_ref()
            .map_or(Path::new("."), CanonicalPath::as_path);

        let allowed = self
            .allowed_directories
            .iter()
            .map(CanonicalPath::as_path)
            .chain(std::iter::once(base))
            .chain(self.include_paths.iter().map(CanonicalPath::as_path))
            .any(|dir| is_path_prefix(&canonicalize_with(&self.fs, dir, true), candidate));

        debug!("Sandbox check for {:?}: {}", candidate.as_str(), allowed);
        allowed
    }
}
