//! Sandboxed source reader

use super::callback::{CallbackKind, ReadCallbackResult};
use crate::config::ReaderConfig;
use crate::error::{ReadError, Result};
use crate::sandbox::SandboxRegistry;
use crate::source::{SourceRegistry, STDIN_SOURCE_UNIT_NAME};
use crate::vfs::{
    canonicalize_with, is_path_prefix, strip_prefix_if_present, CanonicalPath, HostFilesystem,
    OsFilesystem,
};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FILE_SCHEME: &str = "file://";

/// Resolves source unit names to files inside the sandbox and keeps the
/// text of every source it has seen.
///
/// Not synchronized; wrap it in a [`SharedFileReader`](super::SharedFileReader)
/// to serve reads from several threads.
#[derive(Debug, Default)]
pub struct FileReader<F: HostFilesystem = OsFilesystem> {
    sandbox: SandboxRegistry<F>,
    sources: SourceRegistry,
}

impl FileReader<OsFilesystem> {
    pub fn new<I, A>(base_path: impl AsRef<Path>, include_paths: I, allowed_directories: A) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        A: IntoIterator,
        A::Item: Into<PathBuf>,
    {
        Self::with_filesystem(OsFilesystem, base_path, include_paths, allowed_directories)
    }

    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        Self::from_config_with_filesystem(OsFilesystem, config)
    }
}

impl<F: HostFilesystem> FileReader<F> {
    /// # Panics
    ///
    /// On the configuration errors described for [`SandboxRegistry`].
    pub fn with_filesystem<I, A>(
        fs: F,
        base_path: impl AsRef<Path>,
        include_paths: I,
        allowed_directories: A,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        A: IntoIterator,
        A::Item: Into<PathBuf>,
    {
        let mut sandbox = SandboxRegistry::with_filesystem(fs);
        sandbox.set_base_path(base_path);
        for include_path in include_paths {
            sandbox.add_include_path(include_path);
        }
        for allowed in allowed_directories {
            sandbox.allow_directory(allowed);
        }

        Self {
            sandbox,
            sources: SourceRegistry::new(),
        }
    }

    /// Build a reader from user-supplied configuration, reporting invalid
    /// settings as errors instead of panicking.
    pub fn from_config_with_filesystem(fs: F, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_filesystem(
            fs,
            &config.base_path,
            &config.include_paths,
            config.allowed_directories.iter().cloned(),
        ))
    }

    pub fn sandbox(&self) -> &SandboxRegistry<F> {
        &self.sandbox
    }

    pub fn set_base_path(&mut self, path: impl AsRef<Path>) {
        self.sandbox.set_base_path(path);
    }

    pub fn add_include_path(&mut self, path: impl AsRef<Path>) {
        self.sandbox.add_include_path(path);
    }

    pub fn allow_directory(&mut self, path: impl Into<PathBuf>) {
        self.sandbox.allow_directory(path);
    }

    pub fn source_units(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Store `source` under the source unit name of `cli_path`
    pub fn set_source(&mut self, cli_path: impl AsRef<Path>, source: impl Into<String>) {
        let name = self.cli_path_to_source_unit_name(cli_path);
        debug!("Injecting source {:?}", name);
        self.sources.insert(name, source);
    }

    pub fn set_stdin(&mut self, source: impl Into<String>) {
        self.sources.insert(STDIN_SOURCE_UNIT_NAME, source);
    }

    /// Replace all known sources
    pub fn set_sources(&mut self, sources: SourceRegistry) {
        self.sources = sources;
    }

    /// Logical name of a path given on the command line.
    ///
    /// The first of base path and include paths that contains the path is
    /// stripped from it; otherwise the canonical absolute path is the name.
    /// Symlinks are not resolved so names do not depend on link targets.
    pub fn cli_path_to_source_unit_name(&self, cli_path: impl AsRef<Path>) -> String {
        let normalized = canonicalize_with(self.sandbox.filesystem(), cli_path, false);

        // Several prefixes may match; the first one wins
        self.sandbox
            .naming_prefixes()
            .iter()
            .find(|prefix| is_path_prefix(prefix, &normalized))
            .map(|prefix| strip_prefix_if_present(prefix, &normalized))
            .unwrap_or_else(|| normalized.into_string())
    }

    /// Serve a read callback request.
    ///
    /// Every failure to produce the file is reported through the returned
    /// value. On success the content is recorded under `source_unit_name`
    /// exactly as requested.
    ///
    /// # Panics
    ///
    /// If `kind` is not [`CallbackKind::ReadFile`]; that is a bug in the
    /// caller, not a condition to report back.
    pub fn read_file(&mut self, kind: &str, source_unit_name: &str) -> ReadCallbackResult {
        assert!(
            kind == CallbackKind::ReadFile.as_str(),
            "ReadFile callback used as callback kind {}",
            kind
        );

        let stripped = source_unit_name
            .strip_prefix(FILE_SCHEME)
            .unwrap_or(source_unit_name);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.resolve_and_read(stripped)))
            .unwrap_or(Err(ReadError::Unknown));

        match outcome {
            Ok(content) => {
                debug!("Read {} bytes for {:?}", content.len(), source_unit_name);
                self.sources.insert(source_unit_name, content.clone());
                ReadCallbackResult::Success(content)
            }
            Err(err) => {
                warn!("Cannot read {:?}: {}", source_unit_name, err);
                ReadCallbackResult::Failure(err.to_string())
            }
        }
    }

    /// The read callback as a closure over this reader
    pub fn reader(&mut self) -> impl FnMut(&str, &str) -> ReadCallbackResult + '_ {
        move |kind, source_unit_name| self.read_file(kind, source_unit_name)
    }

    fn resolve_and_read(&self, name: &str) -> std::result::Result<String, ReadError> {
        let fs = self.sandbox.filesystem();
        let candidate = self.resolve_candidate(name);
        debug!("Resolved {:?} to {:?}", name, candidate.as_str());

        if !self.sandbox.is_allowed(&candidate) {
            return Err(ReadError::OutsideAllowedDirectories);
        }

        let path = candidate.as_path();
        if !fs.exists(path) {
            return Err(ReadError::FileNotFound);
        }
        if !fs.is_file(path) {
            return Err(ReadError::NotAValidFile);
        }

        Ok(fs.read_to_string(path)?)
    }

    /// First existing file among the search roots, or the candidate under the
    /// last root when none exists.
    fn resolve_candidate(&self, name: &str) -> CanonicalPath {
        let fs = self.sandbox.filesystem();
        let under = |prefix: Option<&CanonicalPath>| {
            let joined = match prefix {
                Some(prefix) => prefix.join(name),
                None => name.to_string(),
            };
            canonicalize_with(fs, joined, true)
        };

        let mut candidate = under(self.sandbox.base_path());
        for include_path in self.sandbox.include_paths() {
            if fs.exists(candidate.as_path()) {
                break;
            }
            candidate = under(Some(include_path));
        }
        candidate
    }
}
