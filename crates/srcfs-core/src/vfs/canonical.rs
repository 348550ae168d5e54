//! Canonical virtual paths
//!
//! Every host path that enters srcfs is turned into a [`CanonicalPath`]:
//!
//! - absolute, or rooted at `/` when it lives on the same root as the working
//!   directory (the drive letter is dropped so names stay portable)
//! - `/` is the only separator, repeated separators are squashed
//! - no `.` or `..` segments; `..` cannot climb above the root
//! - a trailing `/` when the input explicitly named a directory (it ended in
//!   a separator, `.` or `..`), except for the bare root `/`
//!
//! Symlinks are only resolved on request, and then only for the part of the
//! path that exists. The working directory used to anchor relative input is
//! always fully resolved.

use super::host::{HostFilesystem, OsFilesystem};
use super::root::{is_unc_path, split_root, to_generic, Root};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// A path in normalized virtual form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path as a host path. Rooted-at-`/` paths resolve on the working
    /// directory's root.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Whether the path was explicitly written as a directory
    pub fn is_directory(&self) -> bool {
        self.0.ends_with('/')
    }

    pub(crate) fn root(&self) -> Root {
        split_root(&self.0).0
    }

    /// Non-empty segments after the root
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        split_root(&self.0).1.split('/').filter(|s| !s.is_empty())
    }

    pub fn has_dot_dot_segments(&self) -> bool {
        self.segments().any(|s| s == "..")
    }

    /// Textually append `name` below this path.
    ///
    /// Leading separators in `name` do not make it absolute: `/x` joined with
    /// `/etc/passwd` is `/x/etc/passwd`. The result is not canonical yet.
    pub fn join(&self, name: &str) -> String {
        join_generic(&self.0, name)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Canonicalize `path` against the host filesystem.
pub fn canonicalize(path: impl AsRef<Path>, resolve_symlinks: bool) -> CanonicalPath {
    canonicalize_with(&OsFilesystem, path, resolve_symlinks)
}

/// Canonicalize `path` using the given filesystem.
///
/// Never fails. The path does not have to exist; when `resolve_symlinks` is
/// set, every prefix that does exist is resolved and missing segments are
/// normalized lexically. The result then contains no symlink that the
/// host could still follow.
pub fn canonicalize_with<F>(fs: &F, path: impl AsRef<Path>, resolve_symlinks: bool) -> CanonicalPath
where
    F: HostFilesystem + ?Sized,
{
    let work_dir = canonical_work_dir(fs);
    let absolute = absolutize(&to_generic(path.as_ref()), &work_dir);

    let mut normalized = if resolve_symlinks {
        weakly_canonical(fs, &absolute)
    } else {
        Lexical::parse(&absolute)
    };

    if !is_unc_path(&normalized.root.name) && normalized.root == work_dir.root {
        normalized.root = Root::slash();
    }

    normalized.drop_leading_dot_dots();
    debug_assert!(
        !normalized.segments.iter().any(|s| s == ".."),
        "canonical path still has `..` segments: {:?}",
        normalized
    );

    CanonicalPath(normalized.to_generic_string())
}

/// Lexically normalized path split into root and segments
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lexical {
    root: Root,
    segments: Vec<String>,
    directory: bool,
}

impl Lexical {
    fn parse(generic: &str) -> Self {
        let (root, rest) = split_root(generic);
        let mut segments: Vec<String> = Vec::new();

        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.last().is_some_and(|s| s != "..") {
                        segments.pop();
                    } else {
                        segments.push("..".to_string());
                    }
                }
                name => segments.push(name.to_string()),
            }
        }

        Self {
            root,
            segments,
            directory: denotes_directory(rest),
        }
    }

    /// A path cannot go above its own root: `/../../x` is `/x`.
    fn drop_leading_dot_dots(&mut self) {
        let run = self.segments.iter().take_while(|s| *s == "..").count();
        self.segments.drain(..run);
    }

    fn to_generic_string(&self) -> String {
        let mut out = self.root.to_generic_string();
        out.push_str(&self.segments.join("/"));
        if self.directory && !self.segments.is_empty() {
            out.push('/');
        }
        out
    }
}

fn denotes_directory(relative: &str) -> bool {
    if relative.is_empty() {
        return false;
    }
    relative.ends_with('/') || matches!(relative.rsplit('/').next(), Some(".") | Some(".."))
}

fn join_generic(base: &str, tail: &str) -> String {
    let tail = tail.trim_start_matches('/');
    if base.is_empty() {
        tail.to_string()
    } else if base.ends_with('/') {
        format!("{base}{tail}")
    } else {
        format!("{base}/{tail}")
    }
}

/// The working directory with all symlinks resolved.
///
/// Unix hands back an already resolved directory while Windows does not, so
/// it is resolved explicitly everywhere.
fn canonical_work_dir<F>(fs: &F) -> Lexical
where
    F: HostFilesystem + ?Sized,
{
    match fs.current_dir() {
        Ok(dir) => weakly_canonical(fs, &to_generic(&dir)),
        Err(e) => {
            warn!("Cannot determine working directory, anchoring at /: {}", e);
            Lexical::parse("/")
        }
    }
}

fn absolutize(generic: &str, work_dir: &Lexical) -> String {
    let base = work_dir.to_generic_string();
    if generic.is_empty() {
        return base;
    }

    let (root, rest) = split_root(generic);
    if root.is_empty() {
        return join_generic(&base, generic);
    }
    if !cfg!(windows) || (!root.name.is_empty() && root.has_directory) {
        return generic.to_string();
    }

    // Windows: only half of the root is present
    if root.has_directory {
        format!("{}{}", work_dir.root.name, generic)
    } else if root.name == work_dir.root.name {
        join_generic(&base, rest)
    } else {
        format!("{}/{}", root.name, rest)
    }
}

/// Resolve symlinks in every existing prefix of `absolute`, normalizing the
/// missing parts lexically.
///
/// Segments are walked one at a time so that a `..` following a missing
/// segment cannot bring a later symlink back into the path unresolved:
/// `missing/../link` resolves `link` just like `link` does.
fn weakly_canonical<F>(fs: &F, absolute: &str) -> Lexical
where
    F: HostFilesystem + ?Sized,
{
    let (root, rest) = split_root(absolute);
    let mut resolved = Lexical {
        root,
        segments: Vec::new(),
        directory: false,
    };

    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Cannot climb above the root
                resolved.segments.pop();
            }
            name => {
                resolved.segments.push(name.to_string());
                let head = resolved.to_generic_string();
                if !fs.exists(Path::new(&head)) {
                    continue;
                }
                // An unresolvable link (a loop) stays as written
                if let Ok(path) = fs.canonicalize(Path::new(&head)) {
                    resolved = Lexical::parse(&to_generic(&path));
                }
            }
        }
    }

    resolved.directory = denotes_directory(rest);
    resolved
}
