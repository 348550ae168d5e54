//! Root handling for generic (forward-slash) path strings
//!
//! Paths are parsed as strings rather than through `std::path::Component`
//! because std collapses a leading `//host` into a plain root directory on
//! Unix, which would make UNC-style paths indistinguishable from local ones.

use std::path::Path;

/// Root portion of a path: an optional root name (`C:`, `//host`) followed by
/// an optional root directory separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Root {
    pub(crate) name: String,
    pub(crate) has_directory: bool,
}

impl Root {
    /// The portable root `/`
    pub(crate) fn slash() -> Self {
        Self {
            name: String::new(),
            has_directory: true,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_empty() && !self.has_directory
    }

    pub(crate) fn to_generic_string(&self) -> String {
        let mut out = self.name.clone();
        if self.has_directory {
            out.push('/');
        }
        out
    }
}

/// Convert a host path into a string using `/` as the only separator.
///
/// Non UTF-8 components are replaced lossily.
pub(crate) fn to_generic(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

/// Split a generic path into its root and the remaining relative part.
///
/// Separators between the root and the first segment are consumed.
pub(crate) fn split_root(generic: &str) -> (Root, &str) {
    let name_len = root_name_len(generic);
    let name = &generic[..name_len];
    let after_name = &generic[name_len..];
    let rest = after_name.trim_start_matches('/');

    let root = Root {
        name: name.to_string(),
        has_directory: rest.len() != after_name.len(),
    };
    (root, rest)
}

fn root_name_len(generic: &str) -> usize {
    let bytes = generic.as_bytes();

    // `//host` but not `/`, `///` or a bare `//`
    if bytes.len() > 2 && bytes[0] == b'/' && bytes[1] == b'/' && bytes[2] != b'/' {
        return generic[2..].find('/').map_or(generic.len(), |end| end + 2);
    }

    if cfg!(windows) && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return 2;
    }

    0
}

/// Whether a root name denotes a UNC-style network location.
///
/// On every platform a root name made of two forward slashes followed by a
/// host name counts. On Windows two backslashes count as well; they only reach
/// this check when a root name is taken from a native path without
/// converting it to generic form first.
pub fn is_unc_path(root_name: &str) -> bool {
    let name = root_name.as_bytes();
    if name.len() < 2 {
        return false;
    }

    let shape = name.len() == 2 || name[2] != name[1];
    let forward = name[0] == b'/' && name[1] == b'/';
    #[cfg(windows)]
    let backward = name[0] == b'\\' && name[1] == b'\\';
    #[cfg(not(windows))]
    let backward = false;

    shape && (forward || backward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_root() {
        let (root, rest) = split_root("/a/b");
        assert_eq!(root, Root::slash());
        assert_eq!(rest, "a/b");

        let (root, rest) = split_root("///a");
        assert_eq!(root, Root::slash());
        assert_eq!(rest, "a");
    }

    #[test]
    fn test_split_relative() {
        let (root, rest) = split_root("a/b/");
        assert!(root.is_empty());
        assert_eq!(rest, "a/b/");
    }

    #[test]
    fn test_split_unc_root() {
        let (root, rest) = split_root("//host/share/x");
        assert_eq!(root.name, "//host");
        assert!(root.has_directory);
        assert_eq!(rest, "share/x");

        let (root, rest) = split_root("//host");
        assert_eq!(root.name, "//host");
        assert!(!root.has_directory);
        assert_eq!(rest, "");
    }

    #[test]
    fn test_bare_double_slash_is_not_a_root_name() {
        let (root, rest) = split_root("//");
        assert_eq!(root, Root::slash());
        assert_eq!(rest, "");
    }

    #[cfg(windows)]
    #[test]
    fn test_split_drive_root() {
        let (root, rest) = split_root("C:/x/y");
        assert_eq!(root.name, "C:");
        assert!(root.has_directory);
        assert_eq!(rest, "x/y");
    }

    #[test]
    fn test_unc_detection() {
        assert!(is_unc_path("//host"));
        assert!(is_unc_path("//"));
        assert!(!is_unc_path("///"));
        assert!(!is_unc_path(""));
        assert!(!is_unc_path("/"));
        assert!(!is_unc_path("C:"));
    }

    #[cfg(windows)]
    #[test]
    fn test_unc_detection_backslashes() {
        assert!(is_unc_path("\\\\host"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_backslashes_are_not_unc_on_unix() {
        assert!(!is_unc_path("\\\\host"));
    }
}
