//! Prefix relationships between canonical paths

use super::canonical::CanonicalPath;

/// Whether `path` lies strictly inside `prefix`.
///
/// A trailing directory marker on `prefix` is ignored. A path is never a
/// prefix of itself.
pub fn is_path_prefix(prefix: &CanonicalPath, path: &CanonicalPath) -> bool {
    remainder(prefix, path).is_some()
}

/// `path` relative to `prefix` if it lies inside it, otherwise `path` as is.
pub fn strip_prefix_if_present(prefix: &CanonicalPath, path: &CanonicalPath) -> String {
    match remainder(prefix, path) {
        Some(segments) => {
            let mut stripped = segments.join("/");
            if path.is_directory() {
                stripped.push('/');
            }
            debug_assert!(!stripped.is_empty() && !stripped.starts_with(".."));
            stripped
        }
        None => path.as_str().to_string(),
    }
}

fn remainder<'a>(prefix: &CanonicalPath, path: &'a CanonicalPath) -> Option<Vec<&'a str>> {
    debug_assert!(!prefix.as_str().is_empty() && !path.as_str().is_empty());
    debug_assert!(!prefix.has_dot_dot_segments() && !path.has_dot_dot_segments());

    if prefix.root() != path.root() {
        return None;
    }

    let mut segments = path.segments();
    for expected in prefix.segments() {
        if segments.next() != Some(expected) {
            return None;
        }
    }

    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::canonical::canonicalize;

    fn path(p: &str) -> CanonicalPath {
        canonicalize(p, false)
    }

    #[test]
    fn test_descendants_match() {
        assert!(is_path_prefix(&path("/project"), &path("/project/a.sol")));
        assert!(is_path_prefix(&path("/project/"), &path("/project/a.sol")));
        assert!(is_path_prefix(&path("/project"), &path("/project/lib/b/")));
        assert!(is_path_prefix(&path("/"), &path("/a.sol")));
    }

    #[test]
    fn test_path_is_not_its_own_prefix() {
        assert!(!is_path_prefix(&path("/project"), &path("/project")));
        assert!(!is_path_prefix(&path("/project/"), &path("/project")));
        assert!(!is_path_prefix(&path("/project"), &path("/project/")));
        assert!(!is_path_prefix(&path("/"), &path("/")));
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        assert!(!is_path_prefix(&path("/pro"), &path("/project/a.sol")));
        assert!(!is_path_prefix(&path("/project/a"), &path("/project/a.sol")));
        assert!(!is_path_prefix(&path("/project/lib"), &path("/project")));
    }

    #[cfg(unix)]
    #[test]
    fn test_different_roots_do_not_match() {
        assert!(!is_path_prefix(&path("/host"), &path("//host/x")));
        assert!(!is_path_prefix(&path("//host"), &path("/host/x")));
        assert!(is_path_prefix(&path("//host/"), &path("//host/x")));
    }

    #[test]
    fn test_strip() {
        assert_eq!(
            strip_prefix_if_present(&path("/project"), &path("/project/contracts/a.sol")),
            "contracts/a.sol"
        );
        assert_eq!(
            strip_prefix_if_present(&path("/project/"), &path("/project/lib/")),
            "lib/"
        );
        assert_eq!(
            strip_prefix_if_present(&path("/other"), &path("/project/a.sol")),
            "/project/a.sol"
        );
        assert_eq!(
            strip_prefix_if_present(&path("/project"), &path("/project")),
            "/project"
        );
    }

    #[test]
    fn test_stripped_remainder_never_climbs() {
        let prefixes = ["/", "/a", "/a/", "/a/b"];
        let paths = ["/a/b/c.sol", "/a/b/", "/a", "/x/y", "/a/bc/d"];
        for prefix in prefixes {
            for p in paths {
                let (prefix, p) = (path(prefix), path(p));
                if is_path_prefix(&prefix, &p) {
                    let stripped = strip_prefix_if_present(&prefix, &p);
                    assert!(!stripped.is_empty());
                    assert!(!stripped.starts_with(".."));
                    assert!(!stripped.starts_with('/'));
                }
            }
        }
    }
}
