//! Virtual path layer
//!
//! This module provides:
//! - Canonicalization of host paths into portable virtual paths
//! - Prefix matching between canonical paths
//! - The host filesystem seam used for symlink resolution and reads

pub mod canonical;
mod host;
pub mod prefix;
mod root;

pub use canonical::{canonicalize, canonicalize_with, CanonicalPath};
pub use host::{HostFilesystem, OsFilesystem};
pub use prefix::{is_path_prefix, strip_prefix_if_present};
pub use root::is_unc_path;

#[cfg(test)]
pub(crate) use host::MockHostFilesystem;
