//! srcfs Core Library
//!
//! This crate provides the source-loading filesystem of a compiler:
//! - Canonicalization of host paths into portable virtual paths
//! - A sandbox of search roots and allowed directories for reads
//! - Mapping of command-line paths to source unit names
//! - The read callback that resolves imports to source text
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        srcfs-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vfs/          - Canonical paths, prefixes, host access     │
//! │  sandbox/      - Base/include paths, allowed directories    │
//! │  source/       - Source unit name -> text registry          │
//! │  reader/       - Read callback, shared reader               │
//! │  config.rs     - JSON reader configuration                  │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod reader;
pub mod sandbox;
pub mod source;
pub mod vfs;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use error::{ConfigError, Error, ReadError, Result};

// Re-export reader components
pub use reader::{CallbackKind, FileReader, ReadCallbackResult, SharedFileReader};

// Re-export sandbox and source registries
pub use sandbox::SandboxRegistry;
pub use source::{SourceRegistry, STDIN_SOURCE_UNIT_NAME};

// Re-export path handling
pub use vfs::{
    canonicalize, canonicalize_with, is_path_prefix, strip_prefix_if_present, CanonicalPath,
    HostFilesystem, OsFilesystem,
};
