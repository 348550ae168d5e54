//! Read sandbox
//!
//! This module provides:
//! - The base path and ordered include paths that sources are searched in
//! - The allow-list of directories reads may reach
//! - The containment check every read goes through

mod registry;

pub use registry::SandboxRegistry;
