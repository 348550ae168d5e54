//! Registry of known source text

mod registry;

pub use registry::{SourceRegistry, STDIN_SOURCE_UNIT_NAME};
