//! Read callback service
//!
//! This module provides:
//! - The callback protocol types shared with the compiler pipeline
//! - The sandboxed file reader that serves read requests
//! - A lock-guarded wrapper for serving reads from several threads

mod callback;
mod file_reader;
mod shared;

pub use callback::{CallbackKind, ReadCallbackResult, UnknownCallbackKind};
pub use file_reader::FileReader;
pub use shared::SharedFileReader;
