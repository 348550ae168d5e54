//! Read callback protocol shared with the compiler pipeline

use crate::error::ReadError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kinds of callback requests a compiler may issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Load a source file from disk
    ReadFile,
    /// Answer an SMT solver query (not served here)
    SmtQuery,
}

impl CallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::ReadFile => "source",
            CallbackKind::SmtQuery => "smt-query",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown callback kind: {0}")]
pub struct UnknownCallbackKind(pub String);

impl FromStr for CallbackKind {
    type Err = UnknownCallbackKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(CallbackKind::ReadFile),
            "smt-query" => Ok(CallbackKind::SmtQuery),
            other => Err(UnknownCallbackKind(other.to_string())),
        }
    }
}

/// Outcome of a callback: file content, or a message for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum ReadCallbackResult {
    Success(String),
    Failure(String),
}

impl ReadCallbackResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ReadCallbackResult::Success(_))
    }

    /// File content on success, error message otherwise
    pub fn content(&self) -> &str {
        match self {
            ReadCallbackResult::Success(content) | ReadCallbackResult::Failure(content) => content,
        }
    }
}

impl From<Result<String, ReadError>> for ReadCallbackResult {
    fn from(result: Result<String, ReadError>) -> Self {
        match result {
            Ok(content) => ReadCallbackResult::Success(content),
            Err(err) => ReadCallbackResult::Failure(err.to_string()),
        }
    }
}
