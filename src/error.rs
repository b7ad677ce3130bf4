//! Crate error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the locator, codec and scanning passes.
///
/// "Not applicable" outcomes (no enclosing component, no comment payload)
/// are never errors; they are `None` at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// A located declaration has a shape the name resolver cannot name.
    #[error("Unsupported {kind}: {reason}")]
    UnsupportedInput { kind: &'static str, reason: String },

    /// Text between the comment markers is not valid JSON.
    #[error("Malformed comment payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Override registered against a selector key the map was not built with.
    #[error("Unknown selector: {0}")]
    UnknownSelector(String),

    #[error("Failed to parse {file}: {}", .messages.join("; "))]
    Parse { file: String, messages: Vec<String> },

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn unsupported(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsupportedInput {
            kind,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
