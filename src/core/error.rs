use std::path::PathBuf;
use thiserror::Error;

use crate::core::feeds::FeedSource;

/// Central error type for the generator backend.
/// Every fallible module returns `Result<T, GeneratorError>`.
#[derive(Debug, Error)]
pub enum GeneratorError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed {feed} unavailable at {url}: HTTP {status}")]
    FeedUnavailable {
        feed: FeedSource,
        url: String,
        status: u16,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Generation ──────────────────────────────────────
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Unknown Minecraft version: {0}")]
    UnknownGameVersion(String),

    #[error("Template not available. Please try again later.")]
    TemplateUnavailable,

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

impl From<std::io::Error> for GeneratorError {
    fn from(source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

/// The only ways a single generation request can fail.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Template archive could not be decoded: {0}")]
    Decode(String),

    #[error("No root directory could be determined in the template archive")]
    RootNotFound,

    #[error("Generated archive could not be encoded: {0}")]
    Encode(String),
}

impl GenerateError {
    /// Stable machine-readable kind, as reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Decode(_) => "DecodeError",
            GenerateError::RootNotFound => "RootNotFound",
            GenerateError::Encode(_) => "EncodeError",
        }
    }
}

// Command results cross a serialization boundary (CLI JSON output).
impl serde::Serialize for GeneratorError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
