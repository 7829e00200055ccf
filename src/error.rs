// src/error.rs
use crate::capture::CaptureError;
use crate::fonts::FontError;
use thiserror::Error;

/// A comprehensive error type for both export pipelines.
///
/// Nothing crosses the public boundary as a panic: every internal failure is
/// converted into one of these variants (interactive path) or into a logged
/// message plus a non-zero exit code (batch path). There are no automatic
/// retries; every failure is terminal for its invocation.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The capture target was absent when an export was requested.
    #[error("No target element found")]
    MissingTarget,

    /// A precondition was unmet before any pipeline work started
    /// (missing template build, unreadable input file, bad CLI argument).
    #[error("{0}")]
    Precondition(String),

    /// The render worker did not signal readiness in time.
    #[error("render did not become ready within {seconds}s")]
    Timeout { seconds: u64 },

    /// The raster capture backend failed.
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// No usable font could be resolved.
    #[error("font resolution failed: {0}")]
    Font(#[from] FontError),

    /// PDF assembly failed.
    #[error("PDF assembly failed: {0}")]
    Encoding(String),

    /// The resume document did not have the expected structure.
    #[error("invalid resume document: {0}")]
    InvalidDocument(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
