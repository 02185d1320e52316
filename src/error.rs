//! Error types for pm25-map operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pm25-map operations.
///
/// Per-point conditions (off-map projections, queries too far from any
/// sample) are not errors; they surface as `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// Sample input rejected at build time (empty, out of range, malformed).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Statistics requested before any dataset was loaded.
    #[error("No dataset loaded")]
    EmptyDataset,

    /// Invalid dimensions for a drawing surface.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Color band table is empty or its bounds are not increasing.
    #[error("Invalid color bands: {0}")]
    InvalidBands(String),

    /// Zoom limits or step factors out of range.
    #[error("Invalid zoom policy: {0}")]
    InvalidZoomPolicy(String),

    /// Overlay style constant out of range.
    #[error("Invalid overlay style: {0}")]
    InvalidStyle(String),

    /// Configuration parsing error with line number.
    #[error("Configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}
