//! Error types for exampaper library.

use std::io;
use thiserror::Error;

use crate::ocr::ExtractionError;

/// Result type alias for exampaper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or exporting an exam paper.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The uploaded file is not a supported image.
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// More images were supplied than a paper accepts.
    #[error("Too many images: {given} supplied, at most {max} allowed")]
    TooManyImages {
        /// Number of images supplied
        given: usize,
        /// Maximum number accepted
        max: usize,
    },

    /// Text extraction failed for one image.
    #[error("Text extraction failed for image {}: {source}", .index + 1)]
    Extraction {
        /// Zero-based upload index of the failing image
        index: usize,
        /// Underlying extraction error
        #[source]
        source: ExtractionError,
    },

    /// The running operation was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// An operation was requested in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A block or image index is out of range.
    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current length
        len: usize,
    },

    /// Error during rendering (layout, HTML, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error producing the PDF file.
    #[error("PDF generation error: {0}")]
    Pdf(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}
