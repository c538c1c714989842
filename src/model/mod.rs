//! Document model types for exam paper content.
//!
//! This module defines the in-memory representation shared by the editor,
//! the pagination step and every export format: question blocks made of
//! individually formatted lines, plus the header metadata.

mod block;
mod format;
mod metadata;
mod paper;

pub use block::{build_blocks, TextBlock, TextLine};
pub use format::{Alignment, FormatPatch, LineFormat, DEFAULT_FONT_SIZE};
pub use metadata::DocumentMetadata;
pub use paper::ExamPaper;
