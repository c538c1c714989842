//! Text extraction from question images.
//!
//! The vision model itself sits behind the [`TextExtractor`] trait. This
//! module runs a batch of uploads through an extractor, keeping results in
//! upload order and recording per-image failures.
//!
//! # Example
//!
//! ```
//! use exampaper::locale::Locale;
//! use exampaper::ocr::{extract_sequential, CancellationToken, ExtractionError, ImageInput};
//!
//! let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
//! let images = vec![ImageInput::from_bytes("q1.png", png).unwrap()];
//!
//! let extractor = |_: &ImageInput, _: Locale| -> Result<String, ExtractionError> {
//!     Ok("What is 2+2?".to_string())
//! };
//! let batch = extract_sequential(
//!     &extractor,
//!     &images,
//!     Locale::English,
//!     &CancellationToken::new(),
//!     |_, _| {},
//! )
//! .unwrap();
//! assert_eq!(batch.successful_texts(), vec!["What is 2+2?".to_string()]);
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::detect::{detect_image_format, ImageFormat};
use crate::error::{Error, Result};
use crate::locale::Locale;

/// Maximum number of images per paper.
pub const MAX_IMAGES: usize = 4;

/// An uploaded question image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Display name, usually the file name
    pub name: String,

    /// Encoded image bytes
    pub data: Vec<u8>,

    /// Detected image format
    pub format: ImageFormat,
}

impl ImageInput {
    /// Wrap encoded image bytes, rejecting anything that is not an image.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let format = detect_image_format(&data)?;
        Ok(Self {
            name: name.into(),
            data,
            format,
        })
    }

    /// Read an image file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    /// MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Size of the encoded image in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the image has no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Failure reported by a text extractor for one image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExtractionError {
    /// Human-readable reason
    pub message: String,

    /// HTTP status of the upstream service, when there was one
    pub status: Option<u16>,
}

impl ExtractionError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attach an upstream status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// A service that reads the text in an image.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of one image. `locale` selects the prompt and the
    /// expected language.
    fn extract_text(
        &self,
        image: &ImageInput,
        locale: Locale,
    ) -> std::result::Result<String, ExtractionError>;
}

impl<F> TextExtractor for F
where
    F: Fn(&ImageInput, Locale) -> std::result::Result<String, ExtractionError> + Send + Sync,
{
    fn extract_text(
        &self,
        image: &ImageInput,
        locale: Locale,
    ) -> std::result::Result<String, ExtractionError> {
        self(image, locale)
    }
}

/// Shared flag for cooperative cancellation of a batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-image results of a batch, in upload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionBatch {
    /// One outcome per input image
    pub outcomes: Vec<std::result::Result<String, ExtractionError>>,
}

impl ExtractionBatch {
    /// Texts of the images that succeeded, in upload order.
    pub fn successful_texts(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| o.as_ref().ok().cloned())
            .collect()
    }

    /// Upload indices and errors of the images that failed.
    pub fn failures(&self) -> Vec<(usize, &ExtractionError)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (i, e)))
            .collect()
    }

    /// Number of images that succeeded.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Check if every image succeeded.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    /// The first failure as a crate error.
    pub fn first_error(&self) -> Option<Error> {
        self.failures()
            .into_iter()
            .next()
            .map(|(index, source)| Error::Extraction {
                index,
                source: source.clone(),
            })
    }
}

/// Extract text from each image in turn.
///
/// `progress` is called with `(index, total)` before each image. The token
/// is checked before and after every image; once it is set the whole batch
/// is discarded and [`Error::Cancelled`] is returned.
pub fn extract_sequential<F>(
    extractor: &dyn TextExtractor,
    images: &[ImageInput],
    locale: Locale,
    cancel: &CancellationToken,
    mut progress: F,
) -> Result<ExtractionBatch>
where
    F: FnMut(usize, usize),
{
    check_batch_size(images)?;

    let total = images.len();
    let mut outcomes = Vec::with_capacity(total);
    for (index, image) in images.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        progress(index, total);
        outcomes.push(extract_one(extractor, index, image, locale));
    }
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    Ok(finish_batch(outcomes))
}

/// Extract text from all images concurrently.
///
/// Results are written by upload index, so the order matches
/// [`extract_sequential`]. `progress` may be called from several threads.
#[cfg(feature = "parallel")]
pub fn extract_parallel<F>(
    extractor: &dyn TextExtractor,
    images: &[ImageInput],
    locale: Locale,
    cancel: &CancellationToken,
    progress: F,
) -> Result<ExtractionBatch>
where
    F: Fn(usize, usize) + Sync,
{
    use rayon::prelude::*;

    check_batch_size(images)?;

    let total = images.len();
    let outcomes: Vec<Option<_>> = images
        .par_iter()
        .enumerate()
        .map(|(index, image)| {
            if cancel.is_cancelled() {
                return None;
            }
            progress(index, total);
            Some(extract_one(extractor, index, image, locale))
        })
        .collect();

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let outcomes = outcomes
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(Error::Cancelled)?;

    Ok(finish_batch(outcomes))
}

fn check_batch_size(images: &[ImageInput]) -> Result<()> {
    if images.len() > MAX_IMAGES {
        return Err(Error::TooManyImages {
            given: images.len(),
            max: MAX_IMAGES,
        });
    }
    Ok(())
}

fn extract_one(
    extractor: &dyn TextExtractor,
    index: usize,
    image: &ImageInput,
    locale: Locale,
) -> std::result::Result<String, ExtractionError> {
    log::debug!(
        "extracting image {} ({}, {} bytes)",
        index + 1,
        image.format,
        image.len()
    );
    match extractor.extract_text(image, locale) {
        Ok(text) => Ok(text.nfc().collect()),
        Err(e) => {
            log::warn!("text extraction failed for image {}: {}", index + 1, e);
            Err(e)
        }
    }
}

fn finish_batch(outcomes: Vec<std::result::Result<String, ExtractionError>>) -> ExtractionBatch {
    let batch = ExtractionBatch { outcomes };
    log::info!(
        "extraction finished: {} of {} images succeeded",
        batch.success_count(),
        batch.outcomes.len()
    );
    batch
}
