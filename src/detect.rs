//! Image format detection for uploaded question photos.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Image formats accepted as OCR input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF / EXIF
    Jpeg,
    /// Graphics Interchange Format
    Gif,
    /// WebP (RIFF container)
    Webp,
    /// Windows bitmap
    Bmp,
}

impl ImageFormat {
    /// MIME type sent alongside the image payload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Bmp => "bmp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const RIFF_MAGIC: &[u8] = b"RIFF";
const WEBP_TAG: &[u8] = b"WEBP";
const BMP_MAGIC: &[u8] = b"BM";

/// Bytes needed to recognise every supported format.
const HEADER_LEN: usize = 12;

/// Detect the image format from a file path.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    detect_image_format(&header)
}

/// Detect the image format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(ImageFormat)` if the data starts with a known image signature
/// * `Err(Error::UnsupportedImage)` otherwise
pub fn detect_image_format(data: &[u8]) -> Result<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        return Ok(ImageFormat::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(ImageFormat::Jpeg);
    }
    if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        return Ok(ImageFormat::Gif);
    }
    if data.len() >= HEADER_LEN && data.starts_with(RIFF_MAGIC) && &data[8..12] == WEBP_TAG {
        return Ok(ImageFormat::Webp);
    }
    // "BM" alone is too weak; require a plausible header length.
    if data.len() >= 6 && data.starts_with(BMP_MAGIC) {
        return Ok(ImageFormat::Bmp);
    }

    Err(Error::UnsupportedImage(describe_header(data)))
}

/// Check if bytes look like a supported image.
pub fn is_image_bytes(data: &[u8]) -> bool {
    detect_image_format(data).is_ok()
}

fn describe_header(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty file".to_string();
    }
    let shown: Vec<String> = data.iter().take(4).map(|b| format!("{:02X}", b)).collect();
    format!("unrecognised signature {}", shown.join(" "))
}
