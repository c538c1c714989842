//! Export of exam papers to files.
//!
//! PDF and plain text are produced by replaying page commands through a
//! [`CommandSink`]; HTML and JSON are built from the paper directly.

mod html;
mod json;
mod pdf;
mod sink;
mod text;

pub use html::to_html;
pub use json::{commands_to_json, from_json, to_json, JsonFormat};
pub use pdf::{to_pdf, PdfWriter};
pub use sink::{replay, CommandSink};
pub use text::{to_text, TextWriter};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::LayoutOptions;
use crate::model::ExamPaper;

/// File format for [`export_paper`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Print-ready PDF
    #[default]
    Pdf,
    /// HTML print preview
    Html,
    /// Plain text
    Text,
    /// Serialized document model
    Json,
}

impl ExportFormat {
    /// All formats.
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Html,
        ExportFormat::Text,
        ExportFormat::Json,
    ];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html",
            ExportFormat::Text => "text/plain",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "html" | "htm" => Ok(ExportFormat::Html),
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Render a paper to the bytes of the given format.
pub fn render_bytes(
    paper: &ExamPaper,
    format: ExportFormat,
    options: &LayoutOptions,
) -> Result<Vec<u8>> {
    options.validate().map_err(Error::Render)?;
    match format {
        ExportFormat::Pdf => to_pdf(paper, options),
        ExportFormat::Html => Ok(to_html(paper, options).into_bytes()),
        ExportFormat::Text => Ok(to_text(paper, options)?.into_bytes()),
        ExportFormat::Json => Ok(to_json(paper, JsonFormat::Pretty)?.into_bytes()),
    }
}

/// Write `{file_stem}.{ext}` into `dir` with the default A4 layout.
pub fn export_paper(paper: &ExamPaper, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    export_paper_with_options(paper, format, dir, &LayoutOptions::default())
}

/// Write `{file_stem}.{ext}` into `dir`.
///
/// Returns the path written. If writing fails, no partial file is left
/// behind.
pub fn export_paper_with_options(
    paper: &ExamPaper,
    format: ExportFormat,
    dir: &Path,
    options: &LayoutOptions,
) -> Result<PathBuf> {
    let bytes = render_bytes(paper, format, options)?;
    let path = dir.join(format!(
        "{}.{}",
        paper.metadata.export_file_stem(),
        format.extension()
    ));

    if let Err(e) = fs::write(&path, &bytes) {
        if path.exists() {
            let _ = fs::remove_file(&path);
        }
        return Err(e.into());
    }

    log::info!("exported {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
