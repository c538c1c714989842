//! # exampaper
//!
//! Build print-ready exam papers from photographed question images.
//!
//! Text extracted from each image becomes one question block. Every line of
//! a block carries its own formatting, can be edited through a rich-text
//! round trip, and is finally laid out on A4 pages and exported as PDF,
//! HTML, plain text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use exampaper::{ExportFormat, PaperBuilder};
//!
//! fn main() -> exampaper::Result<()> {
//!     let texts = ["What is 2+2?\na) 3\nb) 4", "Capital of France?"];
//!
//!     let paper = PaperBuilder::new()
//!         .with_school("Shashwat Public School")
//!         .with_class("Class 5")
//!         .with_subject("Mathematics")
//!         .with_exam_time("2 hours")
//!         .with_total_marks("50")
//!         .build(&texts);
//!
//!     println!("{} pages", paper.page_count());
//!     let path = paper.export(ExportFormat::Pdf, std::path::Path::new("."))?;
//!     println!("written to {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Per-line formatting**: bold, italic, size and alignment for every line
//! - **Edit round trip**: HTML paragraph markup in, formatted lines out
//! - **Deterministic layout**: greedy pagination into page commands
//! - **Several outputs**: PDF, HTML print preview, plain text, JSON
//! - **Two languages**: Hindi and English labels and OCR prompts
//! - **Parallel extraction**: optional Rayon-based batch OCR

pub mod detect;
pub mod edit;
pub mod error;
pub mod layout;
pub mod locale;
pub mod model;
pub mod ocr;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use detect::{detect_format_from_path, detect_image_format, is_image_bytes, ImageFormat};
pub use edit::{EditController, EditMode, HtmlCodec, ParseError, StructuredCodec};
pub use error::{Error, Result};
pub use layout::{
    page_count, render, render_paper, text_width, wrap_text, LayoutOptions, PageCommand, PageCursor,
};
pub use locale::{labels_for, LabelSet, Locale};
pub use model::{
    build_blocks, Alignment, DocumentMetadata, ExamPaper, FormatPatch, LineFormat, TextBlock,
    TextLine, DEFAULT_FONT_SIZE,
};
pub use ocr::{
    extract_sequential, CancellationToken, ExtractionBatch, ExtractionError, ImageInput,
    TextExtractor, MAX_IMAGES,
};
#[cfg(feature = "parallel")]
pub use ocr::extract_parallel;
pub use render::{export_paper, CommandSink, ExportFormat, JsonFormat};
pub use session::{Session, WizardStep};

use std::path::{Path, PathBuf};

/// Build a paper from extracted texts with the default line format.
///
/// # Example
///
/// ```
/// use exampaper::{build_paper, DocumentMetadata};
///
/// let paper = build_paper(DocumentMetadata::default(), &["Define force.\n(2 marks)"]);
/// assert_eq!(paper.line_count(), 2);
/// ```
pub fn build_paper<S: AsRef<str>>(metadata: DocumentMetadata, raw_texts: &[S]) -> ExamPaper {
    ExamPaper::from_raw_texts(metadata, raw_texts, &LineFormat::default())
}

/// Render a paper to PDF bytes on A4.
pub fn paper_to_pdf(paper: &ExamPaper) -> Result<Vec<u8>> {
    render::to_pdf(paper, &LayoutOptions::default())
}

/// Render a paper to an HTML print preview on A4.
pub fn paper_to_html(paper: &ExamPaper) -> String {
    render::to_html(paper, &LayoutOptions::default())
}

/// Builder for exam papers.
///
/// # Example
///
/// ```
/// use exampaper::{Locale, PaperBuilder};
///
/// let paper = PaperBuilder::with_locale(Locale::Hindi)
///     .with_class("कक्षा 10")
///     .with_subject("विज्ञान")
///     .with_font_size(12.0)
///     .build(&["प्रकाश संश्लेषण क्या है?"]);
/// assert_eq!(paper.paper().blocks[0].lines[0].format.font_size, 12.0);
/// ```
pub struct PaperBuilder {
    metadata: DocumentMetadata,
    default_format: LineFormat,
    layout: LayoutOptions,
}

impl PaperBuilder {
    /// Create a builder for an English paper.
    pub fn new() -> Self {
        Self::with_locale(Locale::default())
    }

    /// Create a builder for a paper in the given language.
    pub fn with_locale(locale: Locale) -> Self {
        Self {
            metadata: DocumentMetadata::new(locale),
            default_format: LineFormat::default(),
            layout: LayoutOptions::default(),
        }
    }

    /// Set the school name.
    pub fn with_school(mut self, name: impl Into<String>) -> Self {
        self.metadata.school_name = name.into();
        self
    }

    /// Set the class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.metadata.class_name = class.into();
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.metadata.subject = subject.into();
        self
    }

    /// Set the exam duration.
    pub fn with_exam_time(mut self, time: impl Into<String>) -> Self {
        self.metadata.exam_time = time.into();
        self
    }

    /// Set the total marks.
    pub fn with_total_marks(mut self, marks: impl Into<String>) -> Self {
        self.metadata.total_marks = marks.into();
        self
    }

    /// Set the exam term.
    pub fn with_exam_term(mut self, term: impl Into<String>) -> Self {
        self.metadata.exam_term = Some(term.into());
        self
    }

    /// Print student name and roll number fields under the header.
    pub fn with_student_fields(mut self) -> Self {
        self.metadata.student_fields = true;
        self
    }

    /// Set the font size of every line.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.default_format.apply(&FormatPatch::new().font_size(size));
        self
    }

    /// Set the format of every line.
    pub fn with_default_format(mut self, format: LineFormat) -> Self {
        self.default_format = format;
        self
    }

    /// Set page geometry.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Build the paper from extracted texts, one block per text.
    pub fn build<S: AsRef<str>>(self, raw_texts: &[S]) -> PaperResult {
        PaperResult {
            paper: ExamPaper::from_raw_texts(self.metadata, raw_texts, &self.default_format),
            layout: self.layout,
        }
    }
}

impl Default for PaperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built paper together with its page geometry.
pub struct PaperResult {
    paper: ExamPaper,
    layout: LayoutOptions,
}

impl PaperResult {
    /// The paper.
    pub fn paper(&self) -> &ExamPaper {
        &self.paper
    }

    /// Take the paper.
    pub fn into_paper(self) -> ExamPaper {
        self.paper
    }

    /// Page commands for the paper.
    pub fn commands(&self) -> Vec<PageCommand> {
        render_paper(&self.paper, &self.layout)
    }

    /// Number of pages the paper fills.
    pub fn page_count(&self) -> usize {
        page_count(&self.commands())
    }

    /// Render to PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render::to_pdf(&self.paper, &self.layout)
    }

    /// Render to an HTML print preview.
    pub fn to_html(&self) -> String {
        render::to_html(&self.paper, &self.layout)
    }

    /// Render to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.paper, &self.layout)
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.paper, format)
    }

    /// Write the paper into `dir` and return the file path.
    pub fn export(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        render::export_paper_with_options(&self.paper, format, dir, &self.layout)
    }
}
