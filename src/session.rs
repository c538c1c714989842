//! The four-step paper creation wizard.
//!
//! A [`Session`] owns every piece of mutable state for one paper: the
//! details form, the uploaded images, the extracted texts, the formatted
//! blocks and the edit mode. Each method checks that it is called from the
//! step it belongs to and fails with [`Error::InvalidState`] otherwise.

use std::path::{Path, PathBuf};

use crate::edit::EditController;
use crate::error::{Error, Result};
use crate::layout::LayoutOptions;
use crate::locale::Locale;
use crate::model::{build_blocks, DocumentMetadata, ExamPaper, FormatPatch, LineFormat, TextBlock};
use crate::ocr::{
    extract_sequential, CancellationToken, ExtractionBatch, ImageInput, TextExtractor, MAX_IMAGES,
};
use crate::render::{export_paper_with_options, ExportFormat};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    /// School, class, subject and language
    #[default]
    Details,
    /// Image upload and text extraction
    Upload,
    /// Raw text and header field editing
    Edit,
    /// Formatted preview, rich-text editing and export
    Preview,
}

impl WizardStep {
    /// 0-based position of the step.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Details => 0,
            WizardStep::Upload => 1,
            WizardStep::Edit => 2,
            WizardStep::Preview => 3,
        }
    }

    /// The step before this one.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Details => None,
            WizardStep::Upload => Some(WizardStep::Details),
            WizardStep::Edit => Some(WizardStep::Upload),
            WizardStep::Preview => Some(WizardStep::Edit),
        }
    }

    /// Localised step name.
    pub fn label(&self, locale: Locale) -> &'static str {
        locale.labels().steps[self.index()]
    }
}

/// State of one paper being created.
#[derive(Debug)]
pub struct Session {
    locale: Locale,
    step: WizardStep,
    metadata: DocumentMetadata,
    images: Vec<ImageInput>,
    raw_texts: Vec<String>,
    edited_texts: Vec<String>,
    blocks: Vec<TextBlock>,
    default_format: LineFormat,
    editor: EditController,
    layout: LayoutOptions,
    generating: bool,
}

impl Session {
    /// Start a session in the given language.
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            step: WizardStep::Details,
            metadata: DocumentMetadata::new(locale),
            images: Vec::new(),
            raw_texts: Vec::new(),
            edited_texts: Vec::new(),
            blocks: Vec::new(),
            default_format: LineFormat::default(),
            editor: EditController::new(),
            layout: LayoutOptions::default(),
            generating: false,
        }
    }

    /// Use custom page geometry for export.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Current language.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Current wizard step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Header metadata.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Uploaded images, in upload order.
    pub fn images(&self) -> &[ImageInput] {
        &self.images
    }

    /// Texts as extracted, or as committed from the edit step.
    pub fn raw_texts(&self) -> &[String] {
        &self.raw_texts
    }

    /// Working copy of the texts on the edit step.
    pub fn edited_texts(&self) -> &[String] {
        &self.edited_texts
    }

    /// Formatted blocks shown on the preview step.
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Format given to new lines.
    pub fn default_format(&self) -> &LineFormat {
        &self.default_format
    }

    /// The edit mode controller.
    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    /// Check if an export is running.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// The paper as it would be exported now.
    pub fn paper(&self) -> ExamPaper {
        ExamPaper {
            metadata: self.metadata.clone(),
            blocks: self.blocks.clone(),
        }
    }

    /// Switch the interface and OCR language.
    pub fn set_locale(&mut self, locale: Locale) {
        if self.metadata.school_name == self.locale.labels().default_school_name {
            self.metadata.school_name = locale.labels().default_school_name.to_string();
        }
        self.locale = locale;
        self.metadata.locale = locale;
    }

    /// Submit the details form and move to the upload step.
    pub fn submit_details(
        &mut self,
        school_name: &str,
        class_name: &str,
        subject: &str,
    ) -> Result<()> {
        self.expect_step(WizardStep::Details)?;
        for (field, value) in [
            ("school name", school_name),
            ("class", class_name),
            ("subject", subject),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidState(format!("{} is required", field)));
            }
        }

        self.metadata.school_name = school_name.trim().to_string();
        self.metadata.class_name = class_name.trim().to_string();
        self.metadata.subject = subject.trim().to_string();
        self.metadata.locale = self.locale;
        self.step = WizardStep::Upload;
        log::debug!("details submitted, moving to upload");
        Ok(())
    }

    /// Add an image on the upload step.
    ///
    /// Returns `false` and ignores the image when the upload limit is
    /// reached or the session is on another step.
    pub fn add_image(&mut self, image: ImageInput) -> bool {
        if self.step != WizardStep::Upload || self.images.len() >= MAX_IMAGES {
            return false;
        }
        self.images.push(image);
        true
    }

    /// Remove an uploaded image.
    pub fn remove_image(&mut self, index: usize) -> Option<ImageInput> {
        if self.step != WizardStep::Upload || index >= self.images.len() {
            return None;
        }
        Some(self.images.remove(index))
    }

    /// Extract text from the uploaded images, one after another.
    pub fn run_extraction(&mut self, extractor: &dyn TextExtractor) -> Result<ExtractionBatch> {
        self.run_extraction_with(extractor, &CancellationToken::new(), |_, _| {})
    }

    /// Extract text with cancellation and progress reporting.
    ///
    /// If at least one image succeeds, the successful texts become the raw
    /// texts in upload order and the session moves to the edit step. If none
    /// succeeds the session stays on the upload step; the returned batch
    /// tells what went wrong either way.
    pub fn run_extraction_with<F>(
        &mut self,
        extractor: &dyn TextExtractor,
        cancel: &CancellationToken,
        progress: F,
    ) -> Result<ExtractionBatch>
    where
        F: FnMut(usize, usize),
    {
        self.expect_step(WizardStep::Upload)?;
        if self.images.is_empty() {
            return Err(Error::InvalidState(
                self.locale.labels().image_required.to_string(),
            ));
        }

        let batch = extract_sequential(extractor, &self.images, self.locale, cancel, progress)?;
        let texts = batch.successful_texts();
        if texts.is_empty() {
            log::warn!("no image could be read, staying on upload");
            return Ok(batch);
        }

        self.raw_texts = texts;
        self.edited_texts = self.raw_texts.clone();
        self.step = WizardStep::Edit;
        Ok(batch)
    }

    /// Replace the working text of one image on the edit step.
    pub fn edit_raw_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.expect_step(WizardStep::Edit)?;
        let len = self.edited_texts.len();
        let slot = self
            .edited_texts
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = text.into();
        Ok(())
    }

    /// Set the header fields entered on the edit step.
    pub fn set_metadata_fields(
        &mut self,
        exam_time: &str,
        total_marks: &str,
        exam_term: Option<&str>,
        student_fields: bool,
    ) -> Result<()> {
        self.expect_step(WizardStep::Edit)?;
        self.metadata.exam_time = exam_time.trim().to_string();
        self.metadata.total_marks = total_marks.trim().to_string();
        self.metadata.exam_term = exam_term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self.metadata.student_fields = student_fields;
        Ok(())
    }

    /// Change the format new lines start with.
    pub fn set_default_format(&mut self, patch: &FormatPatch) -> Result<()> {
        self.expect_step(WizardStep::Edit)?;
        self.default_format.apply(patch);
        Ok(())
    }

    /// Commit the edited texts, build the blocks and move to preview.
    pub fn enter_preview(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Edit)?;
        if self.metadata.exam_time.is_empty() || self.metadata.total_marks.is_empty() {
            return Err(Error::InvalidState(
                "exam duration and total marks are required".to_string(),
            ));
        }

        self.raw_texts = self.edited_texts.clone();
        self.blocks = build_blocks(&self.raw_texts, &self.default_format);
        self.editor.discard();
        self.step = WizardStep::Preview;
        log::debug!("preview built with {} blocks", self.blocks.len());
        Ok(())
    }

    /// Go back one step, dropping whatever the current step had not
    /// committed. Returns `false` on the first step.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.step.previous() else {
            return false;
        };
        match self.step {
            WizardStep::Preview => {
                self.editor.discard();
                self.blocks.clear();
                self.edited_texts = self.raw_texts.clone();
            }
            WizardStep::Edit => {
                self.edited_texts = self.raw_texts.clone();
            }
            WizardStep::Upload | WizardStep::Details => {}
        }
        log::debug!("back from {:?} to {:?}", self.step, previous);
        self.step = previous;
        true
    }

    /// Throw everything away except the language.
    pub fn restart(&mut self) {
        let layout = std::mem::take(&mut self.layout);
        *self = Session::new(self.locale).with_layout(layout);
        log::debug!("session restarted");
    }

    /// Open the preview blocks in the rich-text editor.
    pub fn begin_edit(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Preview)?;
        self.editor.begin_edit(&self.blocks)
    }

    /// Replace the editor content of one block.
    pub fn update_content(&mut self, block_index: usize, content: impl Into<String>) -> Result<()> {
        self.expect_step(WizardStep::Preview)?;
        self.editor.update_content(block_index, content)
    }

    /// Mark the block being edited.
    pub fn select_block(&mut self, block_index: usize) -> Result<()> {
        self.expect_step(WizardStep::Preview)?;
        self.editor.select_block(block_index)
    }

    /// Commit the rich-text edits. Returns the number of blocks replaced.
    pub fn save_edits(&mut self) -> Result<usize> {
        self.expect_step(WizardStep::Preview)?;
        self.editor
            .save(&mut self.blocks, self.default_format.font_size)
    }

    /// Close the rich-text editor, dropping every formatting change and
    /// rebuilding the blocks from the texts.
    pub fn cancel_edits(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Preview)?;
        self.blocks = self.editor.cancel(&self.raw_texts, &self.default_format)?;
        Ok(())
    }

    /// Format one line on the preview step.
    ///
    /// Returns `false` if the indices are out of range, the session is not
    /// on the preview step, or the rich-text editor is open.
    pub fn set_line_format(
        &mut self,
        block_index: usize,
        line_index: usize,
        patch: &FormatPatch,
    ) -> bool {
        if self.step != WizardStep::Preview || self.editor.is_editing() {
            return false;
        }
        self.blocks
            .get_mut(block_index)
            .is_some_and(|block| block.set_line_format(line_index, patch))
    }

    /// Write the paper into `dir` and return the file path.
    pub fn export(&mut self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        self.expect_step(WizardStep::Preview)?;
        self.generating = true;
        let paper = self.paper();
        let result = export_paper_with_options(&paper, format, dir, &self.layout);
        self.generating = false;

        if let Err(e) = &result {
            log::warn!("{}: {}", self.locale.labels().export_error, e);
        }
        result
    }

    fn expect_step(&self, step: WizardStep) -> Result<()> {
        if self.step != step {
            return Err(Error::InvalidState(format!(
                "expected step {:?}, session is at {:?}",
                step, self.step
            )));
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::ExtractionError;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn image(name: &str) -> ImageInput {
        ImageInput::from_bytes(name, PNG.to_vec()).unwrap()
    }

    fn ocr(image: &ImageInput, _: Locale) -> std::result::Result<String, ExtractionError> {
        match image.name.as_str() {
            "a.png" => Ok("What is 2+2?\na) 3\nb) 4".to_string()),
            "b.png" => Ok("Capital of France?".to_string()),
            _ => Err(ExtractionError::new("unreadable")),
        }
    }

    fn at_upload() -> Session {
        let mut session = Session::new(Locale::English);
        session
            .submit_details("Shashwat Public School", "Class 5", "Mathematics")
            .unwrap();
        session
    }

    fn at_preview() -> Session {
        let mut session = at_upload();
        session.add_image(image("a.png"));
        session.add_image(image("b.png"));
        session.run_extraction(&ocr).unwrap();
        session
            .set_metadata_fields("3 hours", "80", None, false)
            .unwrap();
        session.enter_preview().unwrap();
        session
    }

    #[test]
    fn test_details_required() {
        let mut session = Session::new(Locale::English);
        assert!(session.submit_details("School", "", "Science").is_err());
        assert_eq!(session.step(), WizardStep::Details);
    }

    #[test]
    fn test_image_cap() {
        let mut session = at_upload();
        for i in 0..MAX_IMAGES {
            assert!(session.add_image(image(&format!("{}.png", i))));
        }
        assert!(!session.add_image(image("extra.png")));
        assert_eq!(session.images().len(), MAX_IMAGES);
        assert!(session.remove_image(0).is_some());
        assert!(session.remove_image(10).is_none());
    }

    #[test]
    fn test_extraction_requires_images() {
        let mut session = at_upload();
        assert!(matches!(
            session.run_extraction(&ocr),
            Err(Error::InvalidState(msg)) if msg == "Image upload is required"
        ));
    }

    #[test]
    fn test_failed_extraction_stays_on_upload() {
        let mut session = at_upload();
        session.add_image(image("bad.png"));
        let batch = session.run_extraction(&ocr).unwrap();
        assert_eq!(batch.failures().len(), 1);
        assert_eq!(session.step(), WizardStep::Upload);
    }

    #[test]
    fn test_partial_extraction_keeps_successes_in_order() {
        let mut session = at_upload();
        session.add_image(image("b.png"));
        session.add_image(image("bad.png"));
        session.add_image(image("a.png"));
        session.run_extraction(&ocr).unwrap();
        assert_eq!(session.step(), WizardStep::Edit);
        assert_eq!(session.raw_texts().len(), 2);
        assert_eq!(session.raw_texts()[0], "Capital of France?");
    }

    #[test]
    fn test_full_flow_builds_blocks() {
        let session = at_preview();
        assert_eq!(session.step(), WizardStep::Preview);
        assert_eq!(session.blocks().len(), 2);
        assert_eq!(session.blocks()[0].len(), 3);
        assert_eq!(session.metadata().marks_line(), "Duration: 3 hours | Total Marks: 80");
    }

    #[test]
    fn test_preview_needs_marks() {
        let mut session = at_upload();
        session.add_image(image("a.png"));
        session.run_extraction(&ocr).unwrap();
        assert!(session.enter_preview().is_err());
    }

    #[test]
    fn test_back_from_edit_drops_text_edits() {
        let mut session = at_upload();
        session.add_image(image("b.png"));
        session.run_extraction(&ocr).unwrap();
        session.edit_raw_text(0, "Capital of Spain?").unwrap();
        assert!(session.back());
        assert_eq!(session.step(), WizardStep::Upload);
        assert_eq!(session.edited_texts()[0], "Capital of France?");
    }

    #[test]
    fn test_back_from_preview_discards_edit_mode() {
        let mut session = at_preview();
        session.begin_edit().unwrap();
        assert!(session.back());
        assert_eq!(session.step(), WizardStep::Edit);
        assert!(!session.editor().is_editing());
        assert!(session.blocks().is_empty());
    }

    #[test]
    fn test_line_format_and_cancel() {
        let mut session = at_preview();
        assert!(session.set_line_format(0, 1, &FormatPatch::new().bold(true)));
        assert!(!session.set_line_format(9, 0, &FormatPatch::new().bold(true)));
        assert!(session.blocks()[0].lines[1].format.bold);

        session.begin_edit().unwrap();
        session.cancel_edits().unwrap();
        assert!(!session.blocks()[0].lines[1].format.bold);
    }

    #[test]
    fn test_line_format_refused_while_editing() {
        let mut session = at_preview();
        session.begin_edit().unwrap();
        assert!(!session.set_line_format(0, 1, &FormatPatch::new().bold(true)));
        session.save_edits().unwrap();
        assert!(!session.blocks()[0].lines[1].format.bold);

        assert!(session.set_line_format(0, 1, &FormatPatch::new().bold(true)));
        assert!(session.blocks()[0].lines[1].format.bold);
    }

    #[test]
    fn test_cancel_outside_edit_mode_keeps_formats() {
        let mut session = at_preview();
        assert!(session.set_line_format(0, 1, &FormatPatch::new().bold(true)));
        assert!(matches!(session.cancel_edits(), Err(Error::InvalidState(_))));
        assert!(session.blocks()[0].lines[1].format.bold);
    }

    #[test]
    fn test_default_format_applies_to_new_blocks() {
        let mut session = at_upload();
        session.add_image(image("b.png"));
        session.run_extraction(&ocr).unwrap();
        session.set_metadata_fields("1 hour", "20", Some("Annual"), true).unwrap();
        session
            .set_default_format(&FormatPatch::new().font_size(14.0))
            .unwrap();
        session.enter_preview().unwrap();
        assert_eq!(session.blocks()[0].lines[0].format.font_size, 14.0);
        assert_eq!(session.metadata().term(), Some("Annual"));
    }

    #[test]
    fn test_restart_keeps_locale() {
        let mut session = at_preview();
        session.set_locale(Locale::Hindi);
        session.restart();
        assert_eq!(session.locale(), Locale::Hindi);
        assert_eq!(session.step(), WizardStep::Details);
        assert!(session.images().is_empty());
        assert!(session.blocks().is_empty());
    }

    #[test]
    fn test_export_resets_generating_flag() {
        let mut session = at_preview();
        let dir = tempfile::tempdir().unwrap();
        let path = session.export(ExportFormat::Text, dir.path()).unwrap();
        assert!(path.exists());
        assert!(!session.is_generating());

        let missing = dir.path().join("missing");
        assert!(session.export(ExportFormat::Text, &missing).is_err());
        assert!(!session.is_generating());
    }

    #[test]
    fn test_steps_enforced() {
        let mut session = Session::default();
        assert!(matches!(session.begin_edit(), Err(Error::InvalidState(_))));
        assert!(!session.add_image(image("a.png")));
        assert!(!session.back());
        assert_eq!(WizardStep::Edit.label(Locale::English), "Edit Questions");
    }
}
