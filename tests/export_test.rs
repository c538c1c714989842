//! Integration tests for file export.

use std::fs;

use exampaper::render::{export_paper_with_options, from_json};
use exampaper::{
    export_paper, CommandSink, DocumentMetadata, Error, ExportFormat, LayoutOptions, LineFormat,
    PaperBuilder, Result,
};

fn builder() -> PaperBuilder {
    PaperBuilder::new()
        .with_school("Shashwat Public School")
        .with_class("Class 5")
        .with_subject("Mathematics")
        .with_exam_time("2 hours")
        .with_total_marks("50")
}

#[test]
fn test_export_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let paper = builder().build(&["What is 2+2?\na) 3\nb) 4", "Capital of France?"]);

    for format in ExportFormat::ALL {
        let path = paper.export(format, dir.path()).unwrap();
        assert_eq!(
            path.extension().and_then(|e| e.to_str()),
            Some(format.extension())
        );
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, ExportFormat::ALL.len());
}

#[test]
fn test_pdf_pages_match_layout() {
    let body: Vec<String> = (0..70).map(|i| format!("({}) fill in the blank", i)).collect();
    let paper = builder()
        .with_student_fields()
        .build(&[format!("Fill in the blanks\n{}", body.join("\n"))]);

    let bytes = paper.to_pdf().unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), paper.page_count());
    assert!(paper.page_count() >= 2);
}

#[test]
fn test_text_export_reads_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let paper = builder().build(&["What is 2+2?\na) 3\nb) 4", "Capital of France?"]);
    let path = paper.export(ExportFormat::Text, dir.path()).unwrap();

    let text = fs::read_to_string(path).unwrap();
    let first = text.find("1. What is 2+2?").unwrap();
    let second = text.find("2. Capital of France?").unwrap();
    assert!(first < second);
    assert!(text.contains("Page 1"));
}

#[test]
fn test_json_export_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let paper = builder().with_font_size(12.0).build(&["Define force."]);
    let path = paper.export(ExportFormat::Json, dir.path()).unwrap();

    let restored = from_json(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(&restored, paper.paper());
}

#[test]
fn test_export_to_missing_dir_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");
    let paper = exampaper::build_paper(DocumentMetadata::default(), &["Q"]);

    let result = export_paper(&paper, ExportFormat::Pdf, &missing);
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!missing.exists());
}

#[test]
fn test_invalid_layout_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paper = exampaper::build_paper(DocumentMetadata::default(), &["Q"]);
    let options = LayoutOptions::new().with_page_size(30.0, 30.0);

    let result = export_paper_with_options(&paper, ExportFormat::Html, dir.path(), &options);
    assert!(matches!(result, Err(Error::Render(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Sink that counts what it is asked to draw.
#[derive(Default)]
struct Counter {
    pages: usize,
    lines: usize,
    footers: Vec<u32>,
}

impl CommandSink for Counter {
    fn new_page(&mut self) -> Result<()> {
        self.pages += 1;
        Ok(())
    }

    fn draw_line(&mut self, _text: &str, _x: f32, _y: f32, _format: &LineFormat) -> Result<()> {
        self.lines += 1;
        Ok(())
    }

    fn draw_footer(&mut self, page_number: u32) -> Result<()> {
        self.footers.push(page_number);
        Ok(())
    }
}

#[test]
fn test_custom_sink_sees_every_command() {
    let paper = builder().build(&["A\nb\nc", "D"]);
    let mut counter = Counter::default();
    exampaper::render::replay(&paper.commands(), &mut counter).unwrap();

    assert_eq!(counter.pages, 0);
    assert_eq!(counter.lines, 4);
    assert_eq!(counter.footers, vec![1]);
}
