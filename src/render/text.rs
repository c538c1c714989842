//! Plain text rendering of exam papers.

use super::sink::{replay, CommandSink};
use crate::error::Result;
use crate::layout::{render_paper, LayoutOptions};
use crate::model::{DocumentMetadata, ExamPaper, LineFormat};

/// A [`CommandSink`] that writes one text line per drawn line.
///
/// Questions are separated by a blank line, pages by a form feed.
#[derive(Debug)]
pub struct TextWriter {
    output: String,
    metadata: DocumentMetadata,
    last_y: Option<f32>,
    gap_threshold: f32,
}

impl TextWriter {
    /// Create a writer for the given layout.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            output: String::new(),
            metadata: DocumentMetadata::default(),
            last_y: None,
            gap_threshold: options.heading_step.max(options.body_step),
        }
    }

    /// Take the accumulated text.
    pub fn finish(self) -> String {
        self.output
    }
}

impl CommandSink for TextWriter {
    fn new_page(&mut self) -> Result<()> {
        self.output.push('\u{000C}');
        self.output.push('\n');
        self.last_y = None;
        Ok(())
    }

    fn draw_header(&mut self, metadata: &DocumentMetadata) -> Result<()> {
        let labels = metadata.locale.labels();
        self.metadata = metadata.clone();
        self.output.push_str(metadata.school_name.trim());
        self.output.push('\n');
        self.output.push_str(&metadata.class_line());
        self.output.push('\n');
        self.output.push_str(&metadata.marks_line());
        self.output.push('\n');
        if metadata.student_fields {
            self.output.push_str(&format!(
                "{}: ____________________   {}: __________\n",
                labels.student_name, labels.student_roll
            ));
        }
        if !labels.instructions.trim().is_empty() {
            self.output.push_str(labels.instructions);
            self.output.push('\n');
        }
        self.output.push('\n');
        Ok(())
    }

    fn draw_line(&mut self, text: &str, _x: f32, y: f32, _format: &LineFormat) -> Result<()> {
        if self.last_y.is_some_and(|last| y - last > self.gap_threshold) {
            self.output.push('\n');
        }
        self.output.push_str(text.trim_end());
        self.output.push('\n');
        self.last_y = Some(y);
        Ok(())
    }

    fn draw_footer(&mut self, page_number: u32) -> Result<()> {
        let labels = self.metadata.locale.labels();
        self.output
            .push_str(&format!("\n{} {}\n", labels.page, page_number));
        Ok(())
    }
}

/// Convert a paper to plain text, page by page.
pub fn to_text(paper: &ExamPaper, options: &LayoutOptions) -> Result<String> {
    let commands = render_paper(paper, options);
    let mut writer = TextWriter::new(options);
    replay(&commands, &mut writer)?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let mut metadata = DocumentMetadata::default();
        metadata.class_name = "Class 5".to_string();
        metadata.subject = "Mathematics".to_string();
        let paper = ExamPaper::from_raw_texts(
            metadata,
            &["What is 2+2?\na) 3\nb) 4", "Capital of France?"],
            &LineFormat::default(),
        );

        let text = to_text(&paper, &LayoutOptions::default()).unwrap();
        assert!(text.starts_with("SHASHWAT PUBLIC SCHOOL\nClass 5 - Mathematics\n"));
        assert!(text.contains("1. What is 2+2?\n   a) 3\n   b) 4\n\n2. Capital of France?\n"));
        assert!(text.trim_end().ends_with("Page 1"));
    }

    #[test]
    fn test_pages_separated_by_form_feed() {
        let long = (1..=70).map(|i| format!("item {}", i)).collect::<Vec<_>>().join("\n");
        let paper = ExamPaper::from_raw_texts(
            DocumentMetadata::default(),
            &[long.as_str()],
            &LineFormat::default(),
        );
        let text = to_text(&paper, &LayoutOptions::default()).unwrap();
        assert!(text.contains("Page 1\n\u{000C}\n"));
        assert!(text.contains("Page 2"));
    }
}
