//! Integration tests for the edit/preview round trip.

use exampaper::edit::{EditController, EditMode, HtmlCodec, ParseError, StructuredCodec};
use exampaper::error::Error;
use exampaper::{build_blocks, Alignment, FormatPatch, LineFormat, TextLine};

const RAW: [&str; 2] = ["What is 2+2?\na) 3\nb) 4", "Capital of France?"];

#[test]
fn test_save_after_edit() {
    let mut blocks = build_blocks(&RAW, &LineFormat::default());
    let mut editor = EditController::new();
    editor.begin_edit(&blocks).unwrap();
    assert_eq!(editor.mode(), EditMode::Editing);

    editor
        .update_content(
            0,
            r#"<p><strong>1. What is 3+3?</strong></p><p style="font-style: italic">a) 6</p>"#,
        )
        .unwrap();
    let replaced = editor.save(&mut blocks, 11.0).unwrap();

    assert_eq!(replaced, 2);
    assert_eq!(editor.mode(), EditMode::ReadOnly);
    assert_eq!(blocks[0].lines.len(), 2);
    assert_eq!(blocks[0].lines[0].content, "What is 3+3?");
    assert!(blocks[0].lines[0].format.bold);
    assert_eq!(blocks[0].lines[1].content, "a) 6");
    assert!(blocks[0].lines[1].format.italic);
    assert_eq!(blocks[1].lines[0].content, "Capital of France?");
}

#[test]
fn test_unedited_save_keeps_lines() {
    let mut blocks = build_blocks(&RAW, &LineFormat::default());
    blocks[0].set_line_format(1, &FormatPatch::new().bold(true).font_size(14.0));
    blocks[1].set_line_format(0, &FormatPatch::new().alignment(Alignment::Center));
    let before = blocks.clone();

    let mut editor = EditController::new();
    editor.begin_edit(&blocks).unwrap();
    editor.save(&mut blocks, 11.0).unwrap();

    assert_eq!(blocks, before);
}

#[test]
fn test_cancel_restores_raw_texts() {
    let default_format = LineFormat::default();
    let mut blocks = build_blocks(&RAW, &default_format);
    blocks[0].set_line_format(0, &FormatPatch::new().italic(true));

    let mut editor = EditController::new();
    editor.begin_edit(&blocks).unwrap();
    editor.update_content(1, "<p>something else</p>").unwrap();
    let restored = editor.cancel(&RAW, &default_format).unwrap();

    assert_eq!(restored, build_blocks(&RAW, &default_format));
    assert!(!editor.is_editing());
}

#[test]
fn test_unparseable_content_keeps_block() {
    let mut blocks = build_blocks(&RAW, &LineFormat::default());
    let before = blocks[1].clone();

    let mut editor = EditController::new();
    editor.begin_edit(&blocks).unwrap();
    editor.update_content(1, "no markup at all").unwrap();
    let replaced = editor.save(&mut blocks, 11.0).unwrap();

    assert_eq!(replaced, 1);
    assert_eq!(blocks[1], before);
}

#[test]
fn test_edit_requires_session() {
    let mut blocks = build_blocks(&RAW, &LineFormat::default());
    let mut editor = EditController::new();

    assert!(matches!(
        editor.update_content(0, "<p>x</p>"),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        editor.save(&mut blocks, 11.0),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        editor.cancel(&RAW, &LineFormat::default()),
        Err(Error::InvalidState(_))
    ));

    editor.begin_edit(&blocks).unwrap();
    assert!(matches!(editor.begin_edit(&blocks), Err(Error::InvalidState(_))));
    assert!(matches!(
        editor.update_content(5, "<p>x</p>"),
        Err(Error::IndexOutOfRange { index: 5, len: 2 })
    ));
}

/// Codec that stores one line per text line, ignoring formatting.
struct PlainCodec;

impl StructuredCodec for PlainCodec {
    fn serialize(&self, block: &exampaper::TextBlock) -> String {
        block
            .lines
            .iter()
            .map(|l| l.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn deserialize(
        &self,
        content: &str,
        _source_index: usize,
        default_size: f32,
    ) -> Result<Vec<TextLine>, ParseError> {
        let lines: Vec<TextLine> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| TextLine::new(l, LineFormat::with_size(default_size)))
            .collect();
        if lines.is_empty() {
            return Err(ParseError::Blank);
        }
        Ok(lines)
    }
}

#[test]
fn test_custom_codec() {
    let mut blocks = build_blocks(&RAW, &LineFormat::default());
    let mut editor = EditController::with_codec(PlainCodec);
    editor.begin_edit(&blocks).unwrap();
    assert_eq!(editor.content(0), Some("What is 2+2?\na) 3\nb) 4"));

    editor.update_content(1, "Capital of Italy?\n\n(1 mark)").unwrap();
    editor.save(&mut blocks, 12.0).unwrap();

    assert_eq!(blocks[1].plain_text(), "Capital of Italy?\n(1 mark)");
    assert_eq!(blocks[1].lines[0].format.font_size, 12.0);
}

#[test]
fn test_html_codec_devanagari() {
    let codec = HtmlCodec::new();
    let blocks = build_blocks(&["प्रकाश संश्लेषण क्या है?\nक) पत्ती"], &LineFormat::default());
    let html = codec.serialize(&blocks[0]);
    let lines = codec.deserialize(&html, 0, 11.0).unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].content, "प्रकाश संश्लेषण क्या है?");
    assert_eq!(lines[1].content, "क) पत्ती");
}
