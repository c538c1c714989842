//! Greedy top-to-bottom placement of question lines onto pages.
//!
//! [`render`] walks the blocks in order, tracks a vertical cursor and emits
//! a flat list of [`PageCommand`]s. Interpreters in [`crate::render`] replay
//! the list against a concrete backend.

use serde::{Deserialize, Serialize};

use super::metrics::wrap_text;
use super::LayoutOptions;
use crate::model::{Alignment, DocumentMetadata, ExamPaper, LineFormat, TextBlock};

/// One instruction for a page-drawing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PageCommand {
    /// Close the current page and open a new one
    NewPage,

    /// Draw the document header (first page only)
    DrawHeader {
        /// Header contents
        metadata: DocumentMetadata,
    },

    /// Draw one line of text anchored at `(x, y)`
    DrawLine {
        /// Text to draw, already wrapped
        text: String,
        /// Anchor x in millimetres from the left edge
        x: f32,
        /// Baseline y in millimetres from the top edge
        y: f32,
        /// How the text sits relative to the anchor
        align: Alignment,
        /// Typeface attributes
        format: LineFormat,
    },

    /// Draw the page footer for the page being closed
    DrawFooter {
        /// 1-based page number
        page_number: u32,
    },
}

/// Position of the layout cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    /// 0-based index of the current page
    pub page_index: u32,
    /// Vertical position in millimetres from the top edge
    pub y: f32,
}

impl PageCursor {
    fn new(top: f32) -> Self {
        Self { page_index: 0, y: top }
    }

    fn page_number(&self) -> u32 {
        self.page_index + 1
    }
}

/// Cursor position where the first question line is drawn.
pub fn content_top(metadata: &DocumentMetadata, options: &LayoutOptions) -> f32 {
    let mut top = options.margin + options.header_height;
    if metadata.student_fields {
        top += options.student_fields_height;
    }
    if !metadata.locale.labels().instructions.is_empty() {
        top += options.instructions_height;
    }
    top
}

/// Lay out `blocks` onto pages.
///
/// The first page is open from the start; `NewPage` appears only when a line
/// would fall below the bottom margin. Every page gets exactly one
/// `DrawFooter`, the last one closing the stream. The output depends only on
/// the inputs.
pub fn render(
    blocks: &[TextBlock],
    metadata: &DocumentMetadata,
    options: &LayoutOptions,
) -> Vec<PageCommand> {
    let mut commands = vec![PageCommand::DrawHeader {
        metadata: metadata.clone(),
    }];
    let mut cursor = PageCursor::new(content_top(metadata, options));
    let max_width = options.content_width();

    for block in blocks {
        for (index, line) in block.lines.iter().enumerate() {
            let is_heading = index == 0;
            let text = display_text(block, index, &line.content, line.format.alignment, options);
            let step = if is_heading {
                options.heading_step
            } else {
                options.body_step
            };
            let x = anchor_x(line.format.alignment, options);

            for sub_line in wrap_text(&text, line.format.font_size, max_width) {
                if cursor.y > options.bottom_limit() {
                    break_page(&mut commands, &mut cursor, options);
                }
                commands.push(PageCommand::DrawLine {
                    text: sub_line,
                    x,
                    y: cursor.y,
                    align: line.format.alignment,
                    format: line.format,
                });
                cursor.y += step;
            }
        }
        cursor.y += options.block_gap;
    }

    commands.push(PageCommand::DrawFooter {
        page_number: cursor.page_number(),
    });
    commands
}

/// Lay out a whole paper.
pub fn render_paper(paper: &ExamPaper, options: &LayoutOptions) -> Vec<PageCommand> {
    render(&paper.blocks, &paper.metadata, options)
}

/// Number of pages a command stream produces.
pub fn page_count(commands: &[PageCommand]) -> usize {
    1 + commands
        .iter()
        .filter(|c| matches!(c, PageCommand::NewPage))
        .count()
}

fn break_page(commands: &mut Vec<PageCommand>, cursor: &mut PageCursor, options: &LayoutOptions) {
    commands.push(PageCommand::DrawFooter {
        page_number: cursor.page_number(),
    });
    commands.push(PageCommand::NewPage);
    cursor.page_index += 1;
    cursor.y = options.continuation_top();
    log::debug!("page break, now on page {}", cursor.page_number());
}

fn display_text(
    block: &TextBlock,
    index: usize,
    content: &str,
    alignment: Alignment,
    options: &LayoutOptions,
) -> String {
    if index == 0 {
        format!("{}{}", block.heading_label(), content)
    } else if alignment == Alignment::Left {
        format!("{}{}", options.body_indent, content)
    } else {
        content.to_string()
    }
}

fn anchor_x(alignment: Alignment, options: &LayoutOptions) -> f32 {
    match alignment {
        Alignment::Left => options.margin,
        Alignment::Center => options.page_width / 2.0,
        Alignment::Right => options.page_width - options.margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_width;
    use crate::model::{build_blocks, FormatPatch};

    fn lines(commands: &[PageCommand]) -> Vec<(&str, f32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                PageCommand::DrawLine { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_page_scenario() {
        let blocks = build_blocks(
            &["What is 2+2?\na) 3\nb) 4", "Capital of France?"],
            &LineFormat::default(),
        );
        let commands = render(&blocks, &DocumentMetadata::default(), &LayoutOptions::default());

        assert!(matches!(commands[0], PageCommand::DrawHeader { .. }));
        assert!(matches!(
            commands.last(),
            Some(PageCommand::DrawFooter { page_number: 1 })
        ));
        assert_eq!(page_count(&commands), 1);

        let drawn = lines(&commands);
        assert_eq!(drawn.len(), 4);
        assert_eq!(drawn[0], ("1. What is 2+2?", 70.0));
        assert_eq!(drawn[1], ("   a) 3", 77.0));
        assert_eq!(drawn[2], ("   b) 4", 83.0));
        assert_eq!(drawn[3], ("2. Capital of France?", 94.0));
    }

    #[test]
    fn test_student_fields_push_content_down() {
        let blocks = build_blocks(&["Q"], &LineFormat::default());
        let mut metadata = DocumentMetadata::default();
        metadata.student_fields = true;
        let commands = render(&blocks, &metadata, &LayoutOptions::default());
        assert_eq!(lines(&commands)[0].1, 85.0);
    }

    #[test]
    fn test_alignment_anchors() {
        let mut blocks = build_blocks(&["heading\ncentre\nright"], &LineFormat::default());
        blocks[0].set_line_format(1, &FormatPatch::new().alignment(Alignment::Center));
        blocks[0].set_line_format(2, &FormatPatch::new().alignment(Alignment::Right));
        let commands = render(&blocks, &DocumentMetadata::default(), &LayoutOptions::default());

        let anchors: Vec<(String, f32)> = commands
            .iter()
            .filter_map(|c| match c {
                PageCommand::DrawLine { text, x, .. } => Some((text.clone(), *x)),
                _ => None,
            })
            .collect();
        assert_eq!(anchors[0], ("1. heading".to_string(), 20.0));
        assert_eq!(anchors[1], ("centre".to_string(), 105.0));
        assert_eq!(anchors[2], ("right".to_string(), 190.0));
    }

    #[test]
    fn test_wide_line_wraps_within_margins() {
        let long = "describe ".repeat(60);
        let blocks = build_blocks(&[long.as_str()], &LineFormat::default());
        let options = LayoutOptions::default();
        let commands = render(&blocks, &DocumentMetadata::default(), &options);

        let drawn = lines(&commands);
        assert!(drawn.len() > 1);
        for (text, _) in &drawn {
            assert!(text_width(text, 11.0) < options.content_width());
        }
        for pair in drawn.windows(2) {
            assert_eq!(pair[1].1 - pair[0].1, options.heading_step);
        }
    }

    #[test]
    fn test_overflow_breaks_page() {
        let text = (1..=60)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = build_blocks(&[text.as_str()], &LineFormat::default());
        let options = LayoutOptions::default();
        let commands = render(&blocks, &DocumentMetadata::default(), &options);

        let pages = page_count(&commands);
        assert!(pages >= 2);

        let new_page = commands
            .iter()
            .position(|c| matches!(c, PageCommand::NewPage))
            .unwrap();
        assert!(matches!(
            commands[new_page - 1],
            PageCommand::DrawFooter { page_number: 1 }
        ));
        match &commands[new_page + 1] {
            PageCommand::DrawLine { y, .. } => assert_eq!(*y, options.continuation_top()),
            other => panic!("expected a line after the break, got {:?}", other),
        }

        let footers: Vec<u32> = commands
            .iter()
            .filter_map(|c| match c {
                PageCommand::DrawFooter { page_number } => Some(*page_number),
                _ => None,
            })
            .collect();
        assert_eq!(footers, (1..=pages as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_render_is_deterministic() {
        let blocks = build_blocks(&["a\nb\nc", "d"], &LineFormat::with_size(14.0));
        let metadata = DocumentMetadata::default();
        let options = LayoutOptions::default();
        assert_eq!(
            render(&blocks, &metadata, &options),
            render(&blocks, &metadata, &options)
        );
    }

    #[test]
    fn test_empty_paper_still_has_header_and_footer() {
        let commands = render(&[], &DocumentMetadata::default(), &LayoutOptions::default());
        assert_eq!(commands.len(), 2);
        assert_eq!(page_count(&commands), 1);
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&PageCommand::DrawFooter { page_number: 2 }).unwrap();
        assert_eq!(json, r#"{"op":"draw_footer","page_number":2}"#);
    }
}
