//! Backends that consume page commands.
//!
//! A [`CommandSink`] receives the commands produced by
//! [`crate::layout::render`] one by one. Every method has a no-op default,
//! so a sink only implements what it draws.
//!
//! # Example
//!
//! ```
//! use exampaper::layout::{render_paper, LayoutOptions};
//! use exampaper::model::{DocumentMetadata, ExamPaper, LineFormat};
//! use exampaper::render::{replay, CommandSink};
//!
//! #[derive(Default)]
//! struct LineCounter(usize);
//!
//! impl CommandSink for LineCounter {
//!     fn draw_line(
//!         &mut self,
//!         _text: &str,
//!         _x: f32,
//!         _y: f32,
//!         _format: &exampaper::model::LineFormat,
//!     ) -> exampaper::Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let paper = ExamPaper::from_raw_texts(
//!     DocumentMetadata::default(),
//!     &["Q1\na\nb"],
//!     &LineFormat::default(),
//! );
//! let mut counter = LineCounter::default();
//! replay(&render_paper(&paper, &LayoutOptions::default()), &mut counter).unwrap();
//! assert_eq!(counter.0, 3);
//! ```

use crate::error::Result;
use crate::layout::PageCommand;
use crate::model::{DocumentMetadata, LineFormat};

/// Receiver of page commands.
pub trait CommandSink {
    /// Start a new page after the current one.
    fn new_page(&mut self) -> Result<()> {
        Ok(())
    }

    /// Draw the first-page header.
    fn draw_header(&mut self, metadata: &DocumentMetadata) -> Result<()> {
        let _ = metadata;
        Ok(())
    }

    /// Draw one line of text. `format.alignment` tells how the text sits
    /// relative to the anchor `x`.
    fn draw_line(&mut self, text: &str, x: f32, y: f32, format: &LineFormat) -> Result<()> {
        let _ = (text, x, y, format);
        Ok(())
    }

    /// Draw the footer of the current page.
    fn draw_footer(&mut self, page_number: u32) -> Result<()> {
        let _ = page_number;
        Ok(())
    }
}

/// Feed `commands` to `sink` in order, stopping at the first error.
pub fn replay(commands: &[PageCommand], sink: &mut dyn CommandSink) -> Result<()> {
    for command in commands {
        match command {
            PageCommand::NewPage => sink.new_page()?,
            PageCommand::DrawHeader { metadata } => sink.draw_header(metadata)?,
            PageCommand::DrawLine {
                text,
                x,
                y,
                align,
                format,
            } => {
                let mut format = *format;
                format.alignment = *align;
                sink.draw_line(text, *x, *y, &format)?
            }
            PageCommand::DrawFooter { page_number } => sink.draw_footer(*page_number)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::layout::{render, LayoutOptions};
    use crate::model::build_blocks;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl CommandSink for Recorder {
        fn new_page(&mut self) -> Result<()> {
            self.events.push("page".to_string());
            Ok(())
        }

        fn draw_header(&mut self, metadata: &DocumentMetadata) -> Result<()> {
            self.events.push(format!("header {}", metadata.school_name));
            Ok(())
        }

        fn draw_line(&mut self, text: &str, _x: f32, _y: f32, _format: &LineFormat) -> Result<()> {
            self.events.push(format!("line {}", text));
            Ok(())
        }

        fn draw_footer(&mut self, page_number: u32) -> Result<()> {
            self.events.push(format!("footer {}", page_number));
            Ok(())
        }
    }

    struct FailOnFooter;

    impl CommandSink for FailOnFooter {
        fn draw_footer(&mut self, _page_number: u32) -> Result<()> {
            Err(Error::Render("footer".to_string()))
        }
    }

    #[test]
    fn test_replay_order() {
        let blocks = build_blocks(&["Q\nA"], &LineFormat::default());
        let mut metadata = DocumentMetadata::default();
        metadata.school_name = "Test School".to_string();
        let commands = render(&blocks, &metadata, &LayoutOptions::default());

        let mut recorder = Recorder::default();
        replay(&commands, &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec!["header Test School", "line 1. Q", "line    A", "footer 1"]
        );
    }

    #[test]
    fn test_replay_stops_on_error() {
        let commands = vec![
            PageCommand::DrawFooter { page_number: 1 },
            PageCommand::NewPage,
        ];
        assert!(replay(&commands, &mut FailOnFooter).is_err());
    }
}
