//! Text blocks: the ordered lines extracted from one uploaded image.

use serde::{Deserialize, Serialize};

use super::{FormatPatch, LineFormat};

/// One renderable line of text with its own formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Line text (never contains line breaks)
    pub content: String,

    /// Line formatting
    pub format: LineFormat,
}

impl TextLine {
    /// Create a line, folding any embedded line breaks into spaces.
    pub fn new(content: impl Into<String>, format: LineFormat) -> Self {
        Self {
            content: single_line(content.into()),
            format,
        }
    }

    /// Create a line with default formatting.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, LineFormat::default())
    }

    /// Check if the line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// The lines derived from one uploaded image's extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Upload index of the image that produced this block
    pub source_index: usize,

    /// Lines in display order (line 0 is the heading line)
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create an empty block for the given upload index.
    pub fn new(source_index: usize) -> Self {
        Self {
            source_index,
            lines: Vec::new(),
        }
    }

    /// Build a block from raw extracted text.
    ///
    /// Lines that are empty after trimming are dropped; surviving lines keep
    /// their original text and receive a copy of `default_format`.
    pub fn from_raw_text(source_index: usize, raw: &str, default_format: &LineFormat) -> Self {
        let lines = raw
            .split(['\n', '\r'])
            .filter(|line| !line.trim().is_empty())
            .map(|line| TextLine {
                content: line.to_string(),
                format: *default_format,
            })
            .collect();

        Self {
            source_index,
            lines,
        }
    }

    /// The question number shown before the heading line (1-based).
    pub fn question_number(&self) -> usize {
        self.source_index + 1
    }

    /// The label prefixed to the heading line, e.g. `"3. "`.
    pub fn heading_label(&self) -> String {
        format!("{}. ", self.question_number())
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by index.
    pub fn line(&self, index: usize) -> Option<&TextLine> {
        self.lines.get(index)
    }

    /// Apply a format patch to one line.
    ///
    /// Returns `false` and leaves the block untouched if `line_index` is out
    /// of range.
    pub fn set_line_format(&mut self, line_index: usize, patch: &FormatPatch) -> bool {
        match self.lines.get_mut(line_index) {
            Some(line) => {
                line.format.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Replace the text of one line. Out-of-range indices are ignored.
    pub fn set_line_text(&mut self, line_index: usize, content: impl Into<String>) -> bool {
        match self.lines.get_mut(line_index) {
            Some(line) => {
                line.content = single_line(content.into());
                true
            }
            None => false,
        }
    }

    /// Append a line.
    pub fn push_line(&mut self, line: TextLine) {
        self.lines.push(line);
    }

    /// Remove one line, returning it. Out-of-range indices return `None`.
    pub fn remove_line(&mut self, line_index: usize) -> Option<TextLine> {
        (line_index < self.lines.len()).then(|| self.lines.remove(line_index))
    }

    /// Line contents joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build one block per raw text, in input order.
///
/// The output always has the same length as the input, even when a text has
/// no non-blank lines. Calling this again with the same inputs reproduces the
/// same blocks, which is how edits are rolled back.
pub fn build_blocks<S: AsRef<str>>(raw_texts: &[S], default_format: &LineFormat) -> Vec<TextBlock> {
    let blocks: Vec<TextBlock> = raw_texts
        .iter()
        .enumerate()
        .map(|(i, raw)| TextBlock::from_raw_text(i, raw.as_ref(), default_format))
        .collect();

    log::debug!(
        "built {} blocks ({} lines)",
        blocks.len(),
        blocks.iter().map(TextBlock::len).sum::<usize>()
    );
    blocks
}

fn single_line(content: String) -> String {
    if content.contains(['\n', '\r']) {
        content.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        content
    }
}
