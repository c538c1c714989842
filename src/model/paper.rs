//! The exam paper document: metadata plus question blocks.

use serde::{Deserialize, Serialize};

use super::{build_blocks, DocumentMetadata, FormatPatch, LineFormat, TextBlock};

/// An exam paper ready for preview or export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamPaper {
    /// Header metadata
    pub metadata: DocumentMetadata,

    /// Question blocks in upload order
    pub blocks: Vec<TextBlock>,
}

impl ExamPaper {
    /// Create a paper with no blocks.
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            blocks: Vec::new(),
        }
    }

    /// Create a paper from raw extracted texts, one block per text.
    pub fn from_raw_texts<S: AsRef<str>>(
        metadata: DocumentMetadata,
        raw_texts: &[S],
        default_format: &LineFormat,
    ) -> Self {
        Self {
            metadata,
            blocks: build_blocks(raw_texts, default_format),
        }
    }

    /// Number of question blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of lines over all blocks.
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(TextBlock::len).sum()
    }

    /// Check if the paper has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    /// Get a block by index.
    pub fn block(&self, index: usize) -> Option<&TextBlock> {
        self.blocks.get(index)
    }

    /// Apply a format patch to one line of one block.
    ///
    /// Out-of-range block or line indices leave the paper untouched and
    /// return `false`.
    pub fn set_line_format(
        &mut self,
        block_index: usize,
        line_index: usize,
        patch: &FormatPatch,
    ) -> bool {
        self.blocks
            .get_mut(block_index)
            .is_some_and(|block| block.set_line_format(line_index, patch))
    }

    /// Block texts joined per block, as they would be re-submitted to the
    /// block builder.
    pub fn block_texts(&self) -> Vec<String> {
        self.blocks.iter().map(TextBlock::plain_text).collect()
    }

    /// Plain text of the whole paper, with question labels.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        if i == 0 {
                            format!("{}{}", block.heading_label(), line.content)
                        } else {
                            line.content.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
