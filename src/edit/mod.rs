//! Edit/preview mode switching with commit and rollback.
//!
//! While in [`EditMode::Editing`], every block is held as a structured
//! content string produced by a [`StructuredCodec`]. Saving decodes the
//! strings back into lines; cancelling rebuilds the blocks from the raw
//! extracted texts.
//!
//! # Example
//!
//! ```
//! use exampaper::edit::EditController;
//! use exampaper::model::{build_blocks, LineFormat};
//!
//! let raw = ["What is 2+2?\na) 3\nb) 4"];
//! let mut blocks = build_blocks(&raw, &LineFormat::default());
//!
//! let mut editor = EditController::new();
//! editor.begin_edit(&blocks).unwrap();
//! editor
//!     .update_content(0, "<p><strong>1. What is 3+3?</strong></p><p>a) 6</p>")
//!     .unwrap();
//! editor.save(&mut blocks, 11.0).unwrap();
//!
//! assert_eq!(blocks[0].lines.len(), 2);
//! assert_eq!(blocks[0].lines[0].content, "What is 3+3?");
//! ```

mod codec;

pub use codec::{HtmlCodec, ParseError, StructuredCodec};
pub(crate) use codec::escape_html;

use crate::error::{Error, Result};
use crate::model::{build_blocks, LineFormat, TextBlock};

/// Whether blocks are shown read-only or open in the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    /// Blocks are rendered from the model (initial state)
    #[default]
    ReadOnly,
    /// Blocks are held as editor content
    Editing,
}

/// Owner of the edit session state.
#[derive(Debug, Clone)]
pub struct EditController<C: StructuredCodec = HtmlCodec> {
    codec: C,
    mode: EditMode,
    contents: Vec<String>,
    selected: Option<usize>,
}

impl EditController<HtmlCodec> {
    /// Create a controller using the HTML paragraph codec.
    pub fn new() -> Self {
        Self::with_codec(HtmlCodec::new())
    }
}

impl Default for EditController<HtmlCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: StructuredCodec> EditController<C> {
    /// Create a controller with a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            mode: EditMode::ReadOnly,
            contents: Vec::new(),
            selected: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Check if an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// The codec used to encode and decode blocks.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Open an edit session on `blocks`.
    ///
    /// Each block is encoded from its current lines; nothing left over from
    /// an earlier session is reused.
    pub fn begin_edit(&mut self, blocks: &[TextBlock]) -> Result<()> {
        if self.is_editing() {
            return Err(Error::InvalidState(
                "an edit session is already open".to_string(),
            ));
        }
        self.contents = blocks.iter().map(|b| self.codec.serialize(b)).collect();
        self.selected = None;
        self.mode = EditMode::Editing;
        log::debug!("edit session opened on {} blocks", blocks.len());
        Ok(())
    }

    /// Editor content of every block, in block order.
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    /// Editor content of one block.
    pub fn content(&self, block_index: usize) -> Option<&str> {
        self.contents.get(block_index).map(String::as_str)
    }

    /// Replace the editor content of one block.
    pub fn update_content(&mut self, block_index: usize, content: impl Into<String>) -> Result<()> {
        let slot = self.editable_slot(block_index)?;
        *slot = content.into();
        Ok(())
    }

    /// Mark a block as the one being edited.
    pub fn select_block(&mut self, block_index: usize) -> Result<()> {
        self.editable_slot(block_index)?;
        self.selected = Some(block_index);
        Ok(())
    }

    /// The block marked as being edited, if any.
    pub fn selected_block(&self) -> Option<usize> {
        self.selected
    }

    /// Commit the edit session into `blocks`.
    ///
    /// Blocks whose content cannot be decoded, or decodes to no lines, keep
    /// the lines they had before the session. Returns the number of blocks
    /// that were replaced.
    pub fn save(&mut self, blocks: &mut [TextBlock], default_size: f32) -> Result<usize> {
        if !self.is_editing() {
            return Err(Error::InvalidState("no edit session is open".to_string()));
        }

        let mut replaced = 0;
        for (block, content) in blocks.iter_mut().zip(&self.contents) {
            match self
                .codec
                .deserialize(content, block.source_index, default_size)
            {
                Ok(lines) => {
                    block.lines = lines;
                    replaced += 1;
                }
                Err(e) => log::warn!(
                    "keeping previous lines of question {}: {}",
                    block.question_number(),
                    e
                ),
            }
        }

        self.close();
        log::debug!("edit session saved, {} blocks replaced", replaced);
        Ok(replaced)
    }

    /// Discard the edit session and rebuild blocks from the raw texts.
    pub fn cancel<S: AsRef<str>>(
        &mut self,
        raw_texts: &[S],
        default_format: &LineFormat,
    ) -> Result<Vec<TextBlock>> {
        if !self.is_editing() {
            return Err(Error::InvalidState("no edit session is open".to_string()));
        }
        self.close();
        log::debug!("edit session cancelled");
        Ok(build_blocks(raw_texts, default_format))
    }

    /// Leave edit mode without touching any block.
    pub fn discard(&mut self) {
        if self.is_editing() {
            log::debug!("edit session discarded");
        }
        self.close();
    }

    fn close(&mut self) {
        self.mode = EditMode::ReadOnly;
        self.contents.clear();
        self.selected = None;
    }

    fn editable_slot(&mut self, block_index: usize) -> Result<&mut String> {
        if !self.is_editing() {
            return Err(Error::InvalidState("no edit session is open".to_string()));
        }
        let len = self.contents.len();
        self.contents.get_mut(block_index).ok_or(Error::IndexOutOfRange {
            index: block_index,
            len,
        })
    }
}
