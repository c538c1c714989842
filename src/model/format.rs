//! Per-line typographic formatting.

use serde::{Deserialize, Serialize};

/// Font size used when nothing else has been chosen, in points.
pub const DEFAULT_FONT_SIZE: f32 = 11.0;

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

impl Alignment {
    /// CSS `text-align` keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl std::str::FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" | "end" => Ok(Alignment::Right),
            other => Err(format!("unknown alignment '{}'", other)),
        }
    }
}

/// Formatting attributes of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFormat {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Font size in points (always > 0)
    pub font_size: f32,

    /// Horizontal alignment
    pub alignment: Alignment,
}

impl LineFormat {
    /// Plain, left-aligned text at the given size.
    ///
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_FONT_SIZE`].
    pub fn with_size(font_size: f32) -> Self {
        Self {
            font_size: sanitize_size(font_size).unwrap_or(DEFAULT_FONT_SIZE),
            ..Self::default()
        }
    }

    /// Apply the `Some` fields of a patch.
    pub fn apply(&mut self, patch: &FormatPatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(size) = patch.font_size.and_then(sanitize_size) {
            self.font_size = size;
        }
        if let Some(alignment) = patch.alignment {
            self.alignment = alignment;
        }
    }

    /// Check if any emphasis is applied.
    pub fn has_emphasis(&self) -> bool {
        self.bold || self.italic
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            font_size: DEFAULT_FONT_SIZE,
            alignment: Alignment::Left,
        }
    }
}

fn sanitize_size(size: f32) -> Option<f32> {
    (size.is_finite() && size > 0.0).then_some(size)
}

/// A partial format update. `None` leaves the attribute untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatPatch {
    /// New bold state
    pub bold: Option<bool>,
    /// New italic state
    pub italic: Option<bool>,
    /// New font size in points
    pub font_size: Option<f32>,
    /// New alignment
    pub alignment: Option<Alignment>,
}

impl FormatPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set font size.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set alignment.
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.font_size.is_none()
            && self.alignment.is_none()
    }
}
