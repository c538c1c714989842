//! Page geometry and fixed layout constants.

use serde::{Deserialize, Serialize};

/// A4 width in millimetres.
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 height in millimetres.
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Options controlling pagination. All lengths are in millimetres, measured
/// from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Margin on every side
    pub margin: f32,

    /// Height of the first-page header region below the top margin
    pub header_height: f32,

    /// Extra height taken by the student name / roll number row
    pub student_fields_height: f32,

    /// Extra height taken by a non-empty instruction line
    pub instructions_height: f32,

    /// Vertical step after a heading line (line 0 of a block)
    pub heading_step: f32,

    /// Vertical step after a body line
    pub body_step: f32,

    /// Gap added after the last line of each block
    pub block_gap: f32,

    /// Offset below the top margin where content resumes after a page break
    pub continuation_offset: f32,

    /// Distance of the page label from the bottom edge
    pub footer_offset: f32,

    /// Prefix for left-aligned body lines
    pub body_indent: String,
}

impl LayoutOptions {
    /// Create A4 layout options with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set heading and body line steps.
    pub fn with_line_steps(mut self, heading: f32, body: f32) -> Self {
        self.heading_step = heading;
        self.body_step = body;
        self
    }

    /// Set the gap between blocks.
    pub fn with_block_gap(mut self, gap: f32) -> Self {
        self.block_gap = gap;
        self
    }

    /// Set the body line indent.
    pub fn with_body_indent(mut self, indent: impl Into<String>) -> Self {
        self.body_indent = indent.into();
        self
    }

    /// Width available for text between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest cursor position at which a line may still be drawn.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Cursor position after a page break.
    pub fn continuation_top(&self) -> f32 {
        self.margin + self.continuation_offset
    }

    /// Check the geometry leaves room for content.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            self.page_width,
            self.page_height,
            self.margin,
            self.heading_step,
            self.body_step,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("layout values must be finite".to_string());
        }
        if self.content_width() <= 0.0 {
            return Err(format!(
                "margin {} leaves no horizontal space on a {} mm wide page",
                self.margin, self.page_width
            ));
        }
        if self.continuation_top() >= self.bottom_limit() {
            return Err("page is too short for its margins".to_string());
        }
        if self.heading_step <= 0.0 || self.body_step <= 0.0 {
            return Err("line steps must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin: 20.0,
            header_height: 50.0,
            student_fields_height: 15.0,
            instructions_height: 15.0,
            heading_step: 7.0,
            body_step: 6.0,
            block_gap: 5.0,
            continuation_offset: 20.0,
            footer_offset: 15.0,
            body_indent: "   ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_page_size(100.0, 200.0)
            .with_margin(10.0)
            .with_line_steps(8.0, 5.0);

        assert_eq!(options.content_width(), 80.0);
        assert_eq!(options.bottom_limit(), 190.0);
        assert_eq!(options.continuation_top(), 30.0);
        assert_eq!(options.heading_step, 8.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        assert!(LayoutOptions::new().with_margin(120.0).validate().is_err());
        assert!(LayoutOptions::new().with_line_steps(0.0, 6.0).validate().is_err());
        assert!(LayoutOptions::new()
            .with_page_size(210.0, 50.0)
            .validate()
            .is_err());
    }
}
