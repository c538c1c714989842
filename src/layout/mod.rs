//! Pagination of exam papers into page-drawing commands.

mod metrics;
mod options;
mod paginate;

pub use metrics::{char_unit_width, fits, text_units, text_width, wrap_text, PT_PER_MM};
pub use options::{LayoutOptions, A4_HEIGHT_MM, A4_WIDTH_MM};
pub use paginate::{content_top, page_count, render, render_paper, PageCommand, PageCursor};
