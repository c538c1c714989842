//! Standalone HTML print preview.
//!
//! The browser lays the page out itself, so this output is built from the
//! paper directly rather than from page commands. Unlike the PDF output it
//! keeps every script intact, including Devanagari.

use crate::edit::escape_html;
use crate::layout::LayoutOptions;
use crate::model::{DocumentMetadata, ExamPaper, TextBlock, TextLine};

/// Render a paper as a printable HTML document.
pub fn to_html(paper: &ExamPaper, options: &LayoutOptions) -> String {
    let metadata = &paper.metadata;
    let labels = metadata.locale.labels();
    let lang = match metadata.locale {
        crate::locale::Locale::Hindi => "hi",
        crate::locale::Locale::English => "en",
    };

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n<head>\n", lang));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(&metadata.export_file_stem())
    ));
    html.push_str(&stylesheet(options));
    html.push_str("</head>\n<body>\n<main class=\"paper\">\n");

    push_header(&mut html, metadata);

    html.push_str("<section class=\"questions\">\n");
    for block in paper.blocks.iter().filter(|b| !b.is_empty()) {
        push_block(&mut html, block);
    }
    html.push_str("</section>\n");

    html.push_str("<footer>\n");
    html.push_str(&format!(
        "<p class=\"title\">{}</p>\n",
        escape_html(labels.preview_title)
    ));
    html.push_str(&format!(
        "<p class=\"attribution\">{}</p>\n",
        escape_html(&metadata.attribution())
    ));
    html.push_str("</footer>\n</main>\n</body>\n</html>\n");
    html
}

fn stylesheet(options: &LayoutOptions) -> String {
    format!(
        r#"<style>
@page {{ size: {width}mm {height}mm; margin: {margin}mm; }}
body {{ font-family: Helvetica, Arial, "Noto Sans Devanagari", sans-serif; color: #000; background: #fff; }}
.paper {{ max-width: {content}mm; margin: 0 auto; }}
header h1 {{ text-align: center; font-size: 22pt; margin: 0 0 4mm; }}
header .details {{ display: flex; justify-content: space-between; border-top: 0.3mm solid #c8c8c8; border-bottom: 0.3mm solid #c8c8c8; padding: 2mm 0; font-size: 11pt; }}
header .student {{ display: flex; justify-content: space-between; margin-top: 6mm; font-size: 11pt; }}
.question {{ margin-bottom: {gap}mm; break-inside: avoid; }}
.question p {{ margin: 0 0 1mm; white-space: pre-wrap; }}
.question p.body {{ padding-left: 6mm; }}
footer {{ text-align: center; font-size: 9pt; color: #646464; margin-top: 10mm; }}
footer .title {{ display: none; }}
@media print {{
  footer {{ position: fixed; bottom: 0; left: 0; right: 0; }}
}}
</style>
"#,
        width = options.page_width,
        height = options.page_height,
        margin = options.margin,
        content = options.content_width(),
        gap = options.block_gap,
    )
}

fn push_header(html: &mut String, metadata: &DocumentMetadata) {
    let labels = metadata.locale.labels();
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n",
        escape_html(metadata.school_name.trim())
    ));
    html.push_str("<div class=\"details\">\n");
    html.push_str(&format!(
        "<span>{}</span>\n<span>{}</span>\n",
        escape_html(&metadata.class_line()),
        escape_html(&metadata.marks_line())
    ));
    html.push_str("</div>\n");
    if metadata.student_fields {
        html.push_str(&format!(
            "<div class=\"student\">\n<span>{}: ____________________</span>\n<span>{}: __________</span>\n</div>\n",
            escape_html(labels.student_name),
            escape_html(labels.student_roll)
        ));
    }
    if !labels.instructions.trim().is_empty() {
        html.push_str(&format!(
            "<p class=\"instructions\"><em>{}</em></p>\n",
            escape_html(labels.instructions)
        ));
    }
    html.push_str("</header>\n");
}

fn push_block(html: &mut String, block: &TextBlock) {
    html.push_str("<div class=\"question\">\n");
    for (index, line) in block.lines.iter().enumerate() {
        let (class, text) = if index == 0 {
            ("heading", format!("{}{}", block.heading_label(), line.content))
        } else {
            ("body", line.content.clone())
        };
        html.push_str(&format!(
            "<p class=\"{}\" style=\"{}\">{}</p>\n",
            class,
            line_style(line),
            escape_html(&text)
        ));
    }
    html.push_str("</div>\n");
}

fn line_style(line: &TextLine) -> String {
    let format = &line.format;
    format!(
        "font-size: {}pt; font-weight: {}; font-style: {}; text-align: {};",
        format.font_size,
        if format.bold { "bold" } else { "normal" },
        if format.italic { "italic" } else { "normal" },
        format.alignment.as_css()
    )
}
