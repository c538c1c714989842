//! Conversion between text blocks and rich-text editor markup.
//!
//! The editor works on HTML paragraphs. Each line becomes one `<p>` whose
//! `style` attribute carries the line format; the heading paragraph is
//! wrapped in `<strong>` with its question label, body paragraphs are
//! indented with four non-breaking spaces.

use regex::Regex;
use thiserror::Error;

use crate::model::{Alignment, LineFormat, TextBlock, TextLine};

/// Error decoding structured content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No paragraph elements were found.
    #[error("content contains no paragraphs")]
    NoParagraphs,

    /// Paragraphs were found but all of them are blank.
    #[error("content contains only blank paragraphs")]
    Blank,
}

/// Two-way adapter between a block and the editor's content string.
pub trait StructuredCodec: Send + Sync {
    /// Encode a block for the editor.
    fn serialize(&self, block: &TextBlock) -> String;

    /// Decode editor content into lines.
    ///
    /// `source_index` identifies the block so its question label can be
    /// stripped; `default_size` is used for paragraphs without a font size.
    fn deserialize(
        &self,
        content: &str,
        source_index: usize,
        default_size: f32,
    ) -> std::result::Result<Vec<TextLine>, ParseError>;
}

/// Indent written before body paragraphs.
const BODY_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Codec for the editor's paragraph markup.
#[derive(Debug, Clone)]
pub struct HtmlCodec {
    paragraph: Regex,
    style_attr: Regex,
    class_attr: Regex,
    strong_tag: Regex,
    em_tag: Regex,
    line_break: Regex,
    any_tag: Regex,
    entity: Regex,
}

impl HtmlCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self {
            paragraph: Regex::new(r"(?is)<p\b([^>]*)>(.*?)</p\s*>").unwrap(),
            style_attr: Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap(),
            class_attr: Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap(),
            strong_tag: Regex::new(r"(?i)<(?:strong|b)(?:\s[^>]*)?>").unwrap(),
            em_tag: Regex::new(r"(?i)<(?:em|i)(?:\s[^>]*)?>").unwrap(),
            line_break: Regex::new(r"(?i)<br\s*/?>").unwrap(),
            any_tag: Regex::new(r"<[^>]*>").unwrap(),
            entity: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|nbsp|amp|lt|gt|quot|apos);").unwrap(),
        }
    }

    fn paragraph_format(&self, attrs: &str, inner: &str, default_size: f32) -> LineFormat {
        let mut format = LineFormat::with_size(default_size);
        format.bold = self.strong_tag.is_match(inner);
        format.italic = self.em_tag.is_match(inner);

        if let Some(classes) = attr_value(&self.class_attr, attrs) {
            for class in classes.split_whitespace() {
                match class {
                    "ql-align-center" => format.alignment = Alignment::Center,
                    "ql-align-right" => format.alignment = Alignment::Right,
                    _ => {}
                }
            }
        }

        if let Some(style) = attr_value(&self.style_attr, attrs) {
            apply_style(&mut format, style);
        }
        format
    }

    fn paragraph_text(&self, inner: &str) -> String {
        let text = self.line_break.replace_all(inner, " ");
        let text = self.any_tag.replace_all(&text, "");
        self.entity
            .replace_all(&text, |caps: &regex::Captures| decode_entity(&caps[1]))
            .into_owned()
    }
}

impl Default for HtmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredCodec for HtmlCodec {
    fn serialize(&self, block: &TextBlock) -> String {
        let mut html = String::new();
        for (index, line) in block.lines.iter().enumerate() {
            html.push_str("<p style=\"");
            html.push_str(&style_for(&line.format));
            html.push_str("\">");
            if index == 0 {
                html.push_str("<strong>");
                html.push_str(&escape_html(&block.heading_label()));
                html.push_str(&escape_html(&line.content));
                html.push_str("</strong>");
            } else {
                html.push_str(BODY_INDENT);
                html.push_str(&escape_html(&line.content));
            }
            html.push_str("</p>");
        }
        html
    }

    fn deserialize(
        &self,
        content: &str,
        source_index: usize,
        default_size: f32,
    ) -> std::result::Result<Vec<TextLine>, ParseError> {
        let label = format!("{}.", source_index + 1);
        let mut found = false;
        let mut lines = Vec::new();

        for (index, caps) in self.paragraph.captures_iter(content).enumerate() {
            found = true;
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let inner = caps.get(2).map_or("", |m| m.as_str());

            let mut text = self.paragraph_text(inner);
            if index == 0 {
                text = strip_label(&text, &label).to_string();
            }
            let text = text.trim_start();
            if text.trim_end().is_empty() {
                continue;
            }

            let format = self.paragraph_format(attrs, inner, default_size);
            lines.push(TextLine::new(text, format));
        }

        if !found {
            return Err(ParseError::NoParagraphs);
        }
        if lines.is_empty() {
            return Err(ParseError::Blank);
        }
        Ok(lines)
    }
}

/// Inline style declaring every format attribute.
fn style_for(format: &LineFormat) -> String {
    format!(
        "font-size: {}pt; font-weight: {}; font-style: {}; text-align: {};",
        format.font_size,
        if format.bold { "bold" } else { "normal" },
        if format.italic { "italic" } else { "normal" },
        format.alignment.as_css(),
    )
}

fn apply_style(format: &mut LineFormat, style: &str) {
    for declaration in style.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match name.trim().to_ascii_lowercase().as_str() {
            "font-size" => {
                if let Some(size) = parse_font_size(&value) {
                    format.font_size = size;
                }
            }
            "font-weight" => {
                format.bold = match value.as_str() {
                    "bold" | "bolder" => true,
                    other => other.parse::<u16>().is_ok_and(|w| w >= 600),
                };
            }
            "font-style" => format.italic = matches!(value.as_str(), "italic" | "oblique"),
            "text-align" => {
                format.alignment = match value.as_str() {
                    "center" => Alignment::Center,
                    "right" => Alignment::Right,
                    _ => Alignment::Left,
                };
            }
            _ => {}
        }
    }
}

fn parse_font_size(value: &str) -> Option<f32> {
    let (number, scale) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else {
        (value, 1.0)
    };
    let size = number.trim().parse::<f32>().ok()? * scale;
    (size.is_finite() && size > 0.0).then_some(size)
}

fn attr_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    let caps = re.captures(attrs)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Remove a leading `"N."` question label followed by whitespace.
fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    match text.strip_prefix(label) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => text,
    }
}

/// Decode one entity body (the text between `&` and `;`).
fn decode_entity(entity: &str) -> String {
    let decoded = match entity {
        "nbsp" => Some('\u{00A0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = &entity[1..];
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => number.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }
    };
    decoded.map(String::from).unwrap_or_default()
}

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
