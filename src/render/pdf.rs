//! PDF output using the standard Helvetica fonts.
//!
//! Coordinates arrive in millimetres from the top-left corner and are
//! converted to PDF points from the bottom-left corner. Text is encoded as
//! WinAnsi; characters outside that code page are written as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::sink::{replay, CommandSink};
use crate::error::Result;
use crate::layout::{render_paper, text_width, LayoutOptions, PT_PER_MM};
use crate::model::{Alignment, DocumentMetadata, ExamPaper, LineFormat};

/// School name size in the header, in points.
const TITLE_SIZE: f32 = 22.0;
/// Size of the header detail lines.
const DETAIL_SIZE: f32 = 11.0;
/// Size of the instruction line.
const INSTRUCTION_SIZE: f32 = 10.0;
/// Size of footer text.
const FOOTER_SIZE: f32 = 9.0;
/// Diameter of the logo disc, in millimetres.
const LOGO_SIZE: f32 = 18.0;
/// Distance of the attribution line from the bottom edge, in millimetres.
const ATTRIBUTION_OFFSET: f32 = 10.0;

const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
const RULE_GRAY: Rgb = Rgb(200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0);
const FOOTER_GRAY: Rgb = Rgb(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0);
const LOGO_BLUE: Rgb = Rgb(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0);

#[derive(Debug, Clone, Copy)]
struct Rgb(f32, f32, f32);

/// Face, size and colour used for one piece of text.
#[derive(Debug, Clone, Copy)]
struct Pen {
    face: Face,
    size: f32,
    color: Rgb,
}

impl Pen {
    const fn new(face: Face, size: f32, color: Rgb) -> Self {
        Self { face, size, color }
    }
}

impl Rgb {
    fn operands(self) -> Vec<Object> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

/// The four faces of the Helvetica family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl Face {
    const ALL: [Face; 4] = [Face::Regular, Face::Bold, Face::Oblique, Face::BoldOblique];

    fn for_format(format: &LineFormat) -> Self {
        match (format.bold, format.italic) {
            (false, false) => Face::Regular,
            (true, false) => Face::Bold,
            (false, true) => Face::Oblique,
            (true, true) => Face::BoldOblique,
        }
    }

    fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
            Face::BoldOblique => "F4",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
            Face::BoldOblique => "Helvetica-BoldOblique",
        }
    }
}

/// A [`CommandSink`] that draws into PDF page content streams.
#[derive(Debug)]
pub struct PdfWriter {
    options: LayoutOptions,
    metadata: DocumentMetadata,
    pages: Vec<Vec<Operation>>,
}

impl PdfWriter {
    /// Create a writer with one blank page open.
    pub fn new(options: &LayoutOptions) -> Self {
        let mut writer = Self {
            options: options.clone(),
            metadata: DocumentMetadata::default(),
            pages: Vec::new(),
        };
        writer.open_page();
        writer
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the PDF file.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let id_pages = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for face in Face::ALL {
            let id_font = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), id_font);
        }
        let id_resources = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let id_content = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let id_page = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => id_pages,
                "Contents" => id_content,
                "Resources" => id_resources,
            });
            kids.push(id_page.into());
        }

        let page_count = kids.len();
        doc.set_object(
            id_pages,
            dictionary! {
                "Type" => "Pages",
                "Count" => page_count as i64,
                "Kids" => kids,
                "MediaBox" => vec![
                    0f32.into(),
                    0f32.into(),
                    mm_to_pt(self.options.page_width).into(),
                    mm_to_pt(self.options.page_height).into(),
                ],
            },
        );

        let id_catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => id_pages,
        });
        doc.trailer.set("Root", id_catalog);

        let date = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let title = format!("{} - {}", self.metadata.school_name, self.metadata.subject);
        let id_info = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(&title), StringFormat::Literal),
            "Creator" => Object::string_literal(concat!("exampaper ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(date.clone()),
            "ModDate" => Object::string_literal(date),
        });
        doc.trailer.set("Info", id_info);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        log::debug!("PDF assembled: {} pages, {} bytes", page_count, buffer.len());
        Ok(buffer)
    }

    fn open_page(&mut self) {
        let width = mm_to_pt(self.options.page_width);
        let height = mm_to_pt(self.options.page_height);
        let mut ops = Vec::new();
        ops.push(Operation::new("rg", WHITE.operands()));
        ops.push(Operation::new(
            "re",
            vec![0f32.into(), 0f32.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("f", vec![]));
        self.pages.push(ops);
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.open_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn pdf_y(&self, y: f32) -> f32 {
        mm_to_pt(self.options.page_height - y)
    }

    /// Draw `text` with its left, centre or right edge at `x`.
    fn text(&mut self, text: &str, x: f32, y: f32, align: Alignment, pen: Pen) {
        let left = match align {
            Alignment::Left => x,
            Alignment::Center => x - text_width(text, pen.size) / 2.0,
            Alignment::Right => x - text_width(text, pen.size),
        };
        let (px, py) = (mm_to_pt(left), self.pdf_y(y));
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("rg", pen.color.operands()));
        ops.push(Operation::new(
            "Tf",
            vec![pen.face.resource_name().into(), pen.size.into()],
        ));
        ops.push(Operation::new("Td", vec![px.into(), py.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn rule(&mut self, y: f32) {
        let (x0, x1) = (
            mm_to_pt(self.options.margin),
            mm_to_pt(self.options.page_width - self.options.margin),
        );
        let py = self.pdf_y(y);
        let ops = self.ops();
        ops.push(Operation::new("RG", RULE_GRAY.operands()));
        ops.push(Operation::new("w", vec![mm_to_pt(0.3).into()]));
        ops.push(Operation::new("m", vec![x0.into(), py.into()]));
        ops.push(Operation::new("l", vec![x1.into(), py.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    /// Filled circle approximated by four Bézier curves.
    fn disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        const KAPPA: f32 = 0.552_284_8;
        let (cx, cy, r) = (mm_to_pt(cx), self.pdf_y(cy), mm_to_pt(radius));
        let k = r * KAPPA;
        let curve = |pts: [f32; 6]| Operation::new("c", pts.iter().map(|&v| v.into()).collect());

        let ops = self.ops();
        ops.push(Operation::new("rg", color.operands()));
        ops.push(Operation::new("m", vec![(cx + r).into(), cy.into()]));
        ops.push(curve([cx + r, cy + k, cx + k, cy + r, cx, cy + r]));
        ops.push(curve([cx - k, cy + r, cx - r, cy + k, cx - r, cy]));
        ops.push(curve([cx - r, cy - k, cx - k, cy - r, cx, cy - r]));
        ops.push(curve([cx + k, cy - r, cx + r, cy - k, cx + r, cy]));
        ops.push(Operation::new("f", vec![]));
    }
}

impl CommandSink for PdfWriter {
    fn new_page(&mut self) -> Result<()> {
        self.open_page();
        Ok(())
    }

    fn draw_header(&mut self, metadata: &DocumentMetadata) -> Result<()> {
        self.metadata = metadata.clone();
        let labels = metadata.locale.labels();
        let margin = self.options.margin;
        let width = self.options.page_width;
        let detail = Pen::new(Face::Regular, DETAIL_SIZE, BLACK);

        let school = metadata.school_name.trim().to_string();
        let school_width = text_width(&school, TITLE_SIZE);
        let logo_x = (width - school_width) / 2.0 - LOGO_SIZE - 5.0;
        let (logo_cx, logo_cy) = (logo_x + LOGO_SIZE / 2.0, margin + LOGO_SIZE / 2.0);
        self.disc(logo_cx, logo_cy, LOGO_SIZE / 2.0, LOGO_BLUE);
        let initial: String = school.chars().next().map(String::from).unwrap_or_default();
        self.text(
            &initial,
            logo_cx,
            logo_cy + 2.0,
            Alignment::Center,
            Pen::new(Face::Bold, 14.0, WHITE),
        );
        self.text(
            &school,
            width / 2.0,
            margin + 10.0,
            Alignment::Center,
            Pen::new(Face::Bold, TITLE_SIZE, BLACK),
        );

        self.rule(margin + 20.0);
        self.text(&metadata.class_line(), margin, margin + 30.0, Alignment::Left, detail);
        self.text(
            &metadata.marks_line(),
            width - margin,
            margin + 30.0,
            Alignment::Right,
            detail,
        );
        self.rule(margin + 35.0);

        let mut y = margin + self.options.header_height;
        if metadata.student_fields {
            let name = format!("{}: ____________________________", labels.student_name);
            let roll = format!("{}: ______________", labels.student_roll);
            self.text(&name, margin, y, Alignment::Left, detail);
            self.text(&roll, width - margin - 80.0, y, Alignment::Left, detail);
            y += self.options.student_fields_height;
        }
        if !labels.instructions.trim().is_empty() {
            let pen = Pen::new(Face::Oblique, INSTRUCTION_SIZE, BLACK);
            self.text(labels.instructions, margin, y, Alignment::Left, pen);
        }
        Ok(())
    }

    fn draw_line(&mut self, text: &str, x: f32, y: f32, format: &LineFormat) -> Result<()> {
        let pen = Pen::new(Face::for_format(format), format.font_size, BLACK);
        self.text(text, x, y, format.alignment, pen);
        Ok(())
    }

    fn draw_footer(&mut self, page_number: u32) -> Result<()> {
        let labels = self.metadata.locale.labels();
        let center = self.options.page_width / 2.0;
        let bottom = self.options.page_height;
        let pen = Pen::new(Face::Regular, FOOTER_SIZE, FOOTER_GRAY);

        let page_label = format!("{} {}", labels.page, page_number);
        self.text(
            &page_label,
            center,
            bottom - self.options.footer_offset,
            Alignment::Center,
            pen,
        );
        let attribution = self.metadata.attribution();
        self.text(&attribution, center, bottom - ATTRIBUTION_OFFSET, Alignment::Center, pen);
        Ok(())
    }
}

/// Render a paper to PDF bytes.
pub fn to_pdf(paper: &ExamPaper, options: &LayoutOptions) -> Result<Vec<u8>> {
    let commands = render_paper(paper, options);
    let mut writer = PdfWriter::new(options);
    replay(&commands, &mut writer)?;
    writer.finish()
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Encode text in the WinAnsi code page used by the standard fonts.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => b' ',
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(texts: &[&str]) -> ExamPaper {
        let mut metadata = DocumentMetadata::default();
        metadata.class_name = "Class 10".to_string();
        metadata.subject = "Science".to_string();
        ExamPaper::from_raw_texts(metadata, texts, &LineFormat::default())
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Ab (1)"), b"Ab (1)".to_vec());
        assert_eq!(
            encode_win_ansi("\u{00A9} caf\u{00E9}"),
            vec![0xA9, b' ', b'c', b'a', b'f', 0xE9]
        );
        assert_eq!(encode_win_ansi("\u{2013}\u{2019}"), vec![0x96, 0x92]);
        assert_eq!(encode_win_ansi("\u{0915}"), b"?".to_vec());
    }

    #[test]
    fn test_face_selection() {
        let mut format = LineFormat::default();
        assert_eq!(Face::for_format(&format), Face::Regular);
        format.bold = true;
        format.italic = true;
        assert_eq!(Face::for_format(&format), Face::BoldOblique);
    }

    #[test]
    fn test_single_page_pdf() {
        let paper = paper(&["What is 2+2?\na) 3\nb) 4"]);
        let bytes = to_pdf(&paper, &LayoutOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_per_break() {
        let long = (1..=80).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let p = paper(&[long.as_str()]);
        let options = LayoutOptions::default();
        let expected = crate::layout::page_count(&render_paper(&p, &options));
        assert!(expected > 1);

        let doc = Document::load_mem(&to_pdf(&p, &options).unwrap()).unwrap();
        assert_eq!(doc.get_pages().len(), expected);
    }
}
