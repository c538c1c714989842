//! Character-width estimates and greedy line wrapping.
//!
//! Widths follow the Helvetica metrics of the standard PDF fonts, expressed
//! in thousandths of the font size. Characters outside printable ASCII get
//! an average width; Devanagari vowel signs and other combining marks are
//! treated as zero-width.

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Width used for characters without an explicit entry.
const DEFAULT_UNIT_WIDTH: u16 = 556;

/// Helvetica advance widths for ASCII 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance width of one character in thousandths of the font size.
pub fn char_unit_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_WIDTHS[(c as usize) - 0x20],
        '\t' => HELVETICA_WIDTHS[0] * 4,
        c if is_zero_width(c) => 0,
        '\u{00A0}' => HELVETICA_WIDTHS[0],
        '\u{3000}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7AF}' | '\u{FF00}'..='\u{FFEF}' => 1000,
        _ => DEFAULT_UNIT_WIDTH,
    }
}

fn is_zero_width(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{093C}'
            | '\u{093E}'..='\u{094F}'
            | '\u{0951}'..='\u{0957}'
            | '\u{0962}'..='\u{0963}'
            | '\u{200B}'..='\u{200D}'
            | '\u{FEFF}'
    )
}

/// Sum of the advance widths of `text`, in thousandths of the font size.
pub fn text_units(text: &str) -> u32 {
    text.chars().map(|c| u32::from(char_unit_width(c))).sum()
}

/// Estimated width of `text` in millimetres at `font_size` points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    units_to_mm(text_units(text), font_size)
}

fn units_to_mm(units: u32, font_size: f32) -> f32 {
    units as f32 / 1000.0 * font_size / PT_PER_MM
}

/// Largest unit count that stays strictly inside `max_width` millimetres.
fn max_units(max_width: f32, font_size: f32) -> u32 {
    if font_size <= 0.0 || max_width <= 0.0 {
        return 0;
    }
    let exact = max_width * PT_PER_MM * 1000.0 / font_size;
    (exact * (1.0 - 1e-5)).floor().max(0.0) as u32
}

/// Check if `text` fits within `max_width` millimetres at `font_size`.
pub fn fits(text: &str, font_size: f32, max_width: f32) -> bool {
    text_units(text) <= max_units(max_width, font_size)
}

/// Split `text` into lines no wider than `max_width` millimetres.
///
/// Wrapping is greedy on whitespace. Leading whitespace is kept on the first
/// line only. Words wider than the limit are split between characters. A text
/// that already fits is returned unchanged as a single line.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let limit = max_units(max_width, font_size);
    if text_units(text) <= limit {
        return vec![text.to_string()];
    }

    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    let space = text_units(" ");

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0u32;
    let mut has_word = false;

    let indent_units = text_units(indent);
    if indent_units < limit {
        current.push_str(indent);
        width = indent_units;
    }

    for word in body.split_whitespace() {
        let word_units = text_units(word);
        let sep = if has_word { space } else { 0 };

        if width + sep + word_units <= limit {
            if has_word {
                current.push(' ');
            }
            current.push_str(word);
            width += sep + word_units;
            has_word = true;
            continue;
        }

        if has_word {
            lines.push(std::mem::take(&mut current));
            width = 0;
            has_word = false;
            if word_units <= limit {
                current.push_str(word);
                width = word_units;
                has_word = true;
                continue;
            }
        }

        // Only an indent (or nothing) precedes the word and it still does not
        // fit: break the word between characters.
        let first_char = word.chars().next().map(char_unit_width).unwrap_or(0);
        if width > 0 && width + u32::from(first_char) > limit {
            current.clear();
            width = 0;
        }

        let mut pieces = split_word(word, limit - width, limit);
        let last = pieces.pop().unwrap_or_default();
        for piece in pieces {
            current.push_str(&piece);
            lines.push(std::mem::take(&mut current));
            width = 0;
        }
        width += text_units(&last);
        current.push_str(&last);
        has_word = true;
    }

    if has_word {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split a word into non-empty pieces: the first fits `first_limit` units,
/// the rest fit `limit`. A single character wider than the limit stands
/// alone.
fn split_word(word: &str, first_limit: u32, limit: u32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0u32;
    let mut cap = first_limit;

    for c in word.chars() {
        let w = u32::from(char_unit_width(c));
        if !piece.is_empty() && width + w > cap {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
            cap = limit;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
