//! Glyph widths of the PDF base fonts used on labels

/// Millimetres per typographic point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Base-14 fonts the labels are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

// Advance widths in 1/1000 em for ASCII 32..=126 (standard AFM metrics)
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;

impl LabelFont {
    fn char_width(&self, c: char) -> u16 {
        let code = c as u32;
        let index = if (32..=126).contains(&code) {
            Some((code - 32) as usize)
        } else {
            None
        };
        match self {
            LabelFont::Courier => COURIER_WIDTH,
            LabelFont::Helvetica => index.map_or(556, |i| HELVETICA[i]),
            LabelFont::HelveticaBold => index.map_or(611, |i| HELVETICA_BOLD[i]),
        }
    }

    /// Rendered width of `text` in millimetres at `size_pt`
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 / 1000.0 * size_pt * MM_PER_PT
    }

    /// Largest size, stepping down by half a point from `max_pt`, at which
    /// `text` fits in `max_width_mm`; never below `min_pt`
    pub fn fit_size(&self, text: &str, max_width_mm: f32, max_pt: f32, min_pt: f32) -> f32 {
        let mut size = max_pt;
        while size > min_pt && self.text_width_mm(text, size) > max_width_mm {
            size -= 0.5;
        }
        size.max(min_pt)
    }
}

/// Split words into two lines: the first holds words while they fit, the
/// rest goes to the second line
pub fn wrap_two_lines(
    text: &str,
    font: LabelFont,
    size_pt: f32,
    max_width_mm: f32,
) -> (String, String) {
    let mut first = String::new();
    let mut second = String::new();

    for word in text.split_whitespace() {
        let candidate = if first.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", first, word)
        };
        if second.is_empty() && font.text_width_mm(&candidate, size_pt) < max_width_mm {
            first = candidate;
        } else {
            if !second.is_empty() {
                second.push(' ');
            }
            second.push_str(word);
        }
    }

    (first, second)
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
