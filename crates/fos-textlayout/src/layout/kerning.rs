//! Asian punctuation compression
//!
//! Full-width CJK punctuation carries blank space on one side of its em
//! box. Where two such marks meet, the blank between them is squeezed out
//! following the JIS X 4051 spacing classes.

use crate::shaping::GlyphSequence;
use crate::text::TextBuffer;

/// Spacing class for U+3000..U+302F, in quarters of the glyph width.
/// Negative: blank on the trailing side, positive: on the leading side.
const CJK_SYMBOLS: [i8; 0x30] = [
    0, -2, -2, 0, 0, 0, 0, 0, 2, -2, 2, -2, 2, -2, 2, -2, //
    2, -2, 0, 0, 2, -2, 2, -2, 0, 0, 0, 0, 0, 2, -2, -2, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -2, -2, 2, 2, -2, -2, //
];

fn spacing_class(c: u16, leading: bool) -> i8 {
    match c {
        0x3000..0x3030 => CJK_SYMBOLS[(c - 0x3000) as usize],
        // Katakana middle dot: a quarter on each side
        0x30FB => {
            if leading {
                -1
            } else {
                1
            }
        }
        0x2019 | 0x201D | 0xFF01 | 0xFF09 | 0xFF0C | 0xFF1A | 0xFF1B => -2,
        0xFF08 => 2,
        _ => 0,
    }
}

fn is_compressible(c: u16) -> bool {
    c & 0xFF00 == 0x3000 || c & 0xFF00 == 0xFF00 || c & 0xFFF0 == 0x2010
}

/// Width change for `current` followed by `next`, in quarters of the
/// width of `current`. Only compression is reported.
fn compression(current: u16, next: u16) -> Option<i8> {
    if !is_compressible(current) || !is_compressible(next) {
        return None;
    }

    let kern_current = spacing_class(current, true);
    let kern_next = -spacing_class(next, false);
    if kern_current == 0 || kern_next == 0 {
        return None;
    }

    let delta = kern_current.min(kern_next);
    (delta < 0).then_some(delta)
}

/// Compress CJK punctuation pairs in a horizontal run. Glyphs after a
/// compressed one move back by the width removed.
pub fn apply_asian_kerning(glyphs: &mut GlyphSequence, text: &TextBuffer) {
    let units = text.units();
    let mut offset = 0.0;

    for glyph in glyphs.as_mut_slice() {
        glyph.shift_x(offset);
        if glyph.is_in_cluster() {
            continue;
        }

        let pos = glyph.char_pos;
        let (Some(&current), Some(&next)) = (units.get(pos), units.get(pos + 1)) else {
            continue;
        };
        if let Some(delta) = compression(current, next) {
            let width = f64::from(delta) * glyph.natural_advance / 4.0;
            glyph.add_width(width);
            offset += width;
        }
    }

    if offset != 0.0 {
        tracing::debug!("Asian punctuation compression removed {}", -offset);
    }
}
