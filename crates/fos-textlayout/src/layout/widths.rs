//! Per-character advance widths
//!
//! A glyph's width goes to the character it starts at. Ligatures are split
//! across their grapheme clusters, by ligature carets when the font has a
//! matching set, evenly otherwise.

use std::ops::Range;

use crate::font::FontInstance;
use crate::shaping::GlyphItem;
use crate::text::TextBuffer;

/// Width of every character in `range`, indexed from `range.start`.
///
/// Without `text` no grapheme information is available and ligatures are
/// not split.
pub fn char_widths(
    glyphs: &[GlyphItem],
    text: Option<&TextBuffer>,
    font: &dyn FontInstance,
    range: Range<usize>,
) -> Vec<f64> {
    let mut widths = vec![0.0; range.len()];

    for glyph in glyphs {
        if glyph.char_pos < range.start || glyph.char_pos >= range.end {
            continue;
        }

        let span = glyph.char_pos..(glyph.char_pos + glyph.char_count).min(range.end);
        let graphemes = match text {
            Some(text) if glyph.char_count > 1 && glyph.advance != 0.0 => {
                text.grapheme_count(span.clone())
            }
            _ => 0,
        };

        if graphemes <= 1 {
            widths[glyph.char_pos - range.start] += glyph.advance;
            continue;
        }

        let parts = split_ligature(glyph, graphemes, font);
        let mut pos = span.start;
        for part in parts {
            if pos >= span.end {
                break;
            }
            widths[pos - range.start] += part;
            pos = text.map(|t| t.next_grapheme(pos)).unwrap_or(span.end);
        }
    }

    widths
}

/// Ligature width per grapheme, in logical order
fn split_ligature(glyph: &GlyphItem, graphemes: usize, font: &dyn FontInstance) -> Vec<f64> {
    if let Some(carets) = font
        .ligature_carets(glyph.glyph_id)
        .filter(|c| c.len() == graphemes - 1)
    {
        let (scale, _) = font.scale();
        let mut edges: Vec<f64> = carets
            .iter()
            .map(|&c| c as f64 * scale + glyph.x_offset)
            .collect();
        edges.push(glyph.advance);

        // Carets run left to right
        let mut parts: Vec<f64> = edges
            .iter()
            .scan(0.0, |prev, &edge| {
                let part = edge - *prev;
                *prev = edge;
                Some(part)
            })
            .collect();
        if glyph.is_rtl() {
            parts.reverse();
        }
        return parts;
    }

    let share = (glyph.advance / graphemes as f64).floor();
    let mut parts = vec![share; graphemes];
    parts[graphemes - 1] = glyph.advance - share * (graphemes - 1) as f64;
    parts
}
