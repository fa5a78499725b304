//! Font capability surface
//!
//! The layout engine never loads fonts itself. Everything it needs from a
//! font goes through [`FontInstance`], which [`ShapingFont`] implements on
//! top of a rustybuzz face.

mod face;
pub mod parser;

pub use face::ShapingFont;

/// Glyph bounding box in font units, y growing downwards from the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphBounds {
    /// Top edge (negative above the baseline)
    pub top: i32,
    /// Box height
    pub height: i32,
}

/// Queries the layout engine makes against a sized font
pub trait FontInstance {
    /// Nominal glyph for a code point, honoring a variation selector.
    /// 0 means the font has no glyph for it.
    fn glyph_index(&self, ch: char, variation_selector: Option<char>) -> u32;

    /// Font units to device units, per axis
    fn scale(&self) -> (f64, f64);

    /// Horizontal ascender and descender in font units (descender negative)
    fn h_extents(&self) -> Option<(i32, i32)>;

    /// Glyph bounding box in font units
    fn glyph_bounds(&self, glyph_id: u32) -> Option<GlyphBounds>;

    /// Horizontal advance in font units
    fn h_advance(&self, glyph_id: u32) -> i32;

    /// Vertical advance in font units
    fn v_advance(&self, glyph_id: u32) -> i32;

    /// Ligature caret positions in font units, visual order
    fn ligature_carets(&self, glyph_id: u32) -> Option<Vec<i32>>;

    /// Whether the backend's vertical offset for a glyph has to be
    /// replaced by one measured from the glyph box
    fn needs_offset_correction(&self, y_offset: i32) -> bool;

    /// Whether the nominal glyph of `ch` is an input to a `vert` lookup
    fn has_vertical_alternate(&self, ch: char, variation_selector: Option<char>) -> bool;

    /// Glyph used for Arabic justification (TATWEEL)
    fn kashida_glyph(&self) -> u32 {
        self.glyph_index('\u{0640}', None)
    }

    /// Natural kashida width in device units; 0 when the font has none
    fn kashida_width(&self) -> f64 {
        match self.kashida_glyph() {
            0 => 0.0,
            glyph => (self.h_advance(glyph) as f64 * self.scale().0).round(),
        }
    }

    /// Face for OpenType shaping, when this font has one
    fn shaping_face(&self) -> Option<&rustybuzz::Face<'_>> {
        None
    }

    /// Name used in log messages
    fn name(&self) -> &str {
        ""
    }
}
