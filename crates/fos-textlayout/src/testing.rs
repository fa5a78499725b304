//! In-memory font for unit tests

use std::collections::{HashMap, HashSet};

use crate::font::{FontInstance, GlyphBounds};

pub(crate) const KASHIDA: char = '\u{0640}';

/// Font with glyph id = code point, 500 unit advances and scale 0.01
pub(crate) struct MockFont {
    missing: HashSet<char>,
    vertical_alternates: HashSet<char>,
    carets: HashMap<u32, Vec<i32>>,
    advances: HashMap<u32, i32>,
    offset_correction: bool,
}

impl MockFont {
    pub(crate) fn new() -> Self {
        Self {
            missing: HashSet::new(),
            vertical_alternates: HashSet::new(),
            carets: HashMap::new(),
            advances: HashMap::from([(KASHIDA as u32, 300)]),
            offset_correction: false,
        }
    }

    pub(crate) fn without(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }

    pub(crate) fn with_vertical_alternate(mut self, ch: char) -> Self {
        self.vertical_alternates.insert(ch);
        self
    }

    pub(crate) fn with_offset_correction(mut self) -> Self {
        self.offset_correction = true;
        self
    }

    pub(crate) fn with_carets(mut self, glyph: u32, carets: Vec<i32>) -> Self {
        self.carets.insert(glyph, carets);
        self
    }

    pub(crate) fn with_advance(mut self, glyph: u32, advance: i32) -> Self {
        self.advances.insert(glyph, advance);
        self
    }
}

impl FontInstance for MockFont {
    fn glyph_index(&self, ch: char, _variation_selector: Option<char>) -> u32 {
        if self.missing.contains(&ch) { 0 } else { ch as u32 }
    }

    fn scale(&self) -> (f64, f64) {
        (0.01, 0.01)
    }

    fn h_extents(&self) -> Option<(i32, i32)> {
        Some((800, -200))
    }

    fn glyph_bounds(&self, _glyph_id: u32) -> Option<GlyphBounds> {
        Some(GlyphBounds {
            top: -700,
            height: 800,
        })
    }

    fn h_advance(&self, glyph_id: u32) -> i32 {
        self.advances.get(&glyph_id).copied().unwrap_or(500)
    }

    fn v_advance(&self, _glyph_id: u32) -> i32 {
        1000
    }

    fn ligature_carets(&self, glyph_id: u32) -> Option<Vec<i32>> {
        self.carets.get(&glyph_id).cloned()
    }

    fn needs_offset_correction(&self, _y_offset: i32) -> bool {
        self.offset_correction
    }

    fn has_vertical_alternate(&self, ch: char, _variation_selector: Option<char>) -> bool {
        self.vertical_alternates.contains(&ch)
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
