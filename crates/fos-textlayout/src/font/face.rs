//! Font face backed by rustybuzz

use std::cell::OnceCell;
use std::collections::HashSet;

use rustybuzz::ttf_parser::{GlyphId, Tag};
use rustybuzz::Face;

use super::parser;
use super::{FontInstance, GlyphBounds};
use crate::{Result, TextError};

/// Parsed, sized font face
pub struct ShapingFont<'a> {
    /// The underlying rustybuzz face (derefs to ttf-parser)
    face: Face<'a>,
    /// Pixel size of one em
    size: f32,
    /// Target name, used in log messages
    name: String,
    /// Glyphs that are inputs to `vert` lookups, collected on first use
    vert_glyphs: OnceCell<HashSet<u16>>,
}

impl<'a> ShapingFont<'a> {
    /// Parse a font face from data
    pub fn parse(data: &'a [u8], index: u32, size: f32) -> Result<Self> {
        let face = Face::from_slice(data, index)
            .ok_or_else(|| TextError::FontParsing(format!("face {index} rejected")))?;
        Ok(Self {
            face,
            size,
            name: String::new(),
            vert_glyphs: OnceCell::new(),
        })
    }

    /// Set the name used in log messages
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Units per em
    pub fn units_per_em(&self) -> u16 {
        rustybuzz::ttf_parser::Face::units_per_em(&self.face)
    }

    /// Pixel size
    pub fn size(&self) -> f32 {
        self.size
    }

    fn vertical_glyphs(&self) -> &HashSet<u16> {
        self.vert_glyphs.get_or_init(|| match self.face.tables().gsub {
            Some(gsub) => parser::feature_input_glyphs(&gsub, Tag::from_bytes(b"vert")),
            None => {
                tracing::debug!("No GSUB in {}, no vertical alternates", self.name);
                HashSet::new()
            }
        })
    }
}

impl FontInstance for ShapingFont<'_> {
    fn glyph_index(&self, ch: char, variation_selector: Option<char>) -> u32 {
        let glyph = match variation_selector {
            Some(vs) => self
                .face
                .glyph_variation_index(ch, vs)
                .or_else(|| self.face.glyph_index(ch)),
            None => self.face.glyph_index(ch),
        };
        glyph.map(|g| g.0 as u32).unwrap_or(0)
    }

    fn scale(&self) -> (f64, f64) {
        let upem = self.face.units_per_em().max(1) as f64;
        let scale = self.size as f64 / upem;
        (scale, scale)
    }

    fn h_extents(&self) -> Option<(i32, i32)> {
        Some((self.face.ascender() as i32, self.face.descender() as i32))
    }

    fn glyph_bounds(&self, glyph_id: u32) -> Option<GlyphBounds> {
        let rect = self.face.glyph_bounding_box(GlyphId(glyph_id as u16))?;
        Some(GlyphBounds {
            top: -(rect.y_max as i32),
            height: rect.y_max as i32 - rect.y_min as i32,
        })
    }

    fn h_advance(&self, glyph_id: u32) -> i32 {
        self.face
            .glyph_hor_advance(GlyphId(glyph_id as u16))
            .map(i32::from)
            .unwrap_or(0)
    }

    fn v_advance(&self, glyph_id: u32) -> i32 {
        self.face
            .glyph_ver_advance(GlyphId(glyph_id as u16))
            .map(i32::from)
            .unwrap_or_else(|| self.face.height() as i32)
    }

    fn ligature_carets(&self, glyph_id: u32) -> Option<Vec<i32>> {
        let gdef = self.face.raw_face().table(Tag::from_bytes(b"GDEF"))?;
        parser::ligature_carets(gdef, glyph_id as u16).ok().flatten()
    }

    fn needs_offset_correction(&self, _y_offset: i32) -> bool {
        // Without vmtx the backend synthesizes the vertical origin
        self.face.tables().vmtx.is_none()
    }

    fn has_vertical_alternate(&self, ch: char, variation_selector: Option<char>) -> bool {
        match self.glyph_index(ch, variation_selector) {
            0 => false,
            glyph => self.vertical_glyphs().contains(&(glyph as u16)),
        }
    }

    fn shaping_face(&self) -> Option<&Face<'_>> {
        Some(&self.face)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../tests/fonts/DejaVuSans.ttf");

    fn dejavu() -> ShapingFont<'static> {
        ShapingFont::parse(DEJAVU, 0, 20.48).unwrap().with_name("DejaVu Sans")
    }

    #[test]
    fn test_metrics() {
        let font = dejavu();
        assert_eq!(font.units_per_em(), 2048);
        let (x, y) = font.scale();
        assert!((x - 0.01).abs() < 1e-6 && x == y);
        let (ascent, descent) = font.h_extents().unwrap();
        assert!(ascent > 0 && descent < 0);
    }

    #[test]
    fn test_glyph_lookup() {
        let font = dejavu();
        assert_ne!(font.glyph_index('A', None), 0);
        assert_eq!(font.glyph_index('\u{4E2D}', None), 0);
        assert!(font.h_advance(font.glyph_index('A', None)) > 0);
        assert_ne!(font.kashida_glyph(), 0);
        assert!(font.kashida_width() > 0.0);
    }

    #[test]
    fn test_vertical_support() {
        let font = dejavu();
        // No vmtx table and no vert feature
        assert!(font.needs_offset_correction(0));
        assert!(!font.has_vertical_alternate('A', None));
        assert!(font.shaping_face().is_some());
    }
}
