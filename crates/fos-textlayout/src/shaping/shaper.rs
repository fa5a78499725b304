//! Shaping backends
//!
//! A backend turns one sub-run into raw glyph records in font units. The
//! engine asks an ordered [`ShaperList`] for the first backend that can
//! handle the font.

use std::ops::Range;
use std::str::FromStr;

use rustybuzz::UnicodeBuffer;
use unicode_script::Script;

use super::script::to_shaping_script;
use super::{is_variation_selector, Direction, FontFeature};
use crate::font::FontInstance;
use crate::text::TextBuffer;
use crate::{Result, TextError};

bitflags::bitflags! {
    /// Buffer flags passed with a shaping request
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BufferFlags: u8 {
        /// The sub-run starts at the beginning of the text
        const BEGINNING_OF_TEXT               = 1 << 0;
        /// The sub-run ends at the end of the text
        const END_OF_TEXT                     = 1 << 1;
        /// Report where a kashida may be inserted
        const PRODUCE_SAFE_TO_INSERT_KASHIDA  = 1 << 2;
    }
}

/// One sub-run to shape
#[derive(Debug, Clone)]
pub struct ShapeRequest<'a> {
    pub text: &'a TextBuffer,
    pub range: Range<usize>,
    pub direction: Direction,
    pub script: Script,
    pub language: &'a str,
    pub features: &'a [FontFeature],
    pub flags: BufferFlags,
}

/// Glyph record as returned by a backend, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawGlyph {
    pub glyph_id: u32,
    /// Code unit index of the first character of the cluster
    pub cluster: usize,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub unsafe_to_break: bool,
    pub safe_to_insert_kashida: bool,
}

/// A shaping backend
pub trait Shaper {
    /// Backend name, used in log messages
    fn name(&self) -> &'static str;

    /// Whether this backend can shape with `font`
    fn can_handle(&self, font: &dyn FontInstance) -> bool;

    /// Shape one sub-run. Glyphs come back in visual order.
    fn shape(&self, font: &dyn FontInstance, request: &ShapeRequest<'_>) -> Result<Vec<RawGlyph>>;
}

/// OpenType shaping through rustybuzz
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenTypeShaper;

impl OpenTypeShaper {
    pub fn new() -> Self {
        Self
    }
}

impl Shaper for OpenTypeShaper {
    fn name(&self) -> &'static str {
        "opentype"
    }

    fn can_handle(&self, font: &dyn FontInstance) -> bool {
        font.shaping_face().is_some()
    }

    fn shape(&self, font: &dyn FontInstance, request: &ShapeRequest<'_>) -> Result<Vec<RawGlyph>> {
        let face = font.shaping_face().ok_or_else(|| {
            TextError::ShapingFailed(format!("{} has no OpenType face", font.name()))
        })?;

        let text = request.text;
        let mut buffer = UnicodeBuffer::new();
        buffer.set_pre_context(text.substring(0..request.range.start));

        // Clusters are absolute code unit indices
        let mut pos = request.range.start;
        while pos < request.range.end {
            let cluster = pos;
            let Some(ch) = text.next_code_point(&mut pos) else {
                break;
            };
            buffer.add(ch, cluster as u32);
        }

        // `add` clears the post-context, so it goes in last
        buffer.set_post_context(text.substring(request.range.end..text.len()));

        buffer.set_direction(request.direction.into());
        if let Some(script) = to_shaping_script(request.script) {
            buffer.set_script(script);
        }
        if let Ok(language) = rustybuzz::Language::from_str(request.language) {
            buffer.set_language(language);
        }

        let mut flags = rustybuzz::BufferFlags::empty();
        if request.flags.contains(BufferFlags::BEGINNING_OF_TEXT) {
            flags |= rustybuzz::BufferFlags::BEGINNING_OF_TEXT;
        }
        if request.flags.contains(BufferFlags::END_OF_TEXT) {
            flags |= rustybuzz::BufferFlags::END_OF_TEXT;
        }
        buffer.set_flags(flags);
        buffer.guess_segment_properties();

        let features: Vec<rustybuzz::Feature> =
            request.features.iter().map(FontFeature::to_rustybuzz).collect();

        let output = rustybuzz::shape(face, &features, buffer);

        // rustybuzz reports no tatweel positions; every glyph is offered
        // and ligature interiors are filtered by the caller
        let kashida = request.flags.contains(BufferFlags::PRODUCE_SAFE_TO_INSERT_KASHIDA);

        Ok(output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| RawGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster as usize,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                unsafe_to_break: info.unsafe_to_break(),
                safe_to_insert_kashida: kashida,
            })
            .collect())
    }
}

/// Last-resort backend: nominal glyph per code point, no layout tables
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackShaper;

impl FallbackShaper {
    pub fn new() -> Self {
        Self
    }
}

impl Shaper for FallbackShaper {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn can_handle(&self, _font: &dyn FontInstance) -> bool {
        true
    }

    fn shape(&self, font: &dyn FontInstance, request: &ShapeRequest<'_>) -> Result<Vec<RawGlyph>> {
        let text = request.text;
        let mut glyphs = Vec::with_capacity(request.range.len());

        let mut pos = request.range.start;
        while pos < request.range.end {
            let cluster = pos;
            let Some(ch) = text.next_code_point(&mut pos) else {
                break;
            };

            let mut selector = None;
            if let Some((next, len)) = text.code_point_at(pos) {
                if pos < request.range.end && is_variation_selector(next) {
                    selector = Some(next);
                    pos += len;
                }
            }

            let glyph_id = font.glyph_index(ch, selector);
            let (x_advance, y_advance) = if request.direction.is_vertical() {
                (0, -font.v_advance(glyph_id))
            } else {
                (font.h_advance(glyph_id), 0)
            };

            glyphs.push(RawGlyph {
                glyph_id,
                cluster,
                x_advance,
                y_advance,
                ..RawGlyph::default()
            });
        }

        if request.direction.is_rtl() {
            glyphs.reverse();
        }
        Ok(glyphs)
    }
}

/// Backends in order of preference
pub struct ShaperList {
    shapers: Vec<Box<dyn Shaper>>,
}

impl ShaperList {
    /// An empty list
    pub fn new() -> Self {
        Self {
            shapers: Vec::new(),
        }
    }

    /// Append a backend at the lowest preference
    pub fn push(mut self, shaper: impl Shaper + 'static) -> Self {
        self.shapers.push(Box::new(shaper));
        self
    }

    pub fn len(&self) -> usize {
        self.shapers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapers.is_empty()
    }

    /// First backend that can handle `font`
    pub fn select(&self, font: &dyn FontInstance) -> Result<&dyn Shaper> {
        self.shapers
            .iter()
            .map(|s| s.as_ref())
            .find(|s| s.can_handle(font))
            .ok_or_else(|| TextError::NoShaper(font.name().to_string()))
    }
}

impl Default for ShaperList {
    fn default() -> Self {
        Self::new().push(OpenTypeShaper::new()).push(FallbackShaper::new())
    }
}
