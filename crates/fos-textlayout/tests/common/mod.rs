//! Deterministic font and shaper for integration tests
//!
//! Glyph ids are code points, every glyph is 1000 units wide (10 device
//! units at scale 0.01). The shaper can be taught ligatures. DejaVu Sans
//! is bundled for tests that need real OpenType tables.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use fos_textlayout::{
    BufferFlags, Direction, FontFeature, FontInstance, GlyphBounds, LayoutConfig, LayoutEngine,
    RawGlyph, Result, ShapeRequest, Shaper, ShaperList, ShapingFont, TextBuffer,
};

pub const ADVANCE: f64 = 10.0;

pub struct TestFont {
    missing: HashSet<char>,
    advances: HashMap<u32, i32>,
    carets: HashMap<u32, Vec<i32>>,
}

impl TestFont {
    pub fn new() -> Self {
        Self {
            missing: HashSet::new(),
            advances: HashMap::from([(0x0640, 400)]),
            carets: HashMap::new(),
        }
    }

    /// Font lacking `ch`
    pub fn without(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }

    pub fn with_advance(mut self, glyph: u32, advance: i32) -> Self {
        self.advances.insert(glyph, advance);
        self
    }

    pub fn with_carets(mut self, glyph: u32, carets: Vec<i32>) -> Self {
        self.carets.insert(glyph, carets);
        self
    }
}

impl FontInstance for TestFont {
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
        Some(GlyphBounds { top: -700, height: 800 })
    }

    fn h_advance(&self, glyph_id: u32) -> i32 {
        self.advances.get(&glyph_id).copied().unwrap_or(1000)
    }

    fn v_advance(&self, _glyph_id: u32) -> i32 {
        1000
    }

    fn ligature_carets(&self, glyph_id: u32) -> Option<Vec<i32>> {
        self.carets.get(&glyph_id).cloned()
    }

    fn needs_offset_correction(&self, _y_offset: i32) -> bool {
        false
    }

    fn has_vertical_alternate(&self, _ch: char, _variation_selector: Option<char>) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Test"
    }
}

/// One glyph per code point unless a ligature matches
#[derive(Default)]
pub struct TestShaper {
    ligatures: Vec<(Vec<char>, u32)>,
}

impl TestShaper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ligature(mut self, sequence: &str, glyph: u32) -> Self {
        self.ligatures.push((sequence.chars().collect(), glyph));
        self
    }
}

impl Shaper for TestShaper {
    fn name(&self) -> &'static str {
        "test"
    }

    fn can_handle(&self, _font: &dyn FontInstance) -> bool {
        true
    }

    fn shape(&self, font: &dyn FontInstance, request: &ShapeRequest<'_>) -> Result<Vec<RawGlyph>> {
        let kashida = request.flags.contains(BufferFlags::PRODUCE_SAFE_TO_INSERT_KASHIDA);
        let mut chars = Vec::new();
        let mut pos = request.range.start;
        while pos < request.range.end {
            let start = pos;
            match request.text.next_code_point(&mut pos) {
                Some(ch) => chars.push((start, ch)),
                None => break,
            }
        }

        let mut glyphs = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let rest: Vec<char> = chars[i..].iter().map(|&(_, c)| c).collect();
            let ligature = self.ligatures.iter().find(|(seq, _)| rest.starts_with(seq));
            let (glyph_id, consumed) = match ligature {
                Some((seq, glyph)) => (*glyph, seq.len()),
                None => (font.glyph_index(chars[i].1, None), 1),
            };

            let (x_advance, y_advance) = if request.direction.is_vertical() {
                (0, -font.v_advance(glyph_id))
            } else {
                (font.h_advance(glyph_id), 0)
            };
            glyphs.push(RawGlyph {
                glyph_id,
                cluster: chars[i].0,
                x_advance,
                y_advance,
                safe_to_insert_kashida: kashida,
                ..RawGlyph::default()
            });
            i += consumed;
        }

        if request.direction.is_rtl() {
            glyphs.reverse();
        }
        Ok(glyphs)
    }
}

/// What a backend was asked to shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCall {
    pub range: Range<usize>,
    pub direction: Direction,
    pub language: String,
    pub features: Vec<FontFeature>,
    pub flags: BufferFlags,
}

/// Test shaper that keeps a log of every request
pub struct RecordingShaper {
    inner: TestShaper,
    calls: Rc<RefCell<Vec<ShapeCall>>>,
}

impl RecordingShaper {
    /// The shaper and a handle to its call log
    pub fn new() -> (Self, Rc<RefCell<Vec<ShapeCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let shaper = Self {
            inner: TestShaper::new(),
            calls: Rc::clone(&calls),
        };
        (shaper, calls)
    }
}

impl Shaper for RecordingShaper {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn can_handle(&self, _font: &dyn FontInstance) -> bool {
        true
    }

    fn shape(&self, font: &dyn FontInstance, request: &ShapeRequest<'_>) -> Result<Vec<RawGlyph>> {
        self.calls.borrow_mut().push(ShapeCall {
            range: request.range.clone(),
            direction: request.direction,
            language: request.language.to_string(),
            features: request.features.to_vec(),
            flags: request.flags,
        });
        self.inner.shape(font, request)
    }
}

/// DejaVu Sans, for tests that go through rustybuzz
pub const DEJAVU_SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// DejaVu Sans at one device unit per font unit
pub fn dejavu() -> ShapingFont<'static> {
    ShapingFont::parse(DEJAVU_SANS, 0, 2048.0)
        .expect("bundled font parses")
        .with_name("DejaVu Sans")
}

/// Engine over `font` shaping with `shaper`
pub fn engine<'f>(
    font: &'f dyn FontInstance,
    shaper: impl Shaper + 'static,
    config: LayoutConfig,
) -> LayoutEngine<'f> {
    LayoutEngine::new(font, config).with_shapers(ShaperList::new().push(shaper))
}

/// Lay out `text` and return the engine
pub fn layout<'f>(
    font: &'f TestFont,
    shaper: TestShaper,
    config: LayoutConfig,
    text: &TextBuffer,
) -> LayoutEngine<'f> {
    let mut engine = engine(font, shaper, config);
    engine.layout(text, None, None).expect("layout");
    engine
}

/// Install a subscriber so `RUST_LOG` works while debugging tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
