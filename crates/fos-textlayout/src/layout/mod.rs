//! Glyph Layout
//!
//! [`LayoutEngine`] drives one logical run through segmentation, shaping
//! and cluster resolution, then applies justification on request.

mod fallback;
mod justify;
mod kerning;
mod vertical;
mod widths;

pub use fallback::{FallbackCoordinator, FallbackRange};
pub use justify::{Justifier, KashidaFit};
pub use kerning::apply_asian_kerning;
pub use vertical::VerticalOrientation;
pub use widths::char_widths;

use std::ops::Range;

use crate::config::{LayoutConfig, LayoutFlags};
use crate::font::FontInstance;
use crate::shaping::{
    clip_bidi_runs, dedup_features, resolve_bidi_runs, BidiRun, BufferFlags, ClusterResolver,
    FeatureSettings, FontFeature, GlyphSequence, Point, RunSegmenter, ScriptRuns, ShapeRequest,
    ShaperList,
};
use crate::text::TextBuffer;
use crate::{Result, TextError};

/// Justification request for a laid out run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustment {
    /// Cumulative target advance per character
    pub dx_array: Option<Vec<f64>>,
    /// Characters after which a kashida may be inserted
    pub kashida: Option<Vec<bool>>,
    /// Target width, used when there is no DX array
    pub layout_width: Option<f64>,
}

impl Adjustment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dx_array(mut self, dx: Vec<f64>) -> Self {
        self.dx_array = Some(dx);
        self
    }

    pub fn kashida(mut self, kashida: Vec<bool>) -> Self {
        self.kashida = Some(kashida);
        self
    }

    pub fn layout_width(mut self, width: f64) -> Self {
        self.layout_width = Some(width);
        self
    }
}

/// Lays out one logical run of text with one font
pub struct LayoutEngine<'f> {
    font: &'f dyn FontInstance,
    shapers: ShaperList,
    config: LayoutConfig,
    range: Range<usize>,
    glyphs: GlyphSequence,
    fallback: FallbackCoordinator,
}

impl<'f> LayoutEngine<'f> {
    /// Create an engine using the default shaper list
    pub fn new(font: &'f dyn FontInstance, config: LayoutConfig) -> Self {
        Self {
            font,
            shapers: ShaperList::default(),
            config,
            range: 0..0,
            glyphs: GlyphSequence::new(),
            fallback: FallbackCoordinator::default(),
        }
    }

    /// Replace the shaper list
    pub fn with_shapers(mut self, shapers: ShaperList) -> Self {
        self.shapers = shapers;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Character range of the last layout
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn glyphs(&self) -> &GlyphSequence {
        &self.glyphs
    }

    pub fn into_glyphs(self) -> GlyphSequence {
        self.glyphs
    }

    /// Ranges that need another font
    pub fn fallback(&self) -> &FallbackCoordinator {
        &self.fallback
    }

    /// Shape `text` over the configured range.
    ///
    /// Bidi and script runs are derived from the text when not supplied.
    /// Bidi runs must be in visual order.
    pub fn layout(
        &mut self,
        text: &TextBuffer,
        bidi: Option<&[BidiRun]>,
        scripts: Option<&ScriptRuns>,
    ) -> Result<()> {
        self.start(text)?;
        if self.range.is_empty() {
            return Ok(());
        }

        let settings = FeatureSettings::parse(&self.config.font_name);
        let language = settings
            .language
            .clone()
            .unwrap_or_else(|| self.config.language.clone());
        let features = self.features(settings);

        let shaper = self.shapers.select(self.font)?;
        tracing::debug!("Shaping {} with {} backend", self.font.name(), shaper.name());

        let bidi_runs = match bidi {
            Some(runs) => clip_bidi_runs(runs, self.range.clone()),
            None => resolve_bidi_runs(
                text,
                self.range.clone(),
                self.config.flags.contains(LayoutFlags::BIDI_RTL),
            ),
        };

        let itemized;
        let scripts = match scripts {
            Some(scripts) => scripts,
            None => {
                itemized = ScriptRuns::itemize(text, self.range.clone());
                &itemized
            }
        };

        let vertical = self.config.flags.contains(LayoutFlags::VERTICAL);
        let for_fallback = self.config.flags.contains(LayoutFlags::FOR_FALLBACK);
        let segmenter = RunSegmenter::new(text, scripts, self.font, &language, vertical);
        let resolver = ClusterResolver::new(self.font, text, for_fallback);
        let mut pen = Point::default();

        for run in &bidi_runs {
            for sub_run in segmenter.segment(run) {
                let mut flags = BufferFlags::PRODUCE_SAFE_TO_INSERT_KASHIDA;
                if sub_run.start == 0 {
                    flags |= BufferFlags::BEGINNING_OF_TEXT;
                }
                if sub_run.end == text.len() {
                    flags |= BufferFlags::END_OF_TEXT;
                }

                let request = ShapeRequest {
                    text,
                    range: sub_run.start..sub_run.end,
                    direction: sub_run.direction,
                    script: sub_run.script,
                    language: &language,
                    features: &features,
                    flags,
                };
                let raw = shaper.shape(self.font, &request)?;
                tracing::debug!(
                    "Sub-run {}..{} {:?} {:?}: {} glyphs",
                    sub_run.start,
                    sub_run.end,
                    sub_run.direction,
                    sub_run.script,
                    raw.len()
                );

                resolver.resolve(&raw, &sub_run, &mut pen, &mut self.glyphs, &mut self.fallback);
            }
        }

        Ok(())
    }

    /// Take over glyphs from an earlier layout of the same text. Nothing is
    /// reshaped, but missing glyphs are still reported for fallback.
    pub fn layout_from_glyphs(&mut self, text: &TextBuffer, glyphs: GlyphSequence) -> Result<()> {
        self.start(text)?;
        self.glyphs = glyphs;
        for glyph in self.glyphs.iter().filter(|g| g.is_missing()) {
            self.fallback.report(text, glyph.char_pos, glyph.is_rtl());
        }
        Ok(())
    }

    /// Apply a DX array if given, else stretch to a layout width, else
    /// compress CJK punctuation when Asian kerning is on
    pub fn adjust_layout(&mut self, text: &TextBuffer, adjustment: &Adjustment) -> Result<()> {
        let justifier = Justifier::new(self.font);
        let flags = self.config.flags;

        if let Some(dx) = &adjustment.dx_array {
            let mut kashida = adjustment.kashida.as_deref();
            if kashida.is_some() && !flags.contains(LayoutFlags::KASHIDA_JUSTIFICATION) {
                tracing::debug!(
                    "Kashida positions for {} ignored, kashida justification is off",
                    self.font.name()
                );
                kashida = None;
            }
            return justifier.apply_dx_array(&mut self.glyphs, self.range.clone(), dx, kashida);
        }

        if let Some(width) = adjustment.layout_width.or(self.config.layout_width) {
            justifier.justify_to_width(&mut self.glyphs, width);
        } else if flags.contains(LayoutFlags::KERNING_ASIAN)
            && !flags.contains(LayoutFlags::VERTICAL)
        {
            apply_asian_kerning(&mut self.glyphs, text);
        }
        Ok(())
    }

    /// Advance of every character in the layout range. Pass the text to
    /// split ligatures across their grapheme clusters.
    pub fn char_widths(&self, text: Option<&TextBuffer>) -> Vec<f64> {
        char_widths(self.glyphs.as_slice(), text, self.font, self.range.clone())
    }

    /// Whether a kashida may go between `char_pos` and `next_char_pos`
    pub fn is_kashida_pos_valid(&self, char_pos: usize, next_char_pos: usize) -> bool {
        self.glyphs.is_kashida_pos_valid(char_pos, next_char_pos)
    }

    fn start(&mut self, text: &TextBuffer) -> Result<()> {
        let len = text.len();
        let end = self.config.end_char_pos.unwrap_or(len);
        if end > len || self.config.min_char_pos > end {
            return Err(TextError::InvalidRange(format!(
                "{}..{} in text of length {}",
                self.config.min_char_pos, end, len
            )));
        }

        self.range = self.config.char_range(len);
        self.glyphs = GlyphSequence::new();
        self.fallback = FallbackCoordinator::new(self.range.clone());
        Ok(())
    }

    /// Forced disables, then name features, then author features
    fn features(&self, settings: FeatureSettings) -> Vec<FontFeature> {
        let mut features = Vec::new();
        if self.config.flags.contains(LayoutFlags::DISABLE_KERNING) {
            tracing::info!("Kerning disabled for {}", self.font.name());
            features.push(FontFeature::disabled(FontFeature::KERN));
        }
        if self.config.flags.contains(LayoutFlags::DISABLE_LIGATURES) {
            tracing::info!("Ligatures disabled for {}", self.font.name());
            features.push(FontFeature::disabled(FontFeature::LIGA));
            features.push(FontFeature::disabled(FontFeature::CLIG));
        }
        features.extend(settings.features);
        features.extend(self.config.features.iter().copied());
        dedup_features(features)
    }
}
