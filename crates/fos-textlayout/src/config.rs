//! Layout configuration

use serde::{Deserialize, Serialize};

use crate::shaping::FontFeature;

bitflags::bitflags! {
    /// Switches that change how a run is laid out
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct LayoutFlags: u32 {
        /// Paragraph base direction is right-to-left
        const BIDI_RTL               = 1 << 0;
        /// Vertical (top-to-bottom) layout
        const VERTICAL               = 1 << 1;
        /// Force `kern` off
        const DISABLE_KERNING        = 1 << 2;
        /// Force `liga` and `clig` off
        const DISABLE_LIGATURES      = 1 << 3;
        /// Layout is a fallback pass; missing glyphs are dropped
        const FOR_FALLBACK           = 1 << 4;
        /// Kashida insertion is allowed during justification
        const KASHIDA_JUSTIFICATION  = 1 << 5;
        /// Compress CJK punctuation when nothing else adjusts the run
        const KERNING_ASIAN          = 1 << 6;
    }
}

/// Layout configuration for one logical run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// BCP 47 language tag
    pub language: String,
    /// Font target name, optionally carrying a `:feature&...` suffix
    pub font_name: String,
    /// Layout flags
    pub flags: LayoutFlags,
    /// First character (code unit) of the layout range
    pub min_char_pos: usize,
    /// End of the layout range; `None` means end of text
    pub end_char_pos: Option<usize>,
    /// Author features, applied after the ones in `font_name`
    pub features: Vec<FontFeature>,
    /// Target line width used when no DX array is supplied
    pub layout_width: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
            font_name: String::new(),
            flags: LayoutFlags::empty(),
            min_char_pos: 0,
            end_char_pos: None,
            features: Vec::new(),
            layout_width: None,
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set language
    pub fn language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Set font target name (may carry features)
    pub fn font_name(mut self, name: &str) -> Self {
        self.font_name = name.to_string();
        self
    }

    /// Set the layout range
    pub fn range(mut self, min: usize, end: usize) -> Self {
        self.min_char_pos = min;
        self.end_char_pos = Some(end);
        self
    }

    /// Right-to-left paragraph
    pub fn rtl(mut self) -> Self {
        self.flags |= LayoutFlags::BIDI_RTL;
        self
    }

    /// Vertical layout
    pub fn vertical(mut self) -> Self {
        self.flags |= LayoutFlags::VERTICAL;
        self
    }

    /// Disable kerning
    pub fn no_kerning(mut self) -> Self {
        self.flags |= LayoutFlags::DISABLE_KERNING;
        self
    }

    /// Disable ligatures
    pub fn no_ligatures(mut self) -> Self {
        self.flags |= LayoutFlags::DISABLE_LIGATURES;
        self
    }

    /// Mark as fallback pass
    pub fn for_fallback(mut self) -> Self {
        self.flags |= LayoutFlags::FOR_FALLBACK;
        self
    }

    /// Allow kashida insertion
    pub fn kashida(mut self) -> Self {
        self.flags |= LayoutFlags::KASHIDA_JUSTIFICATION;
        self
    }

    /// Compress adjacent CJK punctuation
    pub fn asian_kerning(mut self) -> Self {
        self.flags |= LayoutFlags::KERNING_ASIAN;
        self
    }

    /// Add an author feature
    pub fn feature(mut self, feature: FontFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// Set target layout width
    pub fn layout_width(mut self, width: f64) -> Self {
        self.layout_width = Some(width);
        self
    }

    /// Resolved layout range for a text of `len` code units
    pub fn char_range(&self, len: usize) -> std::ops::Range<usize> {
        let end = self.end_char_pos.unwrap_or(len).min(len);
        self.min_char_pos.min(end)..end
    }
}
