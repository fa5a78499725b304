//! fOS Text Layout - Shaping and Glyph Layout Engine
//!
//! This crate turns a logical run of UTF-16 text into positioned glyphs:
//! - Bidi and script run segmentation, with vertical orientation splitting
//! - Shaping through an ordered list of backends (rustybuzz first)
//! - Cluster reconstruction and per-character width recovery
//! - DX-array justification with Arabic kashida insertion
//! - Detection of characters that need a fallback font

pub mod config;
pub mod font;
pub mod layout;
pub mod shaping;
pub mod text;

pub use config::{LayoutConfig, LayoutFlags};
pub use font::{FontInstance, GlyphBounds, ShapingFont};
pub use layout::{
    apply_asian_kerning, char_widths, Adjustment, FallbackCoordinator, FallbackRange, Justifier,
    KashidaFit, LayoutEngine, VerticalOrientation,
};
pub use shaping::{
    resolve_bidi_runs, BidiRun, BufferFlags, Direction, FallbackShaper, FeatureSettings,
    FontFeature, GlyphFlags, GlyphItem, GlyphSequence, OpenTypeShaper, Point, RawGlyph,
    ScriptRun, ScriptRuns, ShapeRequest, Shaper, ShaperList, SubRun,
};
pub use text::TextBuffer;

/// Text layout error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("No shaper in the list can handle font: {0}")]
    NoShaper(String),

    #[error("Shaping failed: {0}")]
    ShapingFailed(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

pub type Result<T> = std::result::Result<T, TextError>;

#[cfg(test)]
pub(crate) mod testing;
