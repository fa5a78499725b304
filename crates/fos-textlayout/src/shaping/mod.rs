//! Text Shaping
//!
//! Segmentation of a logical run into uniform sub-runs, invocation of the
//! shaping backends and reconstruction of glyph clusters.

mod bidi;
mod cluster;
mod features;
mod run;
mod script;
mod segment;
mod shaper;

pub use bidi::{clip_bidi_runs, resolve_bidi_runs, BidiRun};
pub use cluster::{AxisTransform, ClusterResolver};
pub use features::{dedup_features, FeatureSettings, FontFeature};
pub use run::{GlyphFlags, GlyphItem, GlyphSequence, Point};
pub use script::{to_shaping_script, ScriptRun, ScriptRuns};
pub use segment::{is_variation_selector, RunSegmenter, SubRun};
pub use shaper::{
    BufferFlags, FallbackShaper, OpenTypeShaper, RawGlyph, ShapeRequest, Shaper, ShaperList,
};

/// Text direction of a sub-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
}

impl Direction {
    /// Horizontal direction for a bidi level
    pub fn horizontal(rtl: bool) -> Self {
        if rtl { Self::RightToLeft } else { Self::LeftToRight }
    }

    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }

    pub fn is_vertical(self) -> bool {
        self == Self::TopToBottom
    }
}

impl From<Direction> for rustybuzz::Direction {
    fn from(d: Direction) -> Self {
        match d {
            Direction::LeftToRight => rustybuzz::Direction::LeftToRight,
            Direction::RightToLeft => rustybuzz::Direction::RightToLeft,
            Direction::TopToBottom => rustybuzz::Direction::TopToBottom,
        }
    }
}
