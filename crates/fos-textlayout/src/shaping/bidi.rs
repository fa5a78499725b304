//! Bidirectional runs
//!
//! Runs normally come from the caller's bidi pass. When they don't, they
//! are resolved here with the Unicode Bidirectional Algorithm (UAX #9) and
//! handed out in visual order, as the layout loop expects.

use std::ops::Range;

use unicode_bidi::{BidiInfo, Level};

use crate::text::TextBuffer;

/// A maximal range of uniform resolved direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidiRun {
    /// Start code unit
    pub start: usize,
    /// End code unit (exclusive)
    pub end: usize,
    /// Odd embedding level
    pub rtl: bool,
}

impl BidiRun {
    pub fn new(start: usize, end: usize, rtl: bool) -> Self {
        Self { start, end, rtl }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Resolve the bidi runs of `range`, in visual order
pub fn resolve_bidi_runs(text: &TextBuffer, range: Range<usize>, base_rtl: bool) -> Vec<BidiRun> {
    if range.start >= range.end {
        return Vec::new();
    }

    let base = if base_rtl { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(text.as_str(), Some(base));
    let bytes = text.byte_offset(range.start)..text.byte_offset(range.end);

    let mut runs = Vec::new();
    for para in &info.paragraphs {
        let start = para.range.start.max(bytes.start);
        let end = para.range.end.min(bytes.end);
        if start >= end {
            continue;
        }

        let (levels, level_runs) = info.visual_runs(para, start..end);
        for run in level_runs {
            runs.push(BidiRun {
                start: text.unit_offset(run.start),
                end: text.unit_offset(run.end),
                rtl: levels[run.start].is_rtl(),
            });
        }
    }

    runs
}

/// Clip caller-supplied runs to the layout range, dropping empty ones
pub fn clip_bidi_runs(runs: &[BidiRun], range: Range<usize>) -> Vec<BidiRun> {
    runs.iter()
        .map(|run| BidiRun::new(run.start.max(range.start), run.end.min(range.end), run.rtl))
        .filter(|run| !run.is_empty())
        .collect()
}
