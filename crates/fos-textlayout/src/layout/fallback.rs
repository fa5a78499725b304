//! Fallback coordination
//!
//! Collects the character ranges the font could not render. Each report
//! is widened to whole grapheme clusters and clamped to the layout range.

use std::ops::Range;

use unicode_script::{Script, UnicodeScript};

use crate::text::TextBuffer;

const NARROW_NO_BREAK_SPACE: char = '\u{202F}';

/// A character range to reshape with another font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRange {
    pub start: usize,
    pub end: usize,
    pub rtl: bool,
}

/// Union of the fallback ranges reported during one layout pass
#[derive(Debug, Clone, Default)]
pub struct FallbackCoordinator {
    bounds: Range<usize>,
    ranges: Vec<FallbackRange>,
}

impl FallbackCoordinator {
    /// Coordinator for a layout over `bounds`
    pub fn new(bounds: Range<usize>) -> Self {
        Self {
            bounds,
            ranges: Vec::new(),
        }
    }

    /// Report a missing glyph for the character at `char_pos`
    pub fn report(&mut self, text: &TextBuffer, char_pos: usize, rtl: bool) {
        let cp_len = text.code_point_at(char_pos).map(|(_, len)| len).unwrap_or(1);
        let end = text.next_grapheme(char_pos);
        let mut start = text.prev_grapheme(char_pos + cp_len);

        // Keep a narrow no-break space with the Mongolian text it precedes
        if start > 0 {
            let starts_mongolian = text
                .code_point_at(start)
                .is_some_and(|(ch, _)| ch.script() == Script::Mongolian);
            let after_nnbsp = text
                .code_point_at(start - 1)
                .is_some_and(|(ch, _)| ch == NARROW_NO_BREAK_SPACE);
            if starts_mongolian && after_nnbsp {
                start -= 1;
            }
        }

        let start = start.max(self.bounds.start);
        let end = end.min(self.bounds.end);
        if start >= end {
            return;
        }

        tracing::trace!("Fallback needed for {}..{} (rtl: {})", start, end, rtl);
        self.insert(FallbackRange { start, end, rtl });
    }

    fn insert(&mut self, range: FallbackRange) {
        let at = self.ranges.partition_point(|r| r.start <= range.start);
        self.ranges.insert(at, range);

        let mut merged: Vec<FallbackRange> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last)
                    if range.start < last.end
                        || (range.start == last.end && range.rtl == last.rtl) =>
                {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        self.ranges = merged;
    }

    /// Whether any range needs reshaping
    pub fn has_fallback_work(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Reported ranges, ordered by start
    pub fn ranges(&self) -> &[FallbackRange] {
        &self.ranges
    }

    pub fn bounds(&self) -> Range<usize> {
        self.bounds.clone()
    }

    /// Forget all reports
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character() {
        let text = TextBuffer::from("abc");
        let mut fallback = FallbackCoordinator::new(0..3);
        fallback.report(&text, 1, false);
        assert_eq!(fallback.ranges(), &[FallbackRange { start: 1, end: 2, rtl: false }]);
    }

    #[test]
    fn test_extends_to_grapheme() {
        // e + combining acute, missing base
        let text = TextBuffer::from("xe\u{0301}y");
        let mut fallback = FallbackCoordinator::new(0..4);
        fallback.report(&text, 1, false);
        assert_eq!((fallback.ranges()[0].start, fallback.ranges()[0].end), (1, 3));

        // Missing mark pulls in its base
        let mut fallback = FallbackCoordinator::new(0..4);
        fallback.report(&text, 2, false);
        assert_eq!((fallback.ranges()[0].start, fallback.ranges()[0].end), (1, 3));
    }

    #[test]
    fn test_surrogate_pair() {
        let text = TextBuffer::from("a\u{1F600}b");
        let mut fallback = FallbackCoordinator::new(0..4);
        fallback.report(&text, 1, false);
        assert_eq!((fallback.ranges()[0].start, fallback.ranges()[0].end), (1, 3));
    }

    #[test]
    fn test_clamped_to_bounds() {
        let text = TextBuffer::from("xe\u{0301}y");
        let mut fallback = FallbackCoordinator::new(2..4);
        fallback.report(&text, 2, false);
        assert_eq!((fallback.ranges()[0].start, fallback.ranges()[0].end), (2, 3));
    }

    #[test]
    fn test_adjacent_reports_merge() {
        let text = TextBuffer::from("abcdef");
        let mut fallback = FallbackCoordinator::new(0..6);
        fallback.report(&text, 3, false);
        fallback.report(&text, 1, false);
        fallback.report(&text, 2, false);
        fallback.report(&text, 2, false);
        assert_eq!(fallback.ranges(), &[FallbackRange { start: 1, end: 4, rtl: false }]);
    }

    #[test]
    fn test_direction_change_keeps_ranges_apart() {
        let text = TextBuffer::from("abcd");
        let mut fallback = FallbackCoordinator::new(0..4);
        fallback.report(&text, 1, false);
        fallback.report(&text, 2, true);
        assert_eq!(fallback.ranges().len(), 2);
        fallback.clear();
        assert!(!fallback.has_fallback_work());
    }

    #[test]
    fn test_nnbsp_joins_mongolian() {
        let text = TextBuffer::from("\u{1820}\u{202F}\u{1822}");
        let mut fallback = FallbackCoordinator::new(0..3);
        fallback.report(&text, 2, false);
        assert_eq!((fallback.ranges()[0].start, fallback.ranges()[0].end), (1, 3));
    }
}
