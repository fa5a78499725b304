//! Run segmentation
//!
//! Splits a bidi run by script and, in vertical layout, by orientation.
//! The sub-runs of a right-to-left bidi run come out reversed so that
//! shaping them in order yields visual order.

use unicode_script::Script;

use super::{BidiRun, Direction, ScriptRuns};
use crate::font::FontInstance;
use crate::layout::VerticalOrientation;
use crate::text::TextBuffer;

/// A range of uniform script, direction and orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRun {
    pub start: usize,
    pub end: usize,
    pub script: Script,
    pub direction: Direction,
}

/// Unicode Variation_Selector property
pub fn is_variation_selector(ch: char) -> bool {
    matches!(
        ch as u32,
        0x180B..=0x180D | 0x180F | 0xFE00..=0xFE0F | 0xE0100..=0xE01EF
    )
}

/// Segments bidi runs into sub-runs
pub struct RunSegmenter<'a> {
    text: &'a TextBuffer,
    scripts: &'a ScriptRuns,
    font: &'a dyn FontInstance,
    language: &'a str,
    vertical: bool,
}

impl<'a> RunSegmenter<'a> {
    pub fn new(
        text: &'a TextBuffer,
        scripts: &'a ScriptRuns,
        font: &'a dyn FontInstance,
        language: &'a str,
        vertical: bool,
    ) -> Self {
        Self {
            text,
            scripts,
            font,
            language,
            vertical,
        }
    }

    /// Sub-runs of one bidi run, in visual order
    pub fn segment(&self, run: &BidiRun) -> Vec<SubRun> {
        let mut sub_runs = Vec::new();
        let base = Direction::horizontal(run.rtl);

        let mut pos = run.start;
        while pos < run.end {
            let (script, script_end) = self.script_span(pos, run.end);
            if self.vertical {
                self.split_vertical(pos, script_end, script, base, &mut sub_runs);
            } else {
                sub_runs.push(SubRun {
                    start: pos,
                    end: script_end,
                    script,
                    direction: base,
                });
            }
            pos = script_end;
        }

        if run.rtl {
            sub_runs.reverse();
        }
        sub_runs
    }

    /// Script at `pos` and where it stops applying, capped at `limit`
    fn script_span(&self, pos: usize, limit: usize) -> (Script, usize) {
        match self.scripts.find(pos).and_then(|i| self.scripts.get(i)) {
            Some(run) => (run.script, run.end.min(limit)),
            None => {
                // Uncovered gap: Common up to the next covered run
                let next = self
                    .scripts
                    .iter()
                    .map(|r| r.start)
                    .filter(|&s| s > pos)
                    .min()
                    .unwrap_or(limit);
                (Script::Common, next.min(limit))
            }
        }
    }

    fn split_vertical(
        &self,
        start: usize,
        end: usize,
        script: Script,
        base: Direction,
        out: &mut Vec<SubRun>,
    ) {
        let first = out.len();
        let mut pos = start;

        while pos < end {
            let char_start = pos;
            let Some(ch) = self.text.next_code_point(&mut pos) else {
                break;
            };

            let mut selector = None;
            if pos < end {
                let mut peek = pos;
                if let Some(next) = self.text.next_code_point(&mut peek) {
                    if is_variation_selector(next) {
                        selector = Some(next);
                        pos = peek;
                    }
                }
            }

            let direction = match VerticalOrientation::of_char(ch, self.language) {
                VerticalOrientation::Upright | VerticalOrientation::TransformedUpright => {
                    Direction::TopToBottom
                }
                VerticalOrientation::TransformedRotated
                    if self.font.has_vertical_alternate(ch, selector) =>
                {
                    Direction::TopToBottom
                }
                _ => base,
            };

            let out_len = out.len();
            match out.last_mut() {
                Some(last) if out_len > first && last.direction == direction => {
                    last.end = pos;
                }
                _ => out.push(SubRun {
                    start: char_start,
                    end: pos,
                    script,
                    direction,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFont;

    fn segment(text: &str, run: BidiRun, vertical: bool) -> Vec<SubRun> {
        let buffer = TextBuffer::from(text);
        let scripts = ScriptRuns::itemize(&buffer, 0..buffer.len());
        let font = MockFont::new();
        RunSegmenter::new(&buffer, &scripts, &font, "ja", vertical).segment(&run)
    }

    #[test]
    fn test_single_script_run() {
        let runs = segment("abc", BidiRun::new(0, 3, false), false);
        assert_eq!(
            runs,
            vec![SubRun {
                start: 0,
                end: 3,
                script: Script::Latin,
                direction: Direction::LeftToRight,
            }]
        );
    }

    #[test]
    fn test_script_change_splits() {
        let runs = segment("ab \u{0641}\u{0644}", BidiRun::new(0, 5, false), false);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (0, 3));
        assert_eq!(runs[1].script, Script::Arabic);
    }

    #[test]
    fn test_rtl_run_reversed() {
        // Arabic then Latin inside one RTL run
        let runs = segment("\u{0641}\u{0644}ab", BidiRun::new(0, 4, true), false);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].script, Script::Latin);
        assert_eq!(runs[1].script, Script::Arabic);
        assert!(runs.iter().all(|r| r.direction == Direction::RightToLeft));
    }

    #[test]
    fn test_vertical_splits_by_orientation() {
        // Two Han ideographs, then Latin
        let runs = segment("\u{4E2D}\u{6587}ab", BidiRun::new(0, 4, false), true);
        let dirs: Vec<_> = runs.iter().map(|r| (r.start, r.end, r.direction)).collect();
        assert_eq!(
            dirs,
            vec![
                (0, 2, Direction::TopToBottom),
                (2, 4, Direction::LeftToRight),
            ]
        );
    }

    #[test]
    fn test_variation_selector_absorbed() {
        let runs = segment("\u{4E2D}\u{FE00}\u{6587}", BidiRun::new(0, 3, false), true);
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].start, runs[0].end), (0, 3));
    }

    #[test]
    fn test_transformed_rotated_needs_vert_alternate() {
        // U+3016 LEFT WHITE LENTICULAR BRACKET is Tr
        let buffer = TextBuffer::from("\u{3016}");
        let scripts = ScriptRuns::itemize(&buffer, 0..1);
        let run = BidiRun::new(0, 1, false);

        let plain = MockFont::new();
        let rotated = RunSegmenter::new(&buffer, &scripts, &plain, "ja", true).segment(&run);
        assert_eq!(rotated[0].direction, Direction::LeftToRight);

        let with_vert = MockFont::new().with_vertical_alternate('\u{3016}');
        let upright = RunSegmenter::new(&buffer, &scripts, &with_vert, "ja", true).segment(&run);
        assert_eq!(upright[0].direction, Direction::TopToBottom);
    }

    #[test]
    fn test_empty_run() {
        assert!(segment("abc", BidiRun::new(2, 2, false), false).is_empty());
    }

    #[test]
    fn test_variation_selectors() {
        assert!(is_variation_selector('\u{FE0F}'));
        assert!(is_variation_selector('\u{E0100}'));
        assert!(!is_variation_selector('a'));
    }
}
