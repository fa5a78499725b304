//! Script Itemization
//!
//! Segments text into runs of one Unicode script. Common and Inherited
//! characters (spaces, punctuation, combining marks) join the run around
//! them instead of starting their own.

use std::ops::Range;

use rustybuzz::ttf_parser::Tag;
use unicode_script::{Script, UnicodeScript};

use crate::text::TextBuffer;

/// A maximal range of one script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun {
    /// Start code unit
    pub start: usize,
    /// End code unit (exclusive)
    pub end: usize,
    /// Unicode script
    pub script: Script,
}

/// Script run table covering a text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptRuns {
    runs: Vec<ScriptRun>,
}

impl ScriptRuns {
    /// Wrap caller-supplied runs (must be sorted and contiguous)
    pub fn new(runs: Vec<ScriptRun>) -> Self {
        Self { runs }
    }

    /// Segment `range` of `text` into script runs
    pub fn itemize(text: &TextBuffer, range: Range<usize>) -> Self {
        let mut runs: Vec<ScriptRun> = Vec::new();
        let mut pending_start = range.start;
        let mut current: Option<Script> = None;

        let mut pos = range.start;
        while pos < range.end {
            let char_start = pos;
            let Some(ch) = text.next_code_point(&mut pos) else {
                break;
            };
            let script = ch.script();
            if is_weak(script) {
                continue;
            }
            match current {
                None => current = Some(script),
                Some(cur) if cur != script => {
                    runs.push(ScriptRun {
                        start: pending_start,
                        end: char_start,
                        script: cur,
                    });
                    pending_start = char_start;
                    current = Some(script);
                }
                Some(_) => {}
            }
        }

        if range.start < range.end {
            runs.push(ScriptRun {
                start: pending_start,
                end: range.end,
                script: current.unwrap_or(Script::Common),
            });
        }

        Self { runs }
    }

    /// Index of the run containing `pos`
    pub fn find(&self, pos: usize) -> Option<usize> {
        self.runs.iter().position(|r| r.start <= pos && pos < r.end)
    }

    pub fn get(&self, index: usize) -> Option<&ScriptRun> {
        self.runs.get(index)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptRun> {
        self.runs.iter()
    }
}

fn is_weak(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Convert to the shaping backend's script
pub fn to_shaping_script(script: Script) -> Option<rustybuzz::Script> {
    rustybuzz::Script::from_iso15924_tag(Tag::from_bytes_lossy(script.short_name().as_bytes()))
}
