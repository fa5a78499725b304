//! UTF-16 text buffer
//!
//! All positions handed around the layout engine are UTF-16 code unit
//! offsets. The buffer keeps a decoded copy of the text for the Unicode
//! crates that work on `str`, plus the grapheme cluster boundaries
//! converted back to code units.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Text buffer indexed by UTF-16 code units
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Code units as supplied
    units: Vec<u16>,
    /// Decoded text (unpaired surrogates become U+FFFD)
    text: String,
    /// Code unit offset for every byte offset of `text` that starts a char,
    /// plus `text.len()`
    unit_at_byte: Vec<usize>,
    /// Byte offset for every code unit offset (trailing surrogates map to
    /// the byte offset of their char), plus `units.len()`
    byte_at_unit: Vec<usize>,
    /// Extended grapheme cluster boundaries, ascending, always containing
    /// 0 and `units.len()`
    graphemes: Vec<usize>,
}

impl TextBuffer {
    /// Create a buffer from UTF-16 code units
    pub fn from_utf16(units: &[u16]) -> Self {
        let mut text = String::with_capacity(units.len());
        let mut unit_at_byte = Vec::with_capacity(units.len() + 1);
        let mut byte_at_unit = Vec::with_capacity(units.len() + 1);

        let mut unit = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            let ch = decoded.clone().unwrap_or(char::REPLACEMENT_CHARACTER);
            let unit_len = match decoded {
                Ok(c) => c.len_utf16(),
                Err(_) => 1,
            };
            let byte = text.len();
            for _ in 0..unit_len {
                byte_at_unit.push(byte);
            }
            text.push(ch);
            unit_at_byte.resize(text.len(), usize::MAX);
            unit_at_byte[byte] = unit;
            unit += unit_len;
        }
        byte_at_unit.push(text.len());
        unit_at_byte.push(units.len());

        let mut graphemes: Vec<usize> = text
            .grapheme_indices(true)
            .map(|(byte, _)| unit_at_byte[byte])
            .collect();
        graphemes.push(units.len());
        if graphemes[0] != 0 {
            graphemes.insert(0, 0);
        }

        Self {
            units: units.to_vec(),
            text,
            unit_at_byte,
            byte_at_unit,
            graphemes,
        }
    }

    /// Length in code units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Raw code units
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Decoded text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte offset into [`as_str`](Self::as_str) for a code unit offset
    pub fn byte_offset(&self, unit: usize) -> usize {
        self.byte_at_unit[unit.min(self.units.len())]
    }

    /// Code unit offset for a byte offset on a char boundary
    pub fn unit_offset(&self, byte: usize) -> usize {
        let byte = byte.min(self.text.len());
        match self.unit_at_byte[byte] {
            usize::MAX => self.byte_at_unit.partition_point(|&b| b < byte),
            unit => unit,
        }
    }

    /// Decode the code point starting at `pos`, returning it with its
    /// length in code units
    pub fn code_point_at(&self, pos: usize) -> Option<(char, usize)> {
        let first = *self.units.get(pos)?;
        if (0xD800..0xDC00).contains(&first) {
            if let Some(&second) = self.units.get(pos + 1) {
                if (0xDC00..0xE000).contains(&second) {
                    let cp = 0x10000
                        + (((first as u32) - 0xD800) << 10)
                        + ((second as u32) - 0xDC00);
                    return Some((char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER), 2));
                }
            }
        }
        Some((char::from_u32(first as u32).unwrap_or(char::REPLACEMENT_CHARACTER), 1))
    }

    /// Decode the code point at `*pos` and advance `pos` past it
    pub fn next_code_point(&self, pos: &mut usize) -> Option<char> {
        let (ch, len) = self.code_point_at(*pos)?;
        *pos += len;
        Some(ch)
    }

    /// End of the grapheme cluster containing `pos`
    ///
    /// Returns `len()` when `pos` is at or past the end.
    pub fn next_grapheme(&self, pos: usize) -> usize {
        let idx = self.graphemes.partition_point(|&b| b <= pos);
        self.graphemes.get(idx).copied().unwrap_or(self.units.len())
    }

    /// Start of the grapheme cluster that ends at or contains `pos - 1`
    ///
    /// Returns 0 when `pos` is at the start.
    pub fn prev_grapheme(&self, pos: usize) -> usize {
        let idx = self.graphemes.partition_point(|&b| b < pos);
        if idx == 0 {
            0
        } else {
            self.graphemes[idx - 1]
        }
    }

    /// Check whether `pos` is a grapheme cluster boundary
    pub fn is_grapheme_boundary(&self, pos: usize) -> bool {
        self.graphemes.binary_search(&pos).is_ok()
    }

    /// Number of grapheme clusters started inside `range`
    pub fn grapheme_count(&self, range: Range<usize>) -> usize {
        let mut count = 0;
        let mut pos = range.start;
        while pos < range.end {
            pos = self.next_grapheme(pos);
            count += 1;
        }
        count
    }

    /// Decoded text for a code unit range
    pub fn substring(&self, range: Range<usize>) -> &str {
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end.max(range.start));
        &self.text[start..end]
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        Self::from_utf16(&units)
    }
}
