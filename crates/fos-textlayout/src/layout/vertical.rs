//! Vertical Text Orientation
//!
//! Classifies code points by the Unicode Vertical_Orientation property
//! (UAX #50), with the Chinese overrides for fullwidth colon and semicolon
//! and the Bopomofo tone marks.
//!
//! Lookups go through a two-level page table built once per process from
//! `unicode-vo`; identical pages are stored once.

use std::collections::HashMap;
use std::sync::OnceLock;

use unicode_vo::Orientation;

/// How a character is set in vertical text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalOrientation {
    /// Upright, same orientation as in the code charts
    Upright,
    /// Rotated 90° clockwise
    Rotated,
    /// Upright using a vertical alternate glyph
    TransformedUpright,
    /// Vertical alternate if the font has one, rotated otherwise
    TransformedRotated,
}

impl VerticalOrientation {
    /// Classify a code point for a BCP 47 language tag
    pub fn classify(code_point: u32, language: &str) -> Self {
        if code_point > MAX_CODE_POINT {
            tracing::warn!("Code point {:#x} outside Unicode range", code_point);
            return Self::Rotated;
        }

        if is_chinese(language) && ZH_UPRIGHT.contains(&code_point) {
            return Self::TransformedUpright;
        }

        table().get(code_point)
    }

    /// Classify a character
    pub fn of_char(ch: char, language: &str) -> Self {
        Self::classify(ch as u32, language)
    }

    /// Whether characters of this class may be set top-to-bottom
    pub fn is_upright(self) -> bool {
        matches!(self, Self::Upright | Self::TransformedUpright)
    }

    fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Upright,
            2 => Self::TransformedUpright,
            3 => Self::TransformedRotated,
            _ => Self::Rotated,
        }
    }

    fn code(self) -> u8 {
        match self {
            Self::Upright => 0,
            Self::Rotated => 1,
            Self::TransformedUpright => 2,
            Self::TransformedRotated => 3,
        }
    }
}

impl From<Orientation> for VerticalOrientation {
    fn from(o: Orientation) -> Self {
        match o {
            Orientation::Upright => Self::Upright,
            Orientation::Rotated => Self::Rotated,
            Orientation::TransformedOrUpright => Self::TransformedUpright,
            Orientation::TransformedOrRotated => Self::TransformedRotated,
        }
    }
}

const MAX_CODE_POINT: u32 = 0x10FFFF;
const PAGE_BITS: u32 = 8;
const PAGE_SIZE: usize = 1 << PAGE_BITS;

/// Fullwidth colon, fullwidth semicolon, Bopomofo tone marks
const ZH_UPRIGHT: [u32; 6] = [0xFF1A, 0xFF1B, 0x02CA, 0x02CB, 0x02C7, 0x02D9];

fn is_chinese(language: &str) -> bool {
    let primary = language.split(['-', '_']).next().unwrap_or("");
    primary.eq_ignore_ascii_case("zh")
}

struct OrientationTable {
    /// Page index per 256 code points
    index: Vec<u16>,
    /// Deduplicated pages of orientation codes
    pages: Vec<[u8; PAGE_SIZE]>,
}

impl OrientationTable {
    fn build() -> Self {
        let page_count = (MAX_CODE_POINT as usize + 1) / PAGE_SIZE;
        let mut index = Vec::with_capacity(page_count);
        let mut pages: Vec<[u8; PAGE_SIZE]> = Vec::new();
        let mut seen: HashMap<[u8; PAGE_SIZE], u16> = HashMap::new();

        for page in 0..page_count {
            let mut codes = [0u8; PAGE_SIZE];
            for (offset, code) in codes.iter_mut().enumerate() {
                let cp = (page * PAGE_SIZE + offset) as u32;
                // Surrogates are not chars; their property value is R
                *code = match char::from_u32(cp) {
                    Some(ch) => VerticalOrientation::from(unicode_vo::char_orientation(ch)).code(),
                    None => VerticalOrientation::Rotated.code(),
                };
            }
            let slot = *seen.entry(codes).or_insert_with(|| {
                pages.push(codes);
                (pages.len() - 1) as u16
            });
            index.push(slot);
        }

        tracing::debug!("Vertical orientation table: {} unique pages", pages.len());
        Self { index, pages }
    }

    fn get(&self, code_point: u32) -> VerticalOrientation {
        let page = self.index[(code_point >> PAGE_BITS) as usize] as usize;
        VerticalOrientation::from_code(self.pages[page][code_point as usize & (PAGE_SIZE - 1)])
    }
}

fn table() -> &'static OrientationTable {
    static TABLE: OnceLock<OrientationTable> = OnceLock::new();
    TABLE.get_or_init(OrientationTable::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_rotated() {
        assert_eq!(VerticalOrientation::of_char('A', "en"), VerticalOrientation::Rotated);
    }

    #[test]
    fn test_han_upright() {
        assert_eq!(VerticalOrientation::of_char('\u{4E2D}', "ja"), VerticalOrientation::Upright);
        assert!(VerticalOrientation::of_char('\u{4E2D}', "ja").is_upright());
    }

    #[test]
    fn test_ideographic_full_stop_transformed() {
        assert_eq!(
            VerticalOrientation::of_char('\u{3002}', "ja"),
            VerticalOrientation::TransformedUpright
        );
    }

    #[test]
    fn test_chinese_overrides() {
        assert_eq!(
            VerticalOrientation::classify(0xFF1A, "zh-Hant"),
            VerticalOrientation::TransformedUpright
        );
        assert_eq!(
            VerticalOrientation::classify(0x02CA, "zh_TW"),
            VerticalOrientation::TransformedUpright
        );
        // Japanese keeps the property value
        assert_ne!(
            VerticalOrientation::classify(0x02CA, "ja"),
            VerticalOrientation::TransformedUpright
        );
    }

    #[test]
    fn test_matches_property_table() {
        for ch in ['a', '\u{3042}', '\u{30FC}', '\u{FF08}', '\u{1F600}', '\u{0641}'] {
            assert_eq!(
                VerticalOrientation::of_char(ch, "en"),
                VerticalOrientation::from(unicode_vo::char_orientation(ch))
            );
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            VerticalOrientation::classify(0x110000, "en"),
            VerticalOrientation::Rotated
        );
    }
}
