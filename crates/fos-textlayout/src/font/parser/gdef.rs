//! GDEF ligature caret list

use super::reader::TableReader;
use super::ParseError;

/// Ligature caret positions for `glyph_id`, in font units along the
/// inline axis, in the order stored in the font (visual order).
///
/// Returns `Ok(None)` when the font has no caret list or the glyph is
/// not covered. Point-index carets (format 2) carry no coordinate without
/// hinting and are reported as 0.
pub fn ligature_carets(gdef: &[u8], glyph_id: u16) -> Result<Option<Vec<i32>>, ParseError> {
    let mut header = TableReader::new(gdef);
    let _version = header.read_u32()?;
    let _glyph_class_def = header.read_u16()?;
    let _attach_list = header.read_u16()?;
    let Some(lig_caret_list) = header.read_offset16(0)? else {
        return Ok(None);
    };

    let mut list = TableReader::at(gdef, lig_caret_list)?;
    let Some(coverage_offset) = list.read_offset16(lig_caret_list)? else {
        return Ok(None);
    };
    let Some(index) = coverage_index(gdef, coverage_offset, glyph_id)? else {
        return Ok(None);
    };

    let lig_glyph_count = list.read_u16()?;
    if index >= lig_glyph_count {
        return Err(ParseError::OutOfBounds);
    }
    list.skip(index as usize * 2)?;
    let Some(lig_glyph) = list.read_offset16(lig_caret_list)? else {
        return Ok(None);
    };

    let mut glyph = TableReader::at(gdef, lig_glyph)?;
    let caret_count = glyph.read_u16()?;
    let mut carets = Vec::with_capacity(caret_count as usize);
    for _ in 0..caret_count {
        let Some(caret_offset) = glyph.read_offset16(lig_glyph)? else {
            carets.push(0);
            continue;
        };
        let mut caret = TableReader::at(gdef, caret_offset)?;
        let value = match caret.read_u16()? {
            1 | 3 => caret.read_i16()? as i32,
            2 => 0,
            other => return Err(ParseError::UnsupportedFormat(other)),
        };
        carets.push(value);
    }

    Ok(Some(carets))
}

/// Coverage index of `glyph_id` in the coverage table at `offset`
fn coverage_index(data: &[u8], offset: usize, glyph_id: u16) -> Result<Option<u16>, ParseError> {
    let mut reader = TableReader::at(data, offset)?;
    let format = reader.read_u16()?;
    let count = reader.read_u16()?;

    match format {
        1 => {
            for index in 0..count {
                if reader.read_u16()? == glyph_id {
                    return Ok(Some(index));
                }
            }
            Ok(None)
        }
        2 => {
            for _ in 0..count {
                let start = reader.read_u16()?;
                let end = reader.read_u16()?;
                let first_index = reader.read_u16()?;
                if (start..=end).contains(&glyph_id) {
                    return Ok(Some(first_index + (glyph_id - start)));
                }
            }
            Ok(None)
        }
        other => Err(ParseError::UnsupportedFormat(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// GDEF with a caret list covering glyph 7 with two carets (300, 600)
    fn sample_gdef() -> Vec<u8> {
        let mut data = vec![
            0, 1, 0, 0, // version 1.0
            0, 0, // glyph class def
            0, 0, // attach list
            0, 12, // lig caret list at 12
            0, 0, // padding
        ];
        // LigCaretList at 12
        data.extend_from_slice(&[
            0, 6, // coverage at +6 (18)
            0, 1, // lig glyph count
            0, 12, // lig glyph at +12 (24)
        ]);
        // Coverage at 18: format 1, one glyph (7)
        data.extend_from_slice(&[0, 1, 0, 1, 0, 7]);
        // LigGlyph at 24
        data.extend_from_slice(&[
            0, 2, // caret count
            0, 6, // caret 0 at +6 (30)
            0, 10, // caret 1 at +10 (34)
        ]);
        // CaretValue format 1: 300
        data.extend_from_slice(&[0, 1, 0x01, 0x2C]);
        // CaretValue format 3: 600, device offset 0
        data.extend_from_slice(&[0, 3, 0x02, 0x58, 0, 0]);
        data
    }

    #[test]
    fn test_carets_for_covered_glyph() {
        let gdef = sample_gdef();
        assert_eq!(ligature_carets(&gdef, 7).unwrap(), Some(vec![300, 600]));
    }

    #[test]
    fn test_uncovered_glyph() {
        let gdef = sample_gdef();
        assert_eq!(ligature_carets(&gdef, 8).unwrap(), None);
    }

    #[test]
    fn test_range_coverage() {
        // One range 20..=22 starting at coverage index 4
        let data = [0, 2, 0, 1, 0, 20, 0, 22, 0, 4];
        assert_eq!(coverage_index(&data, 0, 21).unwrap(), Some(5));
        assert_eq!(coverage_index(&data, 0, 23).unwrap(), None);
        let unknown = coverage_index(&[0, 7, 0, 0], 0, 1);
        assert!(matches!(unknown, Err(ParseError::UnsupportedFormat(7))));
    }

    #[test]
    fn test_no_caret_list() {
        let gdef = [0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(ligature_carets(&gdef, 7).unwrap(), None);
    }
}
