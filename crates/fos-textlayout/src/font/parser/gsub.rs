//! GSUB feature lookup collection

use std::collections::HashSet;

use rustybuzz::ttf_parser::gsub::SubstitutionSubtable;
use rustybuzz::ttf_parser::opentype_layout::{Coverage, LayoutTable};
use rustybuzz::ttf_parser::Tag;

/// Collect the input glyphs of every lookup referenced by `feature` in any
/// script or language system.
///
/// Only single, multiple, alternate and ligature substitutions contribute;
/// contextual lookups are skipped.
pub fn feature_input_glyphs(gsub: &LayoutTable<'_>, feature: Tag) -> HashSet<u16> {
    let mut lookups: Vec<u16> = gsub
        .features
        .into_iter()
        .filter(|f| f.tag == feature)
        .flat_map(|f| f.lookup_indices)
        .collect();
    lookups.sort_unstable();
    lookups.dedup();

    let mut glyphs = HashSet::new();
    for index in lookups {
        let Some(lookup) = gsub.lookups.get(index) else {
            continue;
        };
        for subtable in lookup.subtables.into_iter::<SubstitutionSubtable>() {
            match subtable {
                SubstitutionSubtable::Single(_)
                | SubstitutionSubtable::Multiple(_)
                | SubstitutionSubtable::Alternate(_)
                | SubstitutionSubtable::Ligature(_) => {
                    extend_with_coverage(&mut glyphs, subtable.coverage());
                }
                _ => {}
            }
        }
    }

    glyphs
}

fn extend_with_coverage(glyphs: &mut HashSet<u16>, coverage: Coverage<'_>) {
    match coverage {
        Coverage::Format1 { glyphs: list } => glyphs.extend(list.into_iter().map(|g| g.0)),
        Coverage::Format2 { records } => {
            for record in records {
                glyphs.extend(record.start.0..=record.end.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustybuzz::ttf_parser::Face;

    const DEJAVU: &[u8] = include_bytes!("../../../tests/fonts/DejaVuSans.ttf");

    #[test]
    fn test_collects_initial_forms() {
        let face = Face::parse(DEJAVU, 0).unwrap();
        let gsub = face.tables().gsub.unwrap();
        let glyphs = feature_input_glyphs(&gsub, Tag::from_bytes(b"init"));

        let beh = face.glyph_index('\u{0628}').unwrap();
        assert!(glyphs.contains(&beh.0));
        let latin = face.glyph_index('A').unwrap();
        assert!(!glyphs.contains(&latin.0));
    }

    #[test]
    fn test_missing_feature_is_empty() {
        let face = Face::parse(DEJAVU, 0).unwrap();
        let gsub = face.tables().gsub.unwrap();
        assert!(feature_input_glyphs(&gsub, Tag::from_bytes(b"vert")).is_empty());
    }
}
