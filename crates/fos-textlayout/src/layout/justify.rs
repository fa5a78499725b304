//! Justification
//!
//! Two ways to stretch a shaped run:
//! - a DX array of cumulative target advances per character, with
//!   optional kashida insertion for Arabic text
//! - a plain target width spread over the cluster boundaries
//!
//! Both edit the sequence in place. A DX array is measured against the
//! current advances, so applying the same one again changes nothing; a
//! width the run already has is left alone.

use std::collections::BTreeMap;
use std::ops::Range;

use super::widths::char_widths;
use crate::font::FontInstance;
use crate::shaping::{GlyphFlags, GlyphItem, GlyphSequence, Point};
use crate::{Result, TextError};

/// Pending kashida fill before a glyph
#[derive(Debug, Clone, Copy, PartialEq)]
struct KashidaSlot {
    width: f64,
}

/// Kashida copies filling a gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KashidaFit {
    pub copies: usize,
    /// Overlap between neighbouring copies
    pub overlap: f64,
}

impl KashidaFit {
    /// Copies of a `kashida_width` glyph needed to fill `total`
    pub fn compute(total: f64, kashida_width: f64) -> Self {
        let mut copies = 1;
        if total > kashida_width {
            copies = (total / kashida_width).floor() as usize;
        }

        let mut overlap = 0.0;
        let shortfall = total - kashida_width * copies as f64;
        if shortfall > 0.0 {
            copies += 1;
            let excess = copies as f64 * kashida_width - total;
            if excess > 0.0 && copies >= 2 {
                overlap = excess / (copies - 1) as f64;
            }
        }

        Self { copies, overlap }
    }

    /// Width covered by the copies
    pub fn covered(&self, kashida_width: f64) -> f64 {
        self.copies as f64 * kashida_width - self.overlap * self.copies.saturating_sub(1) as f64
    }
}

/// Applies justification to a glyph sequence
pub struct Justifier<'a> {
    font: &'a dyn FontInstance,
}

impl<'a> Justifier<'a> {
    pub fn new(font: &'a dyn FontInstance) -> Self {
        Self { font }
    }

    /// Stretch clusters so the run's characters get the advances in `dx`.
    ///
    /// `dx[i]` is the cumulative advance up to the end of character
    /// `range.start + i`. Where `kashida[i]` is set and the character ends
    /// up in a right-to-left cluster, the added width is filled with
    /// kashida glyphs.
    pub fn apply_dx_array(
        &self,
        glyphs: &mut GlyphSequence,
        range: Range<usize>,
        dx: &[f64],
        kashida: Option<&[bool]>,
    ) -> Result<()> {
        let char_count = range.len();
        if dx.len() < char_count {
            return Err(TextError::InvalidRange(format!(
                "DX array has {} entries for {} characters",
                dx.len(),
                char_count
            )));
        }
        if let Some(kashida) = kashida {
            if kashida.len() < char_count {
                return Err(TextError::InvalidRange(format!(
                    "kashida array has {} entries for {} characters",
                    kashida.len(),
                    char_count
                )));
            }
        }

        let old_widths = char_widths(glyphs.as_slice(), None, self.font, range.clone());
        let new_widths: Vec<f64> = (0..char_count)
            .map(|i| if i == 0 { dx[0] } else { dx[i] - dx[i - 1] })
            .collect();

        let mut slots: BTreeMap<usize, KashidaSlot> = BTreeMap::new();
        let mut delta = 0.0;
        let items = glyphs.as_mut_slice();

        let mut i = 0;
        while i < items.len() {
            let char_pos = items[i].char_pos.saturating_sub(range.start);
            let count = items[i].char_count.min(char_count.saturating_sub(char_pos));
            let diff: f64 = (char_pos..char_pos + count)
                .map(|c| new_widths[c] - old_widths[c])
                .sum();

            if !items[i].is_rtl() {
                // Slack goes after the leftmost glyph of the cluster
                items[i].add_width(diff);
                items[i].shift_x(delta);
                i += 1;
                while i < items.len() && items[i].is_in_cluster() {
                    items[i].shift_x(delta);
                    i += 1;
                }
            } else if items[i].is_in_cluster() {
                // Moved together with the glyph carrying the cluster
                i += 1;
            } else {
                // Right-to-left: slack goes to the left of the cluster
                items[i].add_width(diff);
                items[i].shift_x(delta + diff);
                for j in (0..i).rev() {
                    if !items[j].is_in_cluster() {
                        break;
                    }
                    items[j].shift_x(delta + diff);
                }

                if kashida.is_some_and(|k| char_pos < char_count && k[char_pos]) {
                    slots.insert(i, KashidaSlot { width: diff });
                }
                i += 1;
            }

            delta += diff;
        }

        if !slots.is_empty() {
            self.insert_kashidas(glyphs, &slots);
        }
        Ok(())
    }

    fn insert_kashidas(&self, glyphs: &mut GlyphSequence, slots: &BTreeMap<usize, KashidaSlot>) {
        let kashida_glyph = self.font.kashida_glyph();
        let kashida_width = self.font.kashida_width();
        if kashida_width <= 0.0 {
            tracing::warn!(
                "Asked to insert kashidas in {} with kashida width {}",
                self.font.name(),
                kashida_width
            );
            return;
        }

        let items = std::mem::take(glyphs).into_vec();
        let mut merged = Vec::with_capacity(items.len() + slots.len());

        for (index, item) in items.into_iter().enumerate() {
            if let Some(slot) = slots.get(&index).filter(|s| s.width > 0.0) {
                let fit = KashidaFit::compute(slot.width, kashida_width);
                let mut x = item.position.x - slot.width;
                for _ in 0..fit.copies {
                    merged.push(GlyphItem::new(
                        item.char_pos,
                        0,
                        kashida_glyph,
                        Point::new(x, item.position.y),
                        GlyphFlags::IS_IN_CLUSTER | GlyphFlags::IS_RTL,
                        kashida_width,
                        0.0,
                        0.0,
                    ));
                    x += kashida_width - fit.overlap;
                }
                tracing::debug!(
                    "Inserted {} kashidas at {} (overlap {})",
                    fit.copies,
                    item.char_pos,
                    fit.overlap
                );
            }
            merged.push(item);
        }

        glyphs.replace(merged);
    }

    /// Stretch or squeeze the run to `new_width`.
    ///
    /// The last glyph is moved to the new end. When growing, the extra
    /// space goes evenly to the cluster-carrying glyphs before it; when
    /// shrinking, positions are scaled towards the start.
    pub fn justify_to_width(&self, glyphs: &mut GlyphSequence, new_width: f64) {
        let mut old_width = glyphs.total_advance();
        if glyphs.is_empty() || old_width == 0.0 || new_width == old_width {
            return;
        }

        let items = glyphs.as_mut_slice();
        let right = items.len() - 1;
        let stretchable = items[..right].iter().filter(|g| !g.is_in_cluster()).count();
        let max_glyph = items[..right]
            .iter()
            .map(|g| g.natural_advance)
            .fold(0.0, f64::max);

        old_width -= items[right].natural_advance;
        if old_width <= 0.0 {
            return;
        }
        let new_width = new_width.max(max_glyph) - items[right].natural_advance;
        items[right].position.x = new_width + items[right].x_offset;

        let mut diff = new_width - old_width;
        if diff >= 0.0 {
            let mut remaining = stretchable;
            let mut delta_sum = 0.0;
            for glyph in &mut items[..right] {
                glyph.shift_x(delta_sum);
                if glyph.is_in_cluster() || remaining == 0 {
                    continue;
                }
                let extra = diff / remaining as f64;
                remaining -= 1;
                diff -= extra;
                glyph.add_width(extra);
                delta_sum += extra;
            }
        } else {
            let squeeze = diff / old_width;
            for glyph in &mut items[1..right] {
                glyph.position.x += glyph.position.x * squeeze;
            }
            for k in 0..right {
                items[k].advance = items[k + 1].position.x - items[k].position.x;
            }
        }
    }
}
