//! Cluster resolution
//!
//! Turns the raw records of one shaped sub-run into glyph items: character
//! spans per cluster, cluster flags, device-unit metrics and, for vertical
//! sub-runs, the axis remapping and baseline centering.

use super::{Direction, GlyphFlags, GlyphItem, GlyphSequence, Point, RawGlyph, SubRun};
use crate::font::FontInstance;
use crate::layout::FallbackCoordinator;
use crate::text::TextBuffer;

/// Maps backend advances and offsets (y up) onto the layout axes (y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTransform {
    /// Advance is read from the backend's y axis
    pub advance_from_y: bool,
    pub advance_sign: i32,
    /// Backend x offset feeds the layout y offset and vice versa
    pub swap_offsets: bool,
    pub x_offset_sign: i32,
    pub y_offset_sign: i32,
}

impl AxisTransform {
    pub const HORIZONTAL: Self = Self {
        advance_from_y: false,
        advance_sign: 1,
        swap_offsets: false,
        x_offset_sign: 1,
        y_offset_sign: -1,
    };

    pub const VERTICAL: Self = Self {
        advance_from_y: true,
        advance_sign: -1,
        swap_offsets: true,
        x_offset_sign: -1,
        y_offset_sign: -1,
    };

    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::LeftToRight | Direction::RightToLeft => Self::HORIZONTAL,
            Direction::TopToBottom => Self::VERTICAL,
        }
    }

    /// (advance, x offset, y offset) in font units
    pub fn apply(&self, glyph: &RawGlyph) -> (i32, i32, i32) {
        let advance = if self.advance_from_y {
            glyph.y_advance
        } else {
            glyph.x_advance
        };
        let (x, y) = if self.swap_offsets {
            (glyph.y_offset, glyph.x_offset)
        } else {
            (glyph.x_offset, glyph.y_offset)
        };
        (
            self.advance_sign * advance,
            self.x_offset_sign * x,
            self.y_offset_sign * y,
        )
    }
}

/// Builds glyph items from raw backend records
pub struct ClusterResolver<'a> {
    font: &'a dyn FontInstance,
    text: &'a TextBuffer,
    for_fallback: bool,
}

impl<'a> ClusterResolver<'a> {
    pub fn new(font: &'a dyn FontInstance, text: &'a TextBuffer, for_fallback: bool) -> Self {
        Self {
            font,
            text,
            for_fallback,
        }
    }

    /// Append the glyphs of one sub-run to `out`, advancing `pen`.
    /// Missing glyphs are reported to `fallback`.
    pub fn resolve(
        &self,
        raw: &[RawGlyph],
        sub_run: &SubRun,
        pen: &mut Point,
        out: &mut GlyphSequence,
        fallback: &mut FallbackCoordinator,
    ) {
        let rtl = sub_run.direction.is_rtl();
        let vertical = sub_run.direction.is_vertical();
        let transform = AxisTransform::for_direction(sub_run.direction);
        let (x_scale, y_scale) = self.font.scale();

        let base_offset = if vertical {
            self.font
                .h_extents()
                .map(|(ascender, descender)| (ascender + descender) / 2)
                .unwrap_or(0)
        } else {
            0
        };

        for (i, glyph) in raw.iter().enumerate() {
            let (char_count, cluster_start, in_cluster) = if rtl {
                cluster_span_rtl(raw, i, sub_run.end)
            } else {
                cluster_span_ltr(raw, i, sub_run.end)
            };

            if glyph.glyph_id == 0 {
                fallback.report(self.text, glyph.cluster, rtl);
                if self.for_fallback {
                    continue;
                }
            }

            let mut flags = GlyphFlags::empty();
            flags.set(GlyphFlags::IS_RTL, rtl);
            flags.set(GlyphFlags::IS_VERTICAL, vertical);
            flags.set(GlyphFlags::IS_CLUSTER_START, cluster_start);
            flags.set(GlyphFlags::IS_IN_CLUSTER, in_cluster);
            flags.set(GlyphFlags::IS_UNSAFE_TO_BREAK, glyph.unsafe_to_break);
            flags.set(GlyphFlags::IS_SAFE_TO_INSERT_KASHIDA, glyph.safe_to_insert_kashida);
            if self
                .text
                .code_point_at(glyph.cluster)
                .is_some_and(|(ch, _)| ch.is_whitespace())
            {
                flags |= GlyphFlags::IS_SPACING;
            }

            let (advance, mut x_offset, mut y_offset) = transform.apply(glyph);
            if vertical {
                y_offset -= base_offset;
                if self.font.needs_offset_correction(glyph.y_offset) {
                    if let Some(bounds) = self.font.glyph_bounds(glyph.glyph_id) {
                        x_offset = -(bounds.top + (glyph.y_advance + bounds.height) / 2);
                    }
                }
            }

            let advance = (advance as f64 * if vertical { y_scale } else { x_scale }).round();
            let x_offset = (x_offset as f64 * x_scale).round();
            let y_offset = (y_offset as f64 * y_scale).round();

            let position = Point::new(pen.x + x_offset, pen.y + y_offset);
            out.push(GlyphItem::new(
                glyph.cluster,
                char_count,
                glyph.glyph_id,
                position,
                flags,
                advance,
                x_offset,
                y_offset,
            ));
            pen.x += advance;
        }
    }
}

/// Left-to-right: the first glyph of a cluster carries the characters up
/// to the next cluster in glyph order
fn cluster_span_ltr(raw: &[RawGlyph], i: usize, run_end: usize) -> (usize, bool, bool) {
    let cluster = raw[i].cluster;
    if i > 0 && raw[i - 1].cluster == cluster {
        return (0, false, true);
    }
    let next = raw[i + 1..]
        .iter()
        .map(|g| g.cluster)
        .find(|&c| c != cluster)
        .unwrap_or(run_end);
    (next.saturating_sub(cluster), true, false)
}

/// Right-to-left: glyph order is reversed, so the last glyph of a cluster
/// carries the characters up to the previous cluster in glyph order
fn cluster_span_rtl(raw: &[RawGlyph], i: usize, run_end: usize) -> (usize, bool, bool) {
    let cluster = raw[i].cluster;
    if raw.get(i + 1).is_some_and(|g| g.cluster == cluster) {
        return (0, false, true);
    }
    let next = raw[..i]
        .iter()
        .rev()
        .map(|g| g.cluster)
        .find(|&c| c != cluster)
        .unwrap_or(run_end);
    (next.saturating_sub(cluster), true, false)
}
