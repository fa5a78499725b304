//! Shaped glyph items

bitflags::bitflags! {
    /// Per-glyph flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GlyphFlags: u16 {
        /// Glyph belongs to a right-to-left run
        const IS_RTL                     = 1 << 0;
        /// Glyph carries the character count and width of its cluster
        const IS_CLUSTER_START           = 1 << 1;
        /// Glyph is a continuation glyph of a multi-glyph cluster
        const IS_IN_CLUSTER              = 1 << 2;
        /// Glyph was shaped top-to-bottom
        const IS_VERTICAL                = 1 << 3;
        /// First character of the cluster is Unicode white space
        const IS_SPACING                 = 1 << 4;
        /// Breaking before this cluster requires reshaping
        const IS_UNSAFE_TO_BREAK         = 1 << 5;
        /// A kashida may be inserted before this glyph
        const IS_SAFE_TO_INSERT_KASHIDA  = 1 << 6;
    }
}

/// Device-space point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A shaped glyph with device position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphItem {
    /// First source character (code unit) this glyph covers
    pub char_pos: usize,
    /// Source characters subsumed; 0 for continuation glyphs
    pub char_count: usize,
    /// Glyph ID in the font; 0 marks a character the font lacks
    pub glyph_id: u32,
    /// Origin in device units
    pub position: Point,
    /// Advance after justification
    pub advance: f64,
    /// Advance as shaped
    pub natural_advance: f64,
    /// Offset from the pen position along x
    pub x_offset: f64,
    /// Offset from the pen position along y
    pub y_offset: f64,
    /// Flags
    pub flags: GlyphFlags,
}

impl GlyphItem {
    /// Create a new glyph item
    pub fn new(
        char_pos: usize,
        char_count: usize,
        glyph_id: u32,
        position: Point,
        flags: GlyphFlags,
        advance: f64,
        x_offset: f64,
        y_offset: f64,
    ) -> Self {
        Self {
            char_pos,
            char_count,
            glyph_id,
            position,
            advance,
            natural_advance: advance,
            x_offset,
            y_offset,
            flags,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_RTL)
    }

    pub fn is_cluster_start(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_CLUSTER_START)
    }

    pub fn is_in_cluster(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_IN_CLUSTER)
    }

    pub fn is_vertical(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_VERTICAL)
    }

    pub fn is_spacing(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_SPACING)
    }

    pub fn is_unsafe_to_break(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_UNSAFE_TO_BREAK)
    }

    pub fn is_safe_to_insert_kashida(&self) -> bool {
        self.flags.contains(GlyphFlags::IS_SAFE_TO_INSERT_KASHIDA)
    }

    /// Glyph the font could not provide
    pub fn is_missing(&self) -> bool {
        self.glyph_id == 0
    }

    /// Grow (or shrink) the advance
    pub fn add_width(&mut self, delta: f64) {
        self.advance += delta;
    }

    /// Move the glyph along the inline axis
    pub fn shift_x(&mut self, delta: f64) {
        self.position.x += delta;
    }
}

/// Ordered glyphs of one logical run, in visual order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphSequence {
    items: Vec<GlyphItem>,
}

impl GlyphSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `capacity` glyphs
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: GlyphItem) {
        self.items.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlyphItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[GlyphItem] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [GlyphItem] {
        &mut self.items
    }

    pub fn get(&self, index: usize) -> Option<&GlyphItem> {
        self.items.get(index)
    }

    /// Replace the glyphs wholesale
    pub fn replace(&mut self, items: Vec<GlyphItem>) {
        self.items = items;
    }

    pub fn into_vec(self) -> Vec<GlyphItem> {
        self.items
    }

    /// Sum of all advances
    pub fn total_advance(&self) -> f64 {
        self.items.iter().map(|g| g.advance).sum()
    }

    /// Extent from the first glyph origin to the end of the last advance.
    ///
    /// This is the run width for left-to-right glyphs. Right-to-left
    /// justification adds space before a glyph's origin, so measure such
    /// runs with [`total_advance`](Self::total_advance).
    pub fn width(&self) -> f64 {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => {
                last.position.x - last.x_offset + last.advance - (first.position.x - first.x_offset)
            }
            _ => 0.0,
        }
    }

    /// Whether a kashida can go between the glyphs starting `char_pos` and
    /// `next_char_pos`
    pub fn is_kashida_pos_valid(&self, char_pos: usize, next_char_pos: usize) -> bool {
        let glyph = self.items.iter().find(|g| g.char_pos == char_pos);
        let next = self.items.iter().find(|g| g.char_pos == next_char_pos);

        // Either missing means a ligature spans the position
        let (Some(glyph), Some(next)) = (glyph, next) else {
            return false;
        };

        // Unsupported characters go to fallback layouts
        if glyph.is_missing() || next.is_missing() {
            return false;
        }

        next.is_safe_to_insert_kashida()
    }
}

impl<'a> IntoIterator for &'a GlyphSequence {
    type Item = &'a GlyphItem;
    type IntoIter = std::slice::Iter<'a, GlyphItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<GlyphItem> for GlyphSequence {
    fn from_iter<I: IntoIterator<Item = GlyphItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
