//! OpenType table readers
//!
//! The GSUB walk goes through ttf-parser's layout tables. GDEF ligature
//! carets are not exposed there and are read from the raw table.

mod gdef;
mod gsub;
mod reader;

pub use gdef::ligature_carets;
pub use gsub::feature_input_glyphs;
pub use reader::TableReader;

/// Table parsing error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Read past the end of the table
    OutOfBounds,
    /// Subtable format this reader does not understand
    UnsupportedFormat(u16),
}
