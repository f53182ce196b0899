//! Cell annotations: class sets, style maps, format rules and scales.
//!
//! Class and style annotations are stored as ordinary columns of the polars
//! `LazyFrame`, next to the data they describe. Every source column `c` gets
//! a `c::class` `List(String)` column, and a `c::style` `Struct` column once
//! a style is set on it; the row-level annotations live under the reserved
//! [`ROW`] key. Format rules are kept outside the frame in a
//! [`FormatPipeline`] and run over the collected rows.

pub mod class_set;
pub mod colors;
pub mod format;
pub mod scale;
pub mod style_map;

pub use class_set::ClassSet;
pub use colors::{Color, ColorMap, Gradient};
pub use format::{Cell, FormatPipeline, FormatRule};
pub use scale::{Aggregate, Align, Bound};
pub use style_map::StyleMap;

/// Key of the row-level pseudo-column. Data columns may not contain
/// [`SEPARATOR`], so this never collides with one.
pub const ROW: &str = "::row";

/// Separator between a column name and its annotation suffix.
pub const SEPARATOR: &str = "::";

pub fn class_column(column: &str) -> String {
    format!("{}::class", column)
}

pub fn style_column(column: &str) -> String {
    format!("{}::style", column)
}

/// What an annotation call applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Column(&'a str),
    Row,
}

impl Target<'_> {
    pub fn key(&self) -> &str {
        match self {
            Target::Column(name) => name,
            Target::Row => ROW,
        }
    }

    pub fn class_column(&self) -> String {
        class_column(self.key())
    }

    pub fn style_column(&self) -> String {
        style_column(self.key())
    }
}
