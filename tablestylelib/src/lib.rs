//! # tablestylelib
//!
//! Annotate tabular data with per-cell CSS classes, inline styles and content
//! formats, then render it as an HTML `<table>` fragment.
//!
//! ## Overview
//!
//! Styling rules are computed from the table's own data ("highlight the
//! maximum", "draw a bar proportional to the value"), so they are expressed as
//! polars expressions on a `LazyFrame` and evaluated together in a single
//! `collect` when the table is rendered:
//!
//! 1. **style**: class sets, style maps, format rules, bars and gradients
//! 2. **styler**: the builder that appends annotation stages and renders
//! 3. **output**: table attributes and the HTML renderer
//!
//! ## Composition
//!
//! - Class rules **union**: adding the same class twice changes nothing.
//! - Style rules **merge** by property: later rules only override the
//!   properties they name, and only on the rows their predicate selects.
//! - Format rules **compose** in call order, each consuming the previous
//!   rule's output.
//!
//! ## Example
//!
//! ```rust
//! use polars::prelude::*;
//! use tablestylelib::{BarOptions, StylerExt};
//!
//! let df = df!(
//!     "x" => [1, 3, 2, 5, 3],
//!     "y" => [0.4, 0.25, 0.65, 0.15, 0.95]
//! )
//! .unwrap();
//!
//! let mut styler = df.style().unwrap();
//! styler
//!     .set_table_class("ui celled table")
//!     .highlight_decrease("x", "#FFB3BA")
//!     .unwrap()
//!     .format_bar(&["y"], &BarOptions::new("#B3D4FF").with_max(1))
//!     .unwrap()
//!     .set_cell_class("x", "big", Some(col("x").gt(lit(4))))
//!     .unwrap()
//!     .relabel([("x", "Something")])
//!     .unwrap();
//!
//! let html = styler.render().unwrap();
//! assert!(html.starts_with("<table class=\"ui celled table\">"));
//! assert!(html.contains("<th>Something</th>"));
//! assert!(html.contains("<td class=\"big\">5</td>"));
//! ```

pub mod error;
pub mod options;
pub mod output;
pub mod style;
pub mod styler;

pub use error::StylerError;
pub use options::{BarOptions, ColorScaleOptions, GradientOptions};
pub use output::{Page, RenderedCell, RenderedRow, RenderedTable, TableAttributes};
pub use style::{Aggregate, Align, Bound, Cell, ClassSet, Color, ColorMap, FormatRule, StyleMap};
pub use styler::{Labels, Styler, StylerExt, DEFAULT_NULL_TEXT};

/// Result type for tablestylelib operations
pub type Result<T> = std::result::Result<T, StylerError>;
