//! Output: table-level attributes and HTML rendering.
//!
//! This is the last stage of the pipeline. Once the styler has collected its
//! lazy frame, every visible column has a serialized class, style and content
//! string per row. The renderer only assembles those strings:
//!
//! - **TableAttributes**: table and header classes, display labels, page window
//! - **RenderedTable**: attribute-ready rows, serializable, with `to_html()`
//!
//! ## Example
//!
//! ```rust
//! use tablestylelib::output::{RenderedCell, RenderedRow, RenderedTable};
//!
//! let table = RenderedTable {
//!     labels: vec!["a".into()],
//!     rows: vec![RenderedRow {
//!         cells: vec![RenderedCell { content: "1".into(), ..Default::default() }],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! assert!(table.to_html().contains("<td>1</td>"));
//! ```

pub mod attributes;
pub mod html;

pub use attributes::{Page, TableAttributes};
pub use html::{escape_attr, escape_html, RenderedCell, RenderedRow, RenderedTable};
