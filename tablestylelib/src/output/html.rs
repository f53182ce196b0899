//! Render-ready table data and its HTML serialization.
//!
//! `RenderedTable` is the final data structure before markup: every string in
//! it is attribute-ready or HTML-safe, so emitting the fragment with
//! `build_html` involves no computation. It can also be serialized to JSON.

use build_html::{Html, HtmlContainer, Table, TableCell, TableCellType, TableRow};
use serde::{Deserialize, Serialize};

/// Escape text for use as element content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
    escape_html(input)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

/// One `<td>`: attribute strings and HTML-safe content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub class: String,
    pub style: String,
    pub content: String,
}

/// One body `<tr>` with its row-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub class: String,
    pub style: String,
    pub cells: Vec<RenderedCell>,
}

/// A fully evaluated table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
    /// Table-level classes, joined.
    pub class: String,
    /// Header-row classes, joined.
    pub header_class: String,
    /// Display labels of the visible columns (unescaped).
    pub labels: Vec<String>,
    pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
    /// Emit the `<table>` fragment.
    ///
    /// Labels are escaped here. Cell content is emitted verbatim since the
    /// format pipeline already made it HTML-safe. Class and style strings
    /// are never escaped; empty ones are left out.
    pub fn to_html(&self) -> String {
        let header = self.labels.iter().fold(
            TableRow::new().with_attributes(attributes(&self.header_class, "")),
            |row, label| {
                row.with_cell(TableCell::new(TableCellType::Header).with_raw(escape_html(label)))
            },
        );
        self.rows
            .iter()
            .map(RenderedRow::to_row)
            .fold(
                Table::new()
                    .with_attributes(attributes(&self.class, ""))
                    .with_custom_header_row(header),
                |table, row| table.with_custom_body_row(row),
            )
            .to_html_string()
    }
}

impl RenderedRow {
    fn to_row(&self) -> TableRow {
        self.cells.iter().fold(
            TableRow::new().with_attributes(attributes(&self.class, &self.style)),
            |row, cell| {
                row.with_cell(
                    TableCell::new(TableCellType::Data)
                        .with_attributes(attributes(&cell.class, &cell.style))
                        .with_raw(&cell.content),
                )
            },
        )
    }
}

fn attributes<'a>(class: &'a str, style: &'a str) -> Vec<(&'a str, &'a str)> {
    [("class", class), ("style", style)]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
