//! Format pipeline: per-column content transformations.
//!
//! Each displayed column owns an ordered queue of [`FormatRule`]s. Rules run
//! in the order they were added, each consuming the previous rule's output,
//! so rounding and hyperlink-wrapping stack. Null source values skip the
//! queue entirely and render the null token.
//!
//! Rules run on the collected frame, over the rows that survived
//! pagination. Content moves through the queue as a [`Cell`]: a plain value
//! (HTML-escaped when stringified) or an HTML fragment produced by a rule
//! such as [`FormatRule::Hyperlink`] (emitted as-is).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use polars::prelude::{AnyValue, DataFrame};

use crate::error::StylerError;
use crate::output::html::{escape_attr, escape_html};
use crate::Result;

type CellFn = dyn Fn(&Cell) -> std::result::Result<Cell, String> + Send + Sync;

/// Cell content between format rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Html(String),
}

impl Cell {
    pub fn from_any(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Cell::Null,
            AnyValue::Boolean(b) => Cell::Bool(*b),
            AnyValue::Int8(i) => Cell::Int(*i as i64),
            AnyValue::Int16(i) => Cell::Int(*i as i64),
            AnyValue::Int32(i) => Cell::Int(*i as i64),
            AnyValue::Int64(i) => Cell::Int(*i),
            AnyValue::UInt8(i) => Cell::Int(*i as i64),
            AnyValue::UInt16(i) => Cell::Int(*i as i64),
            AnyValue::UInt32(i) => Cell::Int(*i as i64),
            AnyValue::UInt64(i) => i64::try_from(*i)
                .map(Cell::Int)
                .unwrap_or_else(|_| Cell::Text(i.to_string())),
            AnyValue::Float32(x) => Cell::Float(*x as f64),
            AnyValue::Float64(x) => Cell::Float(*x),
            AnyValue::String(s) => Cell::Text(s.to_string()),
            AnyValue::StringOwned(s) => Cell::Text(s.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Text(_) => "text",
            Cell::Html(_) => "html",
        }
    }

    /// Final, HTML-safe content.
    pub fn into_html(self) -> String {
        match self {
            Cell::Html(html) => html,
            plain => escape_html(&plain.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("null"),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            // Whole floats keep a trailing ".0" so they read as floats
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) | Cell::Html(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// One queued content transformation.
#[derive(Clone)]
pub enum FormatRule {
    /// Fixed number of decimals for floats; ints pass through unchanged.
    Precision(usize),
    /// Substitute the content for every `{}` in the template.
    Template(String),
    /// Wrap the content in an anchor whose URL comes from another column,
    /// optionally substituted into a URL template.
    Hyperlink {
        url_column: String,
        url_template: Option<String>,
    },
    /// A named caller-supplied transform over plain values.
    Custom { name: String, func: Arc<CellFn> },
}

impl fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatRule::Precision(n) => write!(f, "Precision({})", n),
            FormatRule::Template(t) => write!(f, "Template({:?})", t),
            FormatRule::Hyperlink {
                url_column,
                url_template,
            } => write!(f, "Hyperlink({:?}, {:?})", url_column, url_template),
            FormatRule::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

impl FormatRule {
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Cell) -> std::result::Result<Cell, String> + Send + Sync + 'static,
    {
        FormatRule::Custom {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Apply the rule. `url` is this rule's URL value for hyperlinks.
    pub fn apply(&self, cell: Cell, url: Option<&Cell>) -> std::result::Result<Cell, String> {
        match self {
            FormatRule::Precision(decimals) => match cell {
                Cell::Float(x) => Ok(Cell::Text(format!("{:.*}", decimals, x))),
                Cell::Int(_) | Cell::Null => Ok(cell),
                other => Err(format!(
                    "precision requires a numeric value, got {}",
                    other.kind()
                )),
            },
            FormatRule::Template(template) => Ok(match cell {
                Cell::Html(html) => Cell::Html(escape_html(template).replace("{}", &html)),
                plain => Cell::Text(template.replace("{}", &plain.to_string())),
            }),
            FormatRule::Hyperlink { url_template, .. } => {
                let url = match url {
                    Some(v) if !v.is_null() => v.to_string(),
                    _ => return Ok(cell),
                };
                let href = match url_template {
                    Some(template) => template.replace("{}", &url),
                    None => url,
                };
                Ok(Cell::Html(format!(
                    "<a href=\"{}\">{}</a>",
                    escape_attr(&href),
                    cell.into_html()
                )))
            }
            FormatRule::Custom { name, func } => match cell {
                Cell::Html(_) => Err(format!("cannot apply '{}' to formatted html", name)),
                plain => func(&plain),
            },
        }
    }
}

/// Ordered format rules per column.
#[derive(Debug, Clone, Default)]
pub struct FormatPipeline {
    rules: IndexMap<String, Vec<FormatRule>>,
}

impl FormatPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &str, rule: FormatRule) {
        self.rules.entry(column.to_string()).or_default().push(rule);
    }

    /// Forget every rule queued for `column`.
    pub fn drop_column(&mut self, column: &str) {
        self.rules.shift_remove(column);
    }

    pub fn rules(&self, column: &str) -> &[FormatRule] {
        self.rules.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Columns the rules of `column` read besides the column itself.
    pub fn url_columns(&self, column: &str) -> impl Iterator<Item = &str> {
        self.rules(column).iter().filter_map(|rule| match rule {
            FormatRule::Hyperlink { url_column, .. } => Some(url_column.as_str()),
            _ => None,
        })
    }

    /// Final HTML-safe content of `column` for every row of a collected
    /// frame. `df` must hold the column and its URL columns.
    pub fn render_column(&self, column: &str, df: &DataFrame, null_text: &str) -> Result<Vec<String>> {
        let values = df.column(column)?.as_materialized_series();
        let urls = self
            .url_columns(column)
            .map(|c| Ok(df.column(c)?.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;
        let null_html = escape_html(null_text);

        (0..df.height())
            .map(|row| {
                let value = Cell::from_any(&values.get(row)?);
                if value.is_null() {
                    return Ok(null_html.clone());
                }
                let mut cell = value;
                let mut next_url = urls.iter();
                for rule in self.rules(column) {
                    let url = match rule {
                        FormatRule::Hyperlink { .. } => match next_url.next() {
                            Some(series) => Some(Cell::from_any(&series.get(row)?)),
                            None => None,
                        },
                        _ => None,
                    };
                    cell = rule.apply(cell, url.as_ref()).map_err(|e| {
                        StylerError::EvaluationFailure(format!("format '{}': {}", column, e))
                    })?;
                }
                Ok(cell.into_html())
            })
            .collect()
    }
}
