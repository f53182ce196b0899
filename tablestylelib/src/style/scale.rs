//! Relative values and the CSS they drive.
//!
//! Bars and gradients both rescale a cell against a `[low, high]` window:
//!
//! ```text
//! rel(v, lo, hi) = (v - lo) / (hi - lo)
//! ```
//!
//! `lo` and `hi` are [`Bound`]s, either literals or aggregates of the column.
//! Polars evaluates the aggregates over the full column (NaN is ignored by
//! `min`/`max`) before the row-wise division. There is no zero guard:
//! `lo == hi` yields NaN or infinities. Infinities clamp to 0% or 100%;
//! NaN rows get no CSS at all.

use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column aggregate usable as a scaling bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Min,
    Max,
    Sum,
    Mean,
}

impl Aggregate {
    pub fn apply(self, expr: Expr) -> Expr {
        match self {
            Aggregate::Min => expr.min(),
            Aggregate::Max => expr.max(),
            Aggregate::Sum => expr.sum(),
            Aggregate::Mean => expr.mean(),
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregate::Min => "min",
            Aggregate::Max => "max",
            Aggregate::Sum => "sum",
            Aggregate::Mean => "mean",
        };
        f.write_str(name)
    }
}

/// One end of a scaling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Literal(f64),
    Aggregate(Aggregate),
}

impl Bound {
    pub fn to_expr(self, column: &str) -> Expr {
        match self {
            Bound::Literal(x) => lit(x),
            Bound::Aggregate(func) => func.apply(numeric(column)),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Literal(x) => write!(f, "{}", x),
            Bound::Aggregate(func) => write!(f, "{}", func),
        }
    }
}

impl From<f64> for Bound {
    fn from(x: f64) -> Self {
        Bound::Literal(x)
    }
}

impl From<i32> for Bound {
    fn from(x: i32) -> Self {
        Bound::Literal(x as f64)
    }
}

impl From<Aggregate> for Bound {
    fn from(func: Aggregate) -> Self {
        Bound::Aggregate(func)
    }
}

/// Which edge a bar grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
}

impl Align {
    fn angle(self) -> &'static str {
        match self {
            Align::Left => "90deg",
            Align::Right => "270deg",
        }
    }

    pub fn position(self) -> &'static str {
        match self {
            Align::Left => "left center",
            Align::Right => "right center",
        }
    }
}

fn numeric(column: &str) -> Expr {
    col(column).cast(DataType::Float64)
}

/// Row-wise relative value of `column` within `[lo, hi]`, as Float64.
pub fn relative(column: &str, lo: Bound, hi: Bound) -> Expr {
    (numeric(column) - lo.to_expr(column)) / (hi.to_expr(column) - lo.to_expr(column))
}

/// Map a Float64 expression to a String one, row by row. `render` returning
/// `None` (and null input) yields null.
pub fn css_from<F>(expr: Expr, render: F) -> Expr
where
    F: Fn(f64) -> Option<String> + Send + Sync + 'static,
{
    expr.map(
        move |c: Column| {
            let css: StringChunked = c
                .f64()?
                .into_iter()
                .map(|v| v.and_then(&render))
                .collect();
            Ok(css.with_name(c.name().clone()).into_column())
        },
        |_schema: &Schema, field: &Field| Ok(Field::new(field.name().clone(), DataType::String)),
    )
}

/// Clamp a fraction to `[0, 1]` and express it as a percentage rounded to
/// one decimal.
pub fn percentage(fraction: f64) -> f64 {
    (fraction.clamp(0.0, 1.0) * 1000.0).round() / 10.0
}

/// `background-image` for a bar filling `pct` percent of the cell.
pub fn bar_image(color: &str, pct: f64, align: Align) -> String {
    format!(
        "linear-gradient({}, {} {:.1}%, transparent {:.1}%)",
        align.angle(),
        color,
        pct,
        pct
    )
}

/// `background-size` for a bar box of `width` x `height` percent.
pub fn bar_size(width: f64, height: f64) -> String {
    format!("{}% {}%", width, height)
}

/// `background` for a two-stop gradient ending at `pct` percent.
pub fn gradient_background(start: &str, end: &str, pct: f64) -> String {
    format!(
        "linear-gradient(90deg, {} 0%, {} {:.1}%, transparent {:.1}%)",
        start, end, pct, pct
    )
}
