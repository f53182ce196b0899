//! JSON table definitions replayed against a `Styler`.
//!
//! A recipe names a table, lists its data column by column and then lists
//! styling operations in the order they should be applied:
//!
//! ```json
//! {
//!   "title": "Highlight decrease",
//!   "columns": { "x": [1, 3, 2, 5, 3] },
//!   "operations": [
//!     { "op": "set_table_class", "classes": "ui celled table" },
//!     { "op": "highlight_decrease", "column": "x", "color": "#FFB3BA" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use indexmap::IndexMap;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tablestylelib::{
    BarOptions, Color, ColorMap, ColorScaleOptions, GradientOptions, Labels, Styler,
};

/// Comparison used by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    IsNull,
    NotNull,
}

/// A row predicate: `<column> <op> <value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: Comparison,
    #[serde(default)]
    pub value: Json,
}

/// Literal expression for a JSON scalar.
fn literal(value: &Json) -> anyhow::Result<Expr> {
    Ok(match value {
        Json::Null => Null {}.lit(),
        Json::Bool(b) => lit(*b),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => lit(i),
            (None, Some(x)) => lit(x),
            _ => bail!("unsupported number {}", n),
        },
        Json::String(s) => lit(s.as_str()),
        other => bail!("expected a scalar, got {}", other),
    })
}

impl Condition {
    pub fn to_expr(&self) -> anyhow::Result<Expr> {
        let column = col(self.column.as_str());
        let value = literal(&self.value)?;
        Ok(match self.op {
            Comparison::Eq => column.eq(value),
            Comparison::Ne => column.neq(value),
            Comparison::Lt => column.lt(value),
            Comparison::Le => column.lt_eq(value),
            Comparison::Gt => column.gt(value),
            Comparison::Ge => column.gt_eq(value),
            Comparison::IsNull => column.is_null(),
            Comparison::NotNull => column.is_not_null(),
        })
    }
}

/// Labels given either as a mapping or as a full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeLabels {
    Map(IndexMap<String, String>),
    List(Vec<String>),
}

impl From<RecipeLabels> for Labels {
    fn from(labels: RecipeLabels) -> Self {
        match labels {
            RecipeLabels::Map(mapping) => Labels::Map(mapping),
            RecipeLabels::List(list) => Labels::List(list),
        }
    }
}

/// One styling call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    SetTableClass {
        classes: String,
    },
    SetHeaderClass {
        classes: String,
    },
    SetColumnStyle {
        column: String,
        style: IndexMap<String, String>,
    },
    SetCellStyle {
        column: String,
        when: Condition,
        style: IndexMap<String, String>,
    },
    SetRowStyle {
        style: IndexMap<String, String>,
        #[serde(default)]
        when: Option<Condition>,
    },
    SetCellClass {
        column: String,
        classes: String,
        #[serde(default)]
        when: Option<Condition>,
    },
    SetRowClass {
        classes: String,
        #[serde(default)]
        when: Option<Condition>,
    },
    /// Pick one class per row: `then` where the condition holds, `otherwise`
    /// where it fails and `if_null` where it is null.
    ApplyCellClasses {
        column: String,
        when: Condition,
        then: String,
        otherwise: String,
        #[serde(default)]
        if_null: Option<String>,
    },
    HighlightMax {
        column: String,
        color: String,
    },
    HighlightMin {
        column: String,
        color: String,
    },
    HighlightIncrease {
        column: String,
        color: String,
    },
    HighlightDecrease {
        column: String,
        color: String,
    },
    HighlightNull {
        column: String,
        color: String,
    },
    FormatBar {
        columns: Vec<String>,
        #[serde(flatten)]
        options: BarOptions,
    },
    ApplyGradient {
        column: String,
        #[serde(flatten)]
        options: GradientOptions,
    },
    /// Color map given as a list of colors, spread evenly. Empty means
    /// white to red.
    BackgroundGradient {
        column: String,
        #[serde(default)]
        colors: Vec<String>,
        #[serde(default)]
        vmin: Option<f64>,
        #[serde(default)]
        vmax: Option<f64>,
    },
    SetPrecision {
        column: String,
        decimals: usize,
    },
    Format {
        columns: Vec<String>,
        template: String,
    },
    CreateHyperlink {
        column: String,
        url_column: String,
        #[serde(default)]
        url_template: Option<String>,
    },
    SetNull {
        text: String,
    },
    Relabel {
        labels: RecipeLabels,
    },
    /// Derive every label by substituting the column name at `{}`.
    RelabelTemplate {
        template: String,
    },
    SkipColumns {
        columns: Vec<String>,
    },
    Paginate {
        page_index: i64,
        page_size: i64,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SetTableClass { .. } => "set_table_class",
            Operation::SetHeaderClass { .. } => "set_header_class",
            Operation::SetColumnStyle { .. } => "set_column_style",
            Operation::SetCellStyle { .. } => "set_cell_style",
            Operation::SetRowStyle { .. } => "set_row_style",
            Operation::SetCellClass { .. } => "set_cell_class",
            Operation::SetRowClass { .. } => "set_row_class",
            Operation::ApplyCellClasses { .. } => "apply_cell_classes",
            Operation::HighlightMax { .. } => "highlight_max",
            Operation::HighlightMin { .. } => "highlight_min",
            Operation::HighlightIncrease { .. } => "highlight_increase",
            Operation::HighlightDecrease { .. } => "highlight_decrease",
            Operation::HighlightNull { .. } => "highlight_null",
            Operation::FormatBar { .. } => "format_bar",
            Operation::ApplyGradient { .. } => "apply_gradient",
            Operation::BackgroundGradient { .. } => "background_gradient",
            Operation::SetPrecision { .. } => "set_precision",
            Operation::Format { .. } => "format",
            Operation::CreateHyperlink { .. } => "create_hyperlink",
            Operation::SetNull { .. } => "set_null",
            Operation::Relabel { .. } => "relabel",
            Operation::RelabelTemplate { .. } => "relabel_template",
            Operation::SkipColumns { .. } => "skip_columns",
            Operation::Paginate { .. } => "paginate",
        }
    }

    /// Apply this operation to `styler`.
    pub fn apply(&self, styler: &mut Styler) -> anyhow::Result<()> {
        match self {
            Operation::SetTableClass { classes } => {
                styler.set_table_class(classes.as_str());
            }
            Operation::SetHeaderClass { classes } => {
                styler.set_header_class(classes.as_str());
            }
            Operation::SetColumnStyle { column, style } => {
                styler.set_column_style(column, style.clone().into_iter().collect::<Vec<_>>())?;
            }
            Operation::SetCellStyle {
                column,
                when,
                style,
            } => {
                styler.set_cell_style(
                    column,
                    when.to_expr()?,
                    style.clone().into_iter().collect::<Vec<_>>(),
                )?;
            }
            Operation::SetRowStyle { style, when } => {
                styler.set_row_style(
                    style.clone().into_iter().collect::<Vec<_>>(),
                    when.as_ref().map(Condition::to_expr).transpose()?,
                );
            }
            Operation::SetCellClass {
                column,
                classes,
                when,
            } => {
                styler.set_cell_class(
                    column,
                    classes.as_str(),
                    when.as_ref().map(Condition::to_expr).transpose()?,
                )?;
            }
            Operation::SetRowClass { classes, when } => {
                styler.set_row_class(
                    classes.as_str(),
                    when.as_ref().map(Condition::to_expr).transpose()?,
                );
            }
            Operation::ApplyCellClasses {
                column,
                when: condition,
                then,
                otherwise,
                if_null,
            } => {
                let if_null = match if_null {
                    Some(text) => lit(text.as_str()),
                    None => Null {}.lit(),
                };
                let condition = condition.to_expr()?;
                let classes = when(condition.clone().is_null())
                    .then(if_null)
                    .when(condition)
                    .then(lit(then.as_str()))
                    .otherwise(lit(otherwise.as_str()));
                styler.apply_cell_classes(column, classes)?;
            }
            Operation::HighlightMax { column, color } => {
                styler.highlight_max(column, color)?;
            }
            Operation::HighlightMin { column, color } => {
                styler.highlight_min(column, color)?;
            }
            Operation::HighlightIncrease { column, color } => {
                styler.highlight_increase(column, color)?;
            }
            Operation::HighlightDecrease { column, color } => {
                styler.highlight_decrease(column, color)?;
            }
            Operation::HighlightNull { column, color } => {
                styler.highlight_null(column, color)?;
            }
            Operation::FormatBar { columns, options } => {
                styler.format_bar(columns, options)?;
            }
            Operation::ApplyGradient { column, options } => {
                styler.apply_gradient(column, options)?;
            }
            Operation::BackgroundGradient {
                column,
                colors,
                vmin,
                vmax,
            } => {
                let cmap = if colors.is_empty() {
                    ColorMap::default()
                } else {
                    let colors = colors
                        .iter()
                        .map(|c| c.parse::<Color>())
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    ColorMap::from_palette(&colors)?
                };
                let mut options = ColorScaleOptions::new(cmap);
                options.vmin = *vmin;
                options.vmax = *vmax;
                styler.background_gradient(column, &options)?;
            }
            Operation::SetPrecision { column, decimals } => {
                styler.set_precision(column, *decimals)?;
            }
            Operation::Format { columns, template } => {
                styler.format(columns, template)?;
            }
            Operation::CreateHyperlink {
                column,
                url_column,
                url_template,
            } => {
                styler.create_hyperlink(column, url_column, url_template.as_deref())?;
            }
            Operation::SetNull { text } => {
                styler.set_null(text.as_str());
            }
            Operation::Relabel { labels } => {
                styler.relabel(labels.clone())?;
            }
            Operation::RelabelTemplate { template } => {
                styler.relabel_with(|c| template.replace("{}", c));
            }
            Operation::SkipColumns { columns } => {
                styler.skip_columns(columns)?;
            }
            Operation::Paginate {
                page_index,
                page_size,
            } => {
                styler.paginate(*page_index, *page_size)?;
            }
        }
        Ok(())
    }
}

/// Build a typed column from JSON scalars. Nulls are allowed anywhere;
/// integers widen to floats when mixed with them; all-null columns are Int64.
fn column_series(name: &str, values: &[Json]) -> anyhow::Result<Series> {
    let present = || values.iter().filter(|v| !v.is_null());
    let series = if present().all(|v| v.is_i64()) {
        Series::new(name.into(), values.iter().map(Json::as_i64).collect::<Vec<_>>())
    } else if present().all(Json::is_number) {
        Series::new(name.into(), values.iter().map(Json::as_f64).collect::<Vec<_>>())
    } else if present().all(Json::is_boolean) {
        Series::new(name.into(), values.iter().map(Json::as_bool).collect::<Vec<_>>())
    } else if present().all(Json::is_string) {
        Series::new(name.into(), values.iter().map(Json::as_str).collect::<Vec<_>>())
    } else {
        bail!("column '{}' mixes value types", name);
    };
    Ok(series)
}

/// A complete table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub title: Option<String>,
    pub columns: IndexMap<String, Vec<Json>>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Recipe {
    /// Read a recipe from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid definition {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn frame(&self) -> anyhow::Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| Ok(column_series(name, values)?.into()))
            .collect::<anyhow::Result<Vec<Column>>>()?;
        Ok(DataFrame::new_infer_height(columns)?)
    }

    /// Build a styler and replay every operation, in order.
    pub fn styler(&self) -> anyhow::Result<Styler> {
        let mut styler = Styler::new(self.frame()?)?;
        for (index, operation) in self.operations.iter().enumerate() {
            tracing::debug!(index, op = operation.name(), "applying operation");
            operation
                .apply(&mut styler)
                .with_context(|| format!("operation {} ({})", index + 1, operation.name()))?;
        }
        Ok(styler)
    }
}
