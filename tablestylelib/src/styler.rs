//! The styler: accumulate annotations against a polars `LazyFrame`, render
//! once.
//!
//! A [`Styler`] owns a [`LazyFrame`] over the source data plus one class
//! column per source column (and one for the row itself). Style struct
//! columns are added the first time a style lands on a target. Configuration
//! calls append `with_column` stages to that frame or update in-memory table
//! attributes; nothing is evaluated until [`Styler::render`].
//!
//! Merge rules:
//!
//! - classes are unioned into the existing list of every matching row
//! - styles are merged field by field; rows a predicate rejects keep their
//!   previous value for the fields being set
//! - format rules for a column run in the order they were added
//!
//! ## Example
//!
//! ```rust
//! use polars::prelude::*;
//! use tablestylelib::{BarOptions, Styler};
//!
//! let df = df!("a" => [1, 2, 4]).unwrap();
//! let mut styler = Styler::new(df).unwrap();
//! styler
//!     .set_table_class("ui table")
//!     .highlight_max("a", "yellow")
//!     .unwrap()
//!     .format_bar(&["a"], &BarOptions::new("#123455").with_min(0).with_max(4))
//!     .unwrap();
//! let html = styler.render().unwrap();
//! assert!(html.contains("#123455 50.0%"));
//! ```

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use polars::prelude::*;
use tracing::debug;

use crate::error::StylerError;
use crate::options::{BarOptions, ColorScaleOptions, GradientOptions};
use crate::output::{Page, RenderedCell, RenderedRow, RenderedTable, TableAttributes};
use crate::style::scale::{
    bar_image, bar_size, css_from, gradient_background, percentage, relative,
};
use crate::style::{
    class_column, style_column, Cell, ClassSet, FormatPipeline, FormatRule, StyleMap, Target, ROW,
    SEPARATOR,
};
use crate::Result;

/// Text rendered for null cells unless overridden.
pub const DEFAULT_NULL_TEXT: &str = "null";

/// New display labels: by column name or as a full list in column order.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    Map(IndexMap<String, String>),
    List(Vec<String>),
}

impl From<IndexMap<String, String>> for Labels {
    fn from(mapping: IndexMap<String, String>) -> Self {
        Labels::Map(mapping)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Labels {
    fn from(mapping: [(&str, &str); N]) -> Self {
        Labels::Map(
            mapping
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels::List(labels)
    }
}

impl From<Vec<&str>> for Labels {
    fn from(labels: Vec<&str>) -> Self {
        Labels::List(labels.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Labels {
    fn from(labels: [&str; N]) -> Self {
        Labels::List(labels.into_iter().map(String::from).collect())
    }
}


/// Builder that turns a data frame into a styled HTML table.
#[derive(Clone)]
pub struct Styler {
    columns: Vec<String>,
    visible: Vec<String>,
    frame: LazyFrame,
    stages: usize,
    /// Known fields of each style column, in struct order.
    style_fields: IndexMap<String, Vec<String>>,
    formats: FormatPipeline,
    attributes: TableAttributes,
    null_text: String,
}

impl fmt::Debug for Styler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Styler")
            .field("columns", &self.columns)
            .field("visible", &self.visible)
            .field("stages", &self.stages)
            .field("style_fields", &self.style_fields)
            .field("formats", &self.formats)
            .field("attributes", &self.attributes)
            .field("null_text", &self.null_text)
            .finish_non_exhaustive()
    }
}

fn empty_classes(name: &str, height: usize) -> PolarsResult<Series> {
    let empty = Series::new_empty(PlSmallStr::EMPTY, &DataType::String);
    Series::new(name.into(), vec![empty; height]).cast(&DataType::List(Box::new(DataType::String)))
}

fn null_string() -> Expr {
    Null {}.lit().cast(DataType::String)
}

/// True on every row; broadcasts literal branches to the frame height.
fn every_row() -> Expr {
    let anchor = col(class_column(ROW).as_str());
    anchor.clone().is_null().or(anchor.is_not_null())
}

impl Styler {
    /// Start styling `df`. Its columns, in order, are the display set.
    ///
    /// Column names may not contain `::`, which is reserved for annotation
    /// columns.
    pub fn new(mut df: DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        if let Some(bad) = columns.iter().find(|c| c.contains(SEPARATOR)) {
            return Err(StylerError::ShapeMismatch(format!(
                "column name '{}' contains reserved '{}'",
                bad, SEPARATOR
            )));
        }

        let height = df.height();
        for key in columns.iter().map(String::as_str).chain([ROW]) {
            df.with_column(empty_classes(&class_column(key), height)?.into())?;
        }
        debug!(columns = columns.len(), rows = height, "creating styler");

        Ok(Self {
            attributes: TableAttributes::new(&columns),
            visible: columns.clone(),
            columns,
            frame: df.lazy(),
            stages: 0,
            style_fields: IndexMap::new(),
            formats: FormatPipeline::new(),
            null_text: DEFAULT_NULL_TEXT.to_string(),
        })
    }

    /// Source columns, in construction order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Columns that will be rendered.
    pub fn visible_columns(&self) -> &[String] {
        &self.visible
    }

    pub fn attributes(&self) -> &TableAttributes {
        &self.attributes
    }

    /// The pending pipeline.
    pub fn frame(&self) -> &LazyFrame {
        &self.frame
    }

    /// Number of annotation stages appended so far.
    pub fn stage_count(&self) -> usize {
        self.stages
    }

    pub fn null_text(&self) -> &str {
        &self.null_text
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if self.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(StylerError::ColumnNotFound(column.to_string()))
        }
    }

    fn check_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        columns
            .iter()
            .try_for_each(|c| self.check_column(c.as_ref()))
    }

    fn append(&mut self, expr: Expr) {
        self.stages += 1;
        debug!(stage = self.stages, "appending stage");
        self.frame = self.frame.clone().with_column(expr);
    }

    /// Current value of a style field, null when the field was never set.
    fn previous(&self, style: &str, property: &str) -> Expr {
        let known = self
            .style_fields
            .get(style)
            .is_some_and(|fields| fields.iter().any(|f| f == property));
        if known {
            col(style).struct_().field_by_name(property)
        } else {
            null_string()
        }
    }

    /// Rebuild the style struct of `target` with `fields` replacing or
    /// appending to the known ones.
    fn merge_style(&mut self, target: Target<'_>, fields: Vec<(String, Expr)>) {
        if fields.is_empty() {
            return;
        }
        let style = target.style_column();
        let mut merged: IndexMap<String, Expr> = self
            .style_fields
            .get(&style)
            .into_iter()
            .flatten()
            .map(|f| (f.clone(), col(style.as_str()).struct_().field_by_name(f)))
            .collect();
        merged.extend(fields);

        let names = merged.keys().cloned().collect();
        let expr = as_struct(
            merged
                .into_iter()
                .map(|(property, expr)| expr.alias(property.as_str()))
                .collect(),
        )
        .alias(style.as_str());
        self.style_fields.insert(style, names);
        self.append(expr);
    }

    fn union_classes(&mut self, target: Target<'_>, tokens: Vec<Expr>, gate: Option<Expr>) {
        if tokens.is_empty() {
            return;
        }
        let class = target.class_column();
        let current = col(class.as_str());
        let union = current.clone().list().concat(tokens).list().unique_stable();
        let expr = match gate {
            Some(predicate) => when(predicate).then(union).otherwise(current),
            None => union,
        };
        self.append(expr.alias(class.as_str()));
    }

    fn literal_tokens(classes: ClassSet) -> Vec<Expr> {
        classes.tokens().iter().map(|t| lit(t.as_str())).collect()
    }

    /// Literal style fields, gated by `predicate` when given.
    fn literal_fields(
        &self,
        target: Target<'_>,
        predicate: Option<&Expr>,
        styles: &StyleMap,
    ) -> Vec<(String, Expr)> {
        let style = target.style_column();
        let gate = predicate.cloned().unwrap_or_else(every_row);
        styles
            .fields()
            .map(|(property, value)| {
                let value = match value {
                    Some(v) => lit(v.to_string()),
                    None => null_string(),
                };
                let expr = when(gate.clone())
                    .then(value)
                    .otherwise(self.previous(&style, property));
                (property.to_string(), expr)
            })
            .collect()
    }

    /// A style field computed per row; rows where `value` is null keep the
    /// previous value.
    fn computed_field(&self, target: Target<'_>, property: &str, value: Expr) -> (String, Expr) {
        let previous = self.previous(&target.style_column(), property);
        let value = value.cast(DataType::String).fill_null(previous);
        (
            property.to_string(),
            when(every_row()).then(value).otherwise(null_string()),
        )
    }

    /// Add classes to the `<table>` element.
    pub fn set_table_class(&mut self, classes: impl Into<ClassSet>) -> &mut Self {
        self.attributes.table_classes.union(&classes.into());
        self
    }

    /// Add classes to the header `<tr>`.
    pub fn set_header_class(&mut self, classes: impl Into<ClassSet>) -> &mut Self {
        self.attributes.header_classes.union(&classes.into());
        self
    }

    /// Merge `styles` into every cell of `column`.
    pub fn set_column_style(
        &mut self,
        column: &str,
        styles: impl Into<StyleMap>,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        let target = Target::Column(column);
        let fields = self.literal_fields(target, None, &styles.into());
        self.merge_style(target, fields);
        Ok(self)
    }

    /// Merge styles for several columns at once. Unknown columns are a shape
    /// error and nothing is applied.
    pub fn set_column_styles<K, S>(
        &mut self,
        styles: impl IntoIterator<Item = (K, S)>,
    ) -> Result<&mut Self>
    where
        K: Into<String>,
        S: Into<StyleMap>,
    {
        let styles: Vec<(String, StyleMap)> = styles
            .into_iter()
            .map(|(k, s)| (k.into(), s.into()))
            .collect();
        if let Some((unknown, _)) = styles
            .iter()
            .find(|(c, _)| !self.columns.iter().any(|known| known == c))
        {
            return Err(StylerError::ShapeMismatch(format!(
                "styles reference unknown column '{}'",
                unknown
            )));
        }
        for (column, style) in styles {
            self.set_column_style(&column, style)?;
        }
        Ok(self)
    }

    /// Merge `styles` into the cells of `column` where `predicate` holds.
    pub fn set_cell_style(
        &mut self,
        column: &str,
        predicate: Expr,
        styles: impl Into<StyleMap>,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        let target = Target::Column(column);
        let fields = self.literal_fields(target, Some(&predicate), &styles.into());
        self.merge_style(target, fields);
        Ok(self)
    }

    /// Set one style property of `column` from an expression. Null results
    /// leave the cell's previous value in place.
    pub fn apply_cell_style(
        &mut self,
        column: &str,
        property: &str,
        value: Expr,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        let target = Target::Column(column);
        let field = self.computed_field(target, property, value);
        self.merge_style(target, vec![field]);
        Ok(self)
    }

    /// Merge `styles` into the `<tr>` of rows where `predicate` holds (all
    /// rows when `None`).
    pub fn set_row_style(
        &mut self,
        styles: impl Into<StyleMap>,
        predicate: Option<Expr>,
    ) -> &mut Self {
        let fields = self.literal_fields(Target::Row, predicate.as_ref(), &styles.into());
        self.merge_style(Target::Row, fields);
        self
    }

    /// Union `classes` into the cells of `column` where `predicate` holds.
    pub fn set_cell_class(
        &mut self,
        column: &str,
        classes: impl Into<ClassSet>,
        predicate: Option<Expr>,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        let tokens = Self::literal_tokens(classes.into());
        self.union_classes(Target::Column(column), tokens, predicate);
        Ok(self)
    }

    /// Union `classes` into the `<tr>` of rows where `predicate` holds.
    pub fn set_row_class(
        &mut self,
        classes: impl Into<ClassSet>,
        predicate: Option<Expr>,
    ) -> &mut Self {
        let tokens = Self::literal_tokens(classes.into());
        self.union_classes(Target::Row, tokens, predicate);
        self
    }

    /// Union classes computed per row. `classes` may yield a string, a list
    /// of strings or null; null leaves the row untouched.
    pub fn apply_cell_classes(&mut self, column: &str, classes: Expr) -> Result<&mut Self> {
        self.check_column(column)?;
        let gate = classes.clone().is_not_null();
        self.union_classes(Target::Column(column), vec![classes], Some(gate));
        Ok(self)
    }

    /// Row-level variant of [`Styler::apply_cell_classes`].
    pub fn apply_row_classes(&mut self, classes: Expr) -> &mut Self {
        let gate = classes.clone().is_not_null();
        self.union_classes(Target::Row, vec![classes], Some(gate));
        self
    }

    fn highlight(&mut self, column: &str, predicate: Expr, color: &str) -> Result<&mut Self> {
        self.set_cell_style(column, predicate, [("background-color", color)])
    }

    /// Background `color` on the cells holding the column maximum. NaN is
    /// ignored when finding it.
    pub fn highlight_max(&mut self, column: &str, color: &str) -> Result<&mut Self> {
        let predicate = col(column).eq(col(column).max());
        self.highlight(column, predicate, color)
    }

    /// Background `color` on the cells holding the column minimum.
    pub fn highlight_min(&mut self, column: &str, color: &str) -> Result<&mut Self> {
        let predicate = col(column).eq(col(column).min());
        self.highlight(column, predicate, color)
    }

    /// Background `color` on cells whose previous row is greater or equal.
    /// The first row never matches.
    pub fn highlight_decrease(&mut self, column: &str, color: &str) -> Result<&mut Self> {
        let previous = col(column).shift(lit(1));
        let predicate = previous
            .clone()
            .gt_eq(col(column))
            .and(previous.is_not_null());
        self.highlight(column, predicate, color)
    }

    /// Background `color` on cells whose previous row is smaller or equal.
    /// The first row never matches.
    pub fn highlight_increase(&mut self, column: &str, color: &str) -> Result<&mut Self> {
        let previous = col(column).shift(lit(1));
        let predicate = previous
            .clone()
            .lt_eq(col(column))
            .and(previous.is_not_null());
        self.highlight(column, predicate, color)
    }

    /// Background `color` on null cells.
    pub fn highlight_null(&mut self, column: &str, color: &str) -> Result<&mut Self> {
        let predicate = col(column).is_null();
        self.highlight(column, predicate, color)
    }

    /// Draw an in-cell bar proportional to each value's position between
    /// the option bounds. Null and NaN cells get no bar.
    pub fn format_bar<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        options: &BarOptions,
    ) -> Result<&mut Self> {
        self.check_columns(columns)?;
        for column in columns {
            let column: &str = column.as_ref();
            let target = Target::Column(column);
            let rel = relative(column, options.min, options.max);
            let color = options.color.clone();
            let align = options.align;
            let image = css_from(rel.clone(), move |x| {
                (!x.is_nan()).then(|| bar_image(&color, percentage(x), align))
            });
            let present = rel.is_not_nan();
            let mut fields = vec![self.computed_field(target, "background-image", image)];
            fields.extend(self.literal_fields(
                target,
                Some(&present),
                &StyleMap::new()
                    .with("background-size", bar_size(options.width, options.height))
                    .with("background-position", options.align.position()),
            ));
            self.merge_style(target, fields);
        }
        Ok(self)
    }

    /// Two-stop `background` gradient ending at each value's relative
    /// position.
    pub fn apply_gradient(&mut self, column: &str, options: &GradientOptions) -> Result<&mut Self> {
        self.check_column(column)?;
        let (start, end) = (options.start.clone(), options.end.clone());
        let background = css_from(relative(column, options.min, options.max), move |x| {
            (!x.is_nan()).then(|| gradient_background(&start, &end, percentage(x)))
        });
        let target = Target::Column(column);
        let field = self.computed_field(target, "background", background);
        self.merge_style(target, vec![field]);
        Ok(self)
    }

    /// Color each cell from a color map, with contrasting text.
    pub fn background_gradient(
        &mut self,
        column: &str,
        options: &ColorScaleOptions,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        let (lo, hi) = options.bounds();
        let rel = relative(column, lo, hi);

        let cmap = options.cmap.clone();
        let background = css_from(rel.clone(), move |x| Some(cmap.get(x).to_hex()));
        let cmap = options.cmap.clone();
        let threshold = options.text_color_threshold;
        let text = css_from(rel, move |x| {
            Some(cmap.get(x).contrasting_text(threshold).to_string())
        });

        let target = Target::Column(column);
        let fields = vec![
            self.computed_field(target, "background-color", background),
            self.computed_field(target, "color", text),
        ];
        self.merge_style(target, fields);
        Ok(self)
    }

    /// Round float cells of `column` to `decimals` places.
    pub fn set_precision(&mut self, column: &str, decimals: usize) -> Result<&mut Self> {
        self.check_column(column)?;
        self.formats.push(column, FormatRule::Precision(decimals));
        Ok(self)
    }

    /// Substitute each cell's content into `template` at `{}`.
    pub fn format<S: AsRef<str>>(&mut self, columns: &[S], template: &str) -> Result<&mut Self> {
        self.check_columns(columns)?;
        for column in columns {
            self.formats
                .push(column.as_ref(), FormatRule::Template(template.to_string()));
        }
        Ok(self)
    }

    /// Wrap cells of `column` in a link whose URL comes from `url_column`,
    /// optionally substituted into `url_template` at `{}`.
    pub fn create_hyperlink(
        &mut self,
        column: &str,
        url_column: &str,
        url_template: Option<&str>,
    ) -> Result<&mut Self> {
        self.check_column(column)?;
        self.check_column(url_column)?;
        self.formats.push(
            column,
            FormatRule::Hyperlink {
                url_column: url_column.to_string(),
                url_template: url_template.map(String::from),
            },
        );
        Ok(self)
    }

    /// Transform the content of `column` with a caller-supplied function.
    pub fn map_values<F>(&mut self, column: &str, name: &str, func: F) -> Result<&mut Self>
    where
        F: Fn(&Cell) -> std::result::Result<Cell, String> + Send + Sync + 'static,
    {
        self.check_column(column)?;
        self.formats.push(column, FormatRule::custom(name, func));
        Ok(self)
    }

    /// Text shown for null cells.
    pub fn set_null(&mut self, text: impl Into<String>) -> &mut Self {
        self.null_text = text.into();
        self
    }

    /// Replace display labels from a mapping or a full list.
    pub fn relabel(&mut self, labels: impl Into<Labels>) -> Result<&mut Self> {
        match labels.into() {
            Labels::Map(mapping) => self.attributes.relabel_map(mapping)?,
            Labels::List(list) => self.attributes.relabel_list(&list)?,
        }
        Ok(self)
    }

    /// Derive every display label from its column name.
    pub fn relabel_with<F: Fn(&str) -> String>(&mut self, derive: F) -> &mut Self {
        self.attributes.relabel_with(derive);
        self
    }

    /// Hide columns. Hiding an already hidden column is a no-op.
    pub fn skip_columns<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<&mut Self> {
        self.check_columns(columns)?;
        for column in columns {
            let column: &str = column.as_ref();
            self.visible.retain(|c| c != column);
            self.formats.drop_column(column);
        }
        Ok(self)
    }

    /// Render only rows `[page_index * page_size, (page_index + 1) * page_size)`.
    pub fn paginate(&mut self, page_index: i64, page_size: i64) -> Result<&mut Self> {
        self.attributes.set_page(Page::new(page_index, page_size)?);
        Ok(self)
    }

    /// Evaluate the pipeline once and return attribute-ready rows.
    pub fn to_table(&self) -> Result<RenderedTable> {
        debug!(
            columns = self.visible.len(),
            stages = self.stages,
            "rendering table"
        );

        let keys: Vec<&str> = self
            .visible
            .iter()
            .map(String::as_str)
            .chain([ROW])
            .collect();
        let mut selected: IndexSet<String> = IndexSet::new();
        for column in &self.visible {
            selected.insert(column.clone());
            selected.extend(self.formats.url_columns(column).map(String::from));
        }
        for key in &keys {
            selected.insert(class_column(key));
            let style = style_column(key);
            if self.style_fields.contains_key(&style) {
                selected.insert(style);
            }
        }

        let mut frame = self.frame.clone();
        if let Some(page) = self.attributes.page() {
            let len = IdxSize::try_from(page.size).unwrap_or(IdxSize::MAX);
            frame = frame.slice(page.offset() as i64, len);
        }
        let df = frame
            .select(selected.iter().map(|c| col(c.as_str())).collect::<Vec<_>>())
            .collect()?;

        let annotations = |key: &str| -> Result<(Vec<String>, Vec<String>)> {
            let classes = ClassSet::column_attrs(df.column(&class_column(key))?)?;
            let style = style_column(key);
            let styles = if self.style_fields.contains_key(&style) {
                StyleMap::column_css(df.column(&style)?)?
            } else {
                vec![String::new(); df.height()]
            };
            Ok((classes, styles))
        };
        let (row_classes, row_styles) = annotations(ROW)?;
        let cells = self
            .visible
            .iter()
            .map(|c| {
                let (classes, styles) = annotations(c)?;
                let content = self.formats.render_column(c, &df, &self.null_text)?;
                Ok((classes, styles, content))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<RenderedRow> = (0..df.height())
            .map(|i| RenderedRow {
                class: row_classes[i].clone(),
                style: row_styles[i].clone(),
                cells: cells
                    .iter()
                    .map(|(class, style, content)| RenderedCell {
                        class: class[i].clone(),
                        style: style[i].clone(),
                        content: content[i].clone(),
                    })
                    .collect(),
            })
            .collect();
        debug!(rows = rows.len(), "rendered table");

        Ok(RenderedTable {
            class: self.attributes.table_classes.to_attr(),
            header_class: self.attributes.header_classes.to_attr(),
            labels: self
                .visible
                .iter()
                .map(|c| self.attributes.label(c).to_string())
                .collect(),
            rows,
        })
    }

    /// Evaluate the pipeline once and return the `<table>` fragment.
    pub fn render(&self) -> Result<String> {
        Ok(self.to_table()?.to_html())
    }
}

/// `df.style()` shorthand.
pub trait StylerExt {
    fn style(&self) -> Result<Styler>;
}

impl StylerExt for DataFrame {
    fn style(&self) -> Result<Styler> {
        Styler::new(self.clone())
    }
}
