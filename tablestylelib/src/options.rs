//! Option structs for the scaled formatters.
//!
//! Each struct has sensible defaults and builder-style setters, and can be
//! deserialized from a recipe with any subset of its fields.

use serde::{Deserialize, Serialize};

use crate::style::colors::{ColorMap, DEFAULT_TEXT_COLOR_THRESHOLD};
use crate::style::scale::{Aggregate, Align, Bound};

/// Options for `format_bar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    /// Bar color, any CSS color
    pub color: String,
    /// Value mapped to an empty bar
    pub min: Bound,
    /// Value mapped to a full bar
    pub max: Bound,
    /// Bar box width, percent of the cell
    pub width: f64,
    /// Bar box height, percent of the cell
    pub height: f64,
    pub align: Align,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            color: "#5fba7d".to_string(),
            min: Bound::Aggregate(Aggregate::Min),
            max: Bound::Aggregate(Aggregate::Max),
            width: 100.0,
            height: 100.0,
            align: Align::Left,
        }
    }
}

impl BarOptions {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Default::default()
        }
    }

    /// Builder: set the lower bound
    pub fn with_min(mut self, min: impl Into<Bound>) -> Self {
        self.min = min.into();
        self
    }

    /// Builder: set the upper bound
    pub fn with_max(mut self, max: impl Into<Bound>) -> Self {
        self.max = max.into();
        self
    }

    /// Builder: set the bar box size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the edge the bar grows from
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Options for `apply_gradient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    pub start: String,
    pub end: String,
    pub min: Bound,
    pub max: Bound,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            start: "white".to_string(),
            end: "#5fba7d".to_string(),
            min: Bound::Aggregate(Aggregate::Min),
            max: Bound::Aggregate(Aggregate::Max),
        }
    }
}

impl GradientOptions {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    /// Builder: set both bounds
    pub fn with_bounds(mut self, min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        self.min = min.into();
        self.max = max.into();
        self
    }
}

/// Options for `background_gradient`.
///
/// `vmin`/`vmax` default to the column's observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleOptions {
    pub cmap: ColorMap,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Luminance below which cell text turns light
    pub text_color_threshold: f64,
}

impl Default for ColorScaleOptions {
    fn default() -> Self {
        Self {
            cmap: ColorMap::default(),
            vmin: None,
            vmax: None,
            text_color_threshold: DEFAULT_TEXT_COLOR_THRESHOLD,
        }
    }
}

impl ColorScaleOptions {
    pub fn new(cmap: ColorMap) -> Self {
        Self {
            cmap,
            ..Default::default()
        }
    }

    /// Builder: pin the range instead of using the column min/max
    pub fn with_range(mut self, vmin: f64, vmax: f64) -> Self {
        self.vmin = Some(vmin);
        self.vmax = Some(vmax);
        self
    }

    /// Bounds to scale against.
    pub fn bounds(&self) -> (Bound, Bound) {
        (
            self.vmin.map(Bound::Literal).unwrap_or(Bound::Aggregate(Aggregate::Min)),
            self.vmax.map(Bound::Literal).unwrap_or(Bound::Aggregate(Aggregate::Max)),
        )
    }
}
