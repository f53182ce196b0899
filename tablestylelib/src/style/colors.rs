//! RGB colors, two-color gradients and multi-stop color maps.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StylerError;
use crate::Result;

/// Text colors picked by [`Color::contrasting_text`].
pub const DARK_TEXT: &str = "#000000";
pub const LIGHT_TEXT: &str = "#f1f1f1";

/// Luminance below which light text is used on a background.
pub const DEFAULT_TEXT_COLOR_THRESHOLD: f64 = 0.408;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || StylerError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse `rgb(r, g, b)`.
    pub fn from_rgb(rgb: &str) -> Result<Self> {
        static RGB: OnceLock<Regex> = OnceLock::new();
        let re = RGB.get_or_init(|| {
            Regex::new(r"^rgb\((\d{1,3}), ?(\d{1,3}), ?(\d{1,3})\)$").expect("valid rgb pattern")
        });
        let invalid = || StylerError::InvalidColor(rgb.to_string());
        let captures = re.captures(rgb).ok_or_else(invalid)?;
        let channel = |i: usize| captures[i].parse::<u8>().map_err(|_| invalid());
        Ok(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgb(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * linear_channel(self.r)
            + 0.7152 * linear_channel(self.g)
            + 0.0722 * linear_channel(self.b)
    }

    /// Dark or light text, whichever reads better on this background.
    pub fn contrasting_text(&self, threshold: f64) -> &'static str {
        if self.relative_luminance() < threshold {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        }
    }
}

impl FromStr for Color {
    type Err = StylerError;

    /// Accepts `#rrggbb`, `rgb(r, g, b)` or a basic color name.
    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        if s.starts_with("rgb(") {
            return Self::from_rgb(s);
        }
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::new(255, 0, 0)),
            "green" => Ok(Self::new(0, 255, 0)),
            "blue" => Ok(Self::new(0, 0, 255)),
            "yellow" => Ok(Self::new(255, 255, 0)),
            "cyan" => Ok(Self::new(0, 255, 255)),
            "magenta" => Ok(Self::new(255, 0, 255)),
            "black" => Ok(Self::new(0, 0, 0)),
            "white" => Ok(Self::new(255, 255, 255)),
            _ => Err(StylerError::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Linear interpolation between two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub start: Color,
    pub end: Color,
}

impl Gradient {
    pub fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }

    /// Color at position `a`, clamped to `[0, 1]`.
    pub fn interpolate(&self, a: f64) -> Color {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Color::new(
            mix(self.start.r, self.end.r, a),
            mix(self.start.g, self.end.g, a),
            mix(self.start.b, self.end.b, a),
        )
    }
}

/// Piecewise-linear color scale over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    stops: Vec<(f64, Color)>,
}

impl ColorMap {
    /// Build from `(position, color)` stops; stops are sorted by position.
    pub fn new(mut stops: Vec<(f64, Color)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(StylerError::ShapeMismatch(
                "a color map needs at least one stop".to_string(),
            ));
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { stops })
    }

    /// Evenly spaced stops over `[0, 1]`.
    pub fn from_palette(colors: &[Color]) -> Result<Self> {
        let n = colors.len();
        let step = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
        Self::new(
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64 * step, *c))
                .collect(),
        )
    }

    /// White to red.
    pub fn red_scale() -> Self {
        Self {
            stops: vec![(0.0, Color::new(255, 255, 255)), (1.0, Color::new(255, 0, 0))],
        }
    }

    /// Color at `value`; values outside the stops take the nearest end color.
    pub fn get(&self, value: f64) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if value.is_nan() || value <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let ((lo, left), (hi, right)) = (pair[0], pair[1]);
            if value <= hi {
                let a = if hi > lo { (value - lo) / (hi - lo) } else { 1.0 };
                return Gradient::new(left, right).interpolate(a);
            }
        }
        last.1
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::red_scale()
    }
}

fn mix(x: u8, y: u8, a: f64) -> u8 {
    (x as f64 * (1.0 - a) + y as f64 * a).round() as u8
}

fn linear_channel(c: u8) -> f64 {
    let x = c as f64 / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}
