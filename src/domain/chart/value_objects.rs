use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Value Object - how a series is drawn
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    Line,
    #[display(fmt = "Candle")]
    #[strum(serialize = "candle")]
    Candle,
}

impl ChartMode {
    pub fn all() -> Vec<ChartMode> {
        ChartMode::iter().collect()
    }

    pub fn index(&self) -> usize {
        ChartMode::iter().position(|m| m == *self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<ChartMode> {
        ChartMode::iter().nth(index)
    }
}

/// Value Object - screen-space point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Value Object - axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open hit test: left/top edges are inside, right/bottom are not.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Value Object - chart area in pixels. The plot is the area minus
/// `padding` on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0, padding: 48.0 }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self { width, height, padding }
    }

    /// Plot rectangle relative to the viewport origin. Never negative in size.
    pub fn plot_rect(&self) -> Rect {
        let width = (self.width - 2.0 * self.padding).max(0.0);
        let height = (self.height - 2.0 * self.padding).max(0.0);
        Rect::new(self.padding, self.padding, width, height)
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// CSS `rgba()` string for the 2D canvas context
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const UP: Color = Color { r: 0.0, g: 0.894, b: 0.188, a: 1.0 };
    pub const DOWN: Color = Color { r: 0.902, g: 0.161, b: 0.216, a: 1.0 };
    pub const NEUTRAL: Color = Color::WHITE;
    pub const LINE: Color = Color { r: 0.0, g: 0.474, b: 0.945, a: 1.0 };
    pub const BACKGROUND: Color = Color { r: 0.070, g: 0.078, b: 0.094, a: 1.0 };
    pub const PANEL: Color = Color { r: 0.157, g: 0.169, b: 0.192, a: 1.0 };
    pub const GRID: Color = Color { r: 0.4, g: 0.4, b: 0.4, a: 0.35 };
    pub const TEXT_MUTED: Color = Color { r: 0.784, g: 0.784, b: 0.784, a: 1.0 };
}
