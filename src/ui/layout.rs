use crate::domain::chart::{Rect, Viewport};

pub const BASE_FONT_SIZE: f64 = 12.0;
pub const TOPBAR_HEIGHT: f64 = 38.0;
pub const DROPDOWN_MARGIN: f64 = 12.0;
pub const DROPDOWN_WIDTH: f64 = 80.0;
pub const DROPDOWN_TOP: f64 = 5.0;
pub const SIDEBAR_WIDTH: f64 = 180.0;
pub const CHART_PADDING: f64 = 48.0;
/// Approximate glyph advance relative to the font size, used when no canvas
/// context can measure text
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Width of `text` drawn in `layout`'s font, in canvas pixels
pub trait TextMeasure {
    fn text_width(&self, layout: &DashboardLayout, text: &str) -> f64;
}

/// Glyph-count estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphEstimate;

impl TextMeasure for GlyphEstimate {
    fn text_width(&self, layout: &DashboardLayout, text: &str) -> f64 {
        layout.estimated_text_width(text)
    }
}

/// Pixel geometry of the dashboard for a given canvas size and device scale.
/// Drawing and hit testing both read from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardLayout {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0, scale: 1.0 }
    }
}

impl DashboardLayout {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { width: width.max(0.0), height: height.max(0.0), scale }
    }

    pub fn font_size(&self) -> f64 {
        BASE_FONT_SIZE * self.scale
    }

    pub fn font(&self) -> String {
        format!("{}px sans-serif", self.font_size().round())
    }

    pub fn line_height(&self) -> f64 {
        self.font_size() * 1.5 + 5.0 * self.scale
    }

    pub fn topbar_height(&self) -> f64 {
        TOPBAR_HEIGHT * self.scale
    }

    pub fn topbar(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.topbar_height())
    }

    /// Header pill of the `slot`-th dropdown, left to right
    pub fn dropdown_header(&self, slot: usize) -> Rect {
        let x = DROPDOWN_MARGIN + slot as f64 * (DROPDOWN_WIDTH + DROPDOWN_MARGIN);
        let height = (self.topbar_height() - 10.0).max(1.0);
        Rect::new(x, DROPDOWN_TOP, DROPDOWN_WIDTH, height)
    }

    pub fn estimated_text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size() * GLYPH_WIDTH_RATIO
    }

    /// Clickable box of the `index`-th legend row, as wide as its text
    pub fn legend_row(&self, index: usize, text_width: f64) -> Rect {
        let x = 10.0 * self.scale;
        let y = self.topbar_height() + 10.0 * self.scale + index as f64 * self.line_height();
        Rect::new(x, y, text_width.max(0.0), self.line_height())
    }

    pub fn sidebar_width(&self) -> f64 {
        (SIDEBAR_WIDTH * self.scale).min(self.width)
    }

    /// Region right of the sidebar and below the top bar
    pub fn chart_region(&self) -> Rect {
        let x = self.sidebar_width();
        let y = self.topbar_height().min(self.height);
        Rect::new(x, y, (self.width - x).max(0.0), (self.height - y).max(0.0))
    }

    pub fn chart_viewport(&self) -> Viewport {
        let region = self.chart_region();
        Viewport::new(region.width, region.height, CHART_PADDING * self.scale)
    }
}
