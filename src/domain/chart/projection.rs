use super::value_objects::{ChartMode, Point, Rect, Viewport};
use crate::domain::market_data::PricePoint;
use crate::time_utils::format_time_label;
use chrono::TimeDelta;

/// Half-width of the synthetic band used when every price in the window is equal
pub const FLAT_BAND_EPSILON: f64 = 0.001;
pub const MIN_WINDOW_CAP: usize = 100;
pub const MAX_WINDOW_CAP: usize = 1000;
pub const CANDLE_HEIGHT: f64 = 16.0;
pub const CANDLE_WIDTH_RATIO: f64 = 0.7;

/// Vertical price range the plot is normalized against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    /// Tight band over `prices`, widened to `±FLAT_BAND_EPSILON` when flat.
    pub fn over(prices: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = prices
            .into_iter()
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })?;
        if max - min <= 0.0 {
            return Some(Self { min: min - FLAT_BAND_EPSILON, max: max + FLAT_BAND_EPSILON });
        }
        Some(Self { min, max })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Pixel Y for `price` inside `plot`; higher prices land higher on screen.
    pub fn price_to_y(&self, price: f64, plot: &Rect) -> f64 {
        let normalized = (price - self.min) / self.range();
        plot.y + plot.height * (1.0 - normalized)
    }
}

/// Text placed next to an axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartShape {
    /// Nothing to draw yet
    NoData,
    /// Exactly one sample, drawn as a dot
    Marker(Point),
    /// Polylines; a new one starts after every gap
    Segments(Vec<Vec<Point>>),
    /// One fixed-height bar per sample
    Candles(Vec<Rect>),
}

/// Pixel-space geometry for one symbol's window of history
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedChart {
    pub shape: ChartShape,
    pub plot: Rect,
    pub band: Option<PriceBand>,
    pub price_labels: Vec<AxisLabel>,
    pub time_labels: Vec<AxisLabel>,
    pub grid_lines: usize,
    /// Samples actually projected after the window cap
    pub point_count: usize,
}

impl ProjectedChart {
    pub fn is_empty(&self) -> bool {
        matches!(self.shape, ChartShape::NoData)
    }
}

/// Maps price history onto chart geometry. Stateless apart from its settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartProjector {
    pub grid_lines: usize,
    pub gap_threshold: TimeDelta,
}

impl ChartProjector {
    pub fn new(grid_lines: usize, gap_threshold: TimeDelta) -> Self {
        Self { grid_lines: grid_lines.max(1), gap_threshold }
    }

    /// Most points a plot this wide can show
    pub fn window_cap(plot_width: f64) -> usize {
        let width = if plot_width.is_finite() { plot_width.max(0.0) as usize } else { 0 };
        width.clamp(MIN_WINDOW_CAP, MAX_WINDOW_CAP)
    }

    pub fn project(&self, history: &[PricePoint], viewport: Viewport, mode: ChartMode) -> ProjectedChart {
        let plot = viewport.plot_rect();
        let cap = Self::window_cap(plot.width);
        let window = &history[history.len().saturating_sub(cap)..];

        let Some(band) = PriceBand::over(window.iter().map(|p| p.price)) else {
            return ProjectedChart {
                shape: ChartShape::NoData,
                plot,
                band: None,
                price_labels: Vec::new(),
                time_labels: Vec::new(),
                grid_lines: self.grid_lines,
                point_count: 0,
            };
        };

        let shape = match window {
            [_] => ChartShape::Marker(plot.center()),
            _ => match mode {
                ChartMode::Line => ChartShape::Segments(self.line_segments(window, &band, &plot)),
                ChartMode::Candle => ChartShape::Candles(Self::candle_bars(window, &band, &plot)),
            },
        };

        ProjectedChart {
            shape,
            plot,
            band: Some(band),
            price_labels: self.price_labels(&band, &plot),
            time_labels: Self::time_labels(window, &plot),
            grid_lines: self.grid_lines,
            point_count: window.len(),
        }
    }

    fn rank_to_x(rank: usize, count: usize, plot: &Rect) -> f64 {
        if count < 2 {
            return plot.center().x;
        }
        plot.x + plot.width * rank as f64 / (count - 1) as f64
    }

    fn line_segments(&self, window: &[PricePoint], band: &PriceBand, plot: &Rect) -> Vec<Vec<Point>> {
        let mut segments: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for (i, point) in window.iter().enumerate() {
            if i > 0 && point.timestamp - window[i - 1].timestamp > self.gap_threshold {
                segments.push(std::mem::take(&mut current));
            }
            let x = Self::rank_to_x(i, window.len(), plot);
            current.push(Point::new(x, band.price_to_y(point.price, plot)));
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn candle_bars(window: &[PricePoint], band: &PriceBand, plot: &Rect) -> Vec<Rect> {
        let slot = plot.width / window.len() as f64;
        let width = slot * CANDLE_WIDTH_RATIO;
        window
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let center_x = plot.x + slot * (i as f64 + 0.5);
                let center_y = band.price_to_y(point.price, plot);
                Rect::new(center_x - width / 2.0, center_y - CANDLE_HEIGHT / 2.0, width, CANDLE_HEIGHT)
            })
            .collect()
    }

    fn price_labels(&self, band: &PriceBand, plot: &Rect) -> Vec<AxisLabel> {
        let grid = self.grid_lines as f64;
        (0..=self.grid_lines)
            .map(|i| {
                let step = i as f64;
                let price = band.min + band.range() * (grid - step) / grid;
                AxisLabel {
                    text: format!("{:.2}", price),
                    position: Point::new(plot.x, plot.y + plot.height * step / grid),
                }
            })
            .collect()
    }

    fn time_labels(window: &[PricePoint], plot: &Rect) -> Vec<AxisLabel> {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return Vec::new();
        };
        let span = last.timestamp - first.timestamp;
        let baseline = plot.bottom();
        if window.len() == 1 {
            return vec![AxisLabel {
                text: format_time_label(first.timestamp, span),
                position: Point::new(plot.center().x, baseline),
            }];
        }
        vec![
            AxisLabel { text: format_time_label(first.timestamp, span), position: Point::new(plot.x, baseline) },
            AxisLabel { text: format_time_label(last.timestamp, span), position: Point::new(plot.right(), baseline) },
        ]
    }
}
