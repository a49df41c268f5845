use crate::application::render_frame::{DropdownView, FrameModel, TextItem};
use crate::domain::{
    chart::{ChartShape, Color, ProjectedChart, Rect},
    errors::StartupError,
    logging::{LogComponent, get_logger},
};
use crate::ui::{DashboardLayout, TextMeasure};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LINE_WIDTH: f64 = 2.5;
const MARKER_RADIUS: f64 = 4.0;

/// Canvas 2D renderer for the dashboard - Infrastructure implementation
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`. A missing context is fatal.
    pub fn attach(canvas: &HtmlCanvasElement) -> Result<Self, StartupError> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| StartupError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| StartupError::ContextUnavailable("getContext('2d') returned null".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| StartupError::ContextUnavailable("not a CanvasRenderingContext2d".into()))?;
        get_logger().info(LogComponent::Infrastructure("CanvasRenderer"), "2D context attached");
        Ok(Self { context })
    }

    /// Text measurer sharing this renderer's context
    pub fn text_measure(&self) -> CanvasTextMeasure {
        CanvasTextMeasure { context: self.context.clone() }
    }

    fn fill_style(&self, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
    }

    fn stroke_style(&self, color: Color) {
        self.context.set_stroke_style_str(&color.to_css());
    }

    fn fill_rect(&self, rect: &Rect, color: Color) {
        self.fill_style(color);
        self.context.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn text(&self, item: &TextItem) -> Result<(), JsValue> {
        self.fill_style(item.color);
        self.context.fill_text(&item.text, item.position.x, item.position.y)
    }

    /// Draw one frame. The caller holds the store lock for the duration so
    /// the frame reflects a single consistent view.
    pub fn draw(&self, frame: &FrameModel) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.set_font(&frame.font);
        ctx.set_text_baseline("middle");
        ctx.set_text_align("left");

        self.fill_rect(&Rect::new(0.0, 0.0, frame.width, frame.height), Color::BACKGROUND);

        for row in &frame.legend {
            if row.selected {
                self.fill_rect(&row.bounds, Color::PANEL);
            }
            self.fill_style(row.color);
            ctx.fill_text(&row.text, row.bounds.x, row.bounds.center().y)?;
        }

        ctx.save();
        let drawn = self.draw_chart(frame);
        ctx.restore();
        drawn?;

        // Top bar last so open option lists sit above everything else.
        self.fill_rect(&frame.topbar, Color::PANEL);
        if let Some(readout) = &frame.readout {
            self.text(readout)?;
        }
        for dropdown in &frame.dropdowns {
            self.draw_dropdown(dropdown)?;
        }
        Ok(())
    }

    fn draw_chart(&self, frame: &FrameModel) -> Result<(), JsValue> {
        let ctx = &self.context;
        let region = frame.chart_region;
        ctx.translate(region.x, region.y)?;

        let chart = &frame.chart;
        self.draw_grid(chart);

        if let Some(title) = &frame.title {
            self.text(title)?;
        }

        match &chart.shape {
            ChartShape::NoData => {
                self.fill_style(Color::TEXT_MUTED);
                let center = chart.plot.center();
                ctx.set_text_align("center");
                ctx.fill_text("No data", center.x, center.y)?;
                ctx.set_text_align("left");
            }
            ChartShape::Marker(point) => {
                self.fill_style(Color::LINE);
                ctx.begin_path();
                ctx.arc(point.x, point.y, MARKER_RADIUS, 0.0, std::f64::consts::TAU)?;
                ctx.fill();
            }
            ChartShape::Segments(segments) => {
                self.stroke_style(Color::LINE);
                self.fill_style(Color::LINE);
                ctx.set_line_width(LINE_WIDTH);
                for segment in segments {
                    match segment.as_slice() {
                        [] => {}
                        [only] => {
                            ctx.begin_path();
                            ctx.arc(only.x, only.y, LINE_WIDTH, 0.0, std::f64::consts::TAU)?;
                            ctx.fill();
                        }
                        [first, rest @ ..] => {
                            ctx.begin_path();
                            ctx.move_to(first.x, first.y);
                            for point in rest {
                                ctx.line_to(point.x, point.y);
                            }
                            ctx.stroke();
                        }
                    }
                }
            }
            ChartShape::Candles(bars) => {
                for bar in bars {
                    self.fill_rect(bar, Color::LINE);
                }
            }
        }

        self.fill_style(Color::TEXT_MUTED);
        ctx.set_text_align("right");
        for label in &chart.price_labels {
            ctx.fill_text(&label.text, label.position.x - 6.0, label.position.y)?;
        }
        ctx.set_text_baseline("top");
        for (i, label) in chart.time_labels.iter().enumerate() {
            let align = match (i, chart.time_labels.len()) {
                (_, 1) => "center",
                (0, _) => "left",
                _ => "right",
            };
            ctx.set_text_align(align);
            ctx.fill_text(&label.text, label.position.x, label.position.y + 6.0)?;
        }
        ctx.set_text_baseline("middle");
        ctx.set_text_align("left");
        Ok(())
    }

    fn draw_grid(&self, chart: &ProjectedChart) {
        let ctx = &self.context;
        let plot = chart.plot;
        let lines = chart.grid_lines.max(1);
        self.fill_rect(&plot, Color::PANEL);
        self.stroke_style(Color::GRID);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for i in 0..=lines {
            let t = i as f64 / lines as f64;
            let y = plot.y + plot.height * t;
            ctx.move_to(plot.x, y);
            ctx.line_to(plot.right(), y);
            let x = plot.x + plot.width * t;
            ctx.move_to(x, plot.y);
            ctx.line_to(x, plot.bottom());
        }
        ctx.stroke();
    }

    fn draw_dropdown(&self, dropdown: &DropdownView) -> Result<(), JsValue> {
        let ctx = &self.context;
        let bounds = dropdown.bounds;
        self.fill_rect(&bounds, if dropdown.open { Color::LINE.with_alpha(0.35) } else { Color::BACKGROUND });
        self.stroke_style(Color::GRID);
        ctx.set_line_width(1.5);
        ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
        self.fill_style(Color::TEXT_MUTED);
        ctx.fill_text(&dropdown.header, bounds.x + 10.0, bounds.center().y)?;

        for option in &dropdown.options {
            let background = if option.selected { Color::LINE.with_alpha(0.5) } else { Color::PANEL };
            self.fill_rect(&option.bounds, background);
            self.fill_style(Color::WHITE);
            ctx.fill_text(&option.text, option.bounds.x + 10.0, option.bounds.center().y)?;
        }
        Ok(())
    }
}

/// Measures text with `measureText` on the dashboard canvas
#[derive(Debug, Clone)]
pub struct CanvasTextMeasure {
    context: CanvasRenderingContext2d,
}

impl TextMeasure for CanvasTextMeasure {
    fn text_width(&self, layout: &DashboardLayout, text: &str) -> f64 {
        self.context.set_font(&layout.font());
        match self.context.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(e) => {
                crate::log_debug!(LogComponent::Infrastructure("CanvasRenderer"), "measureText failed: {:?}", e);
                layout.estimated_text_width(text)
            }
        }
    }
}
