use crate::domain::{
    chart::{ChartMode, ChartProjector, Color, Point, ProjectedChart, Rect},
    market_data::{SymbolSeries, Trend},
};
use crate::ui::{DashboardLayout, DropdownId, TextMeasure, UiStateMachine};

pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::UP,
        Trend::Down => Color::DOWN,
        Trend::Neutral => Color::NEUTRAL,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub text: String,
    pub bounds: Rect,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownView {
    pub id: DropdownId,
    pub header: String,
    pub bounds: Rect,
    pub open: bool,
    /// Empty while the dropdown is closed
    pub options: Vec<OptionRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub text: String,
    pub bounds: Rect,
    pub color: Color,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub position: Point,
    pub color: Color,
}

/// Everything the renderer needs for one frame, in canvas pixels.
/// Chart geometry is relative to `chart_region`'s origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameModel {
    pub width: f64,
    pub height: f64,
    pub font: String,
    pub line_height: f64,
    pub topbar: Rect,
    pub dropdowns: Vec<DropdownView>,
    pub readout: Option<TextItem>,
    pub legend: Vec<LegendRow>,
    pub chart_region: Rect,
    pub title: Option<TextItem>,
    pub chart: ProjectedChart,
    pub chart_mode: ChartMode,
}

impl FrameModel {
    /// Assemble a frame from one consistent view of the series.
    pub fn build(
        series: &[SymbolSeries],
        ui: &UiStateMachine,
        layout: &DashboardLayout,
        projector: &ChartProjector,
        measure: &dyn TextMeasure,
    ) -> Self {
        let selection = ui.selection();
        let selected = selection.selected_symbol.and_then(|i| series.get(i));
        let line_height = ui.line_height();

        let dropdowns = ui
            .dropdowns()
            .iter()
            .map(|dropdown| DropdownView {
                id: dropdown.id,
                header: format!("{} {}", dropdown.header_text(), if dropdown.open { "▲" } else { "▼" }),
                bounds: dropdown.bounds,
                open: dropdown.open,
                options: if dropdown.open {
                    dropdown
                        .options
                        .iter()
                        .enumerate()
                        .map(|(i, text)| OptionRow {
                            text: text.clone(),
                            bounds: dropdown.option_rect(i, line_height),
                            selected: i == dropdown.selected,
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        let readout = selected.and_then(|s| {
            let price = s.last_price()?;
            let text = format!("{}: {}", s.symbol(), price);
            let x = (layout.width - measure.text_width(layout, &text) - 12.0 * layout.scale).max(0.0);
            Some(TextItem { text, position: Point::new(x, layout.topbar_height() / 2.0), color: trend_color(s.trend()) })
        });

        let legend = series
            .iter()
            .zip(legend_bounds(series, layout, measure))
            .enumerate()
            .map(|(i, (s, bounds))| LegendRow {
                text: s.display_text().to_string(),
                bounds,
                color: trend_color(s.trend()),
                selected: selection.selected_symbol == Some(i),
            })
            .collect();

        let viewport = layout.chart_viewport();
        let history = selected.map(|s| selection.timeframe.window(s.history())).unwrap_or(&[]);
        let chart = projector.project(history, viewport, selection.chart_mode);

        let title = selected.map(|s| TextItem {
            text: chart_title(s, selection.chart_mode, &selection.timeframe.to_string()),
            position: Point::new(viewport.padding, viewport.padding / 2.0),
            color: Color::TEXT_MUTED,
        });

        Self {
            width: layout.width,
            height: layout.height,
            font: layout.font(),
            line_height,
            topbar: layout.topbar(),
            dropdowns,
            readout,
            legend,
            chart_region: layout.chart_region(),
            title,
            chart,
            chart_mode: selection.chart_mode,
        }
    }
}

/// Hit boxes of the legend rows, one per series, sized to the drawn text
pub fn legend_bounds(series: &[SymbolSeries], layout: &DashboardLayout, measure: &dyn TextMeasure) -> Vec<Rect> {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| layout.legend_row(i, measure.text_width(layout, s.display_text())))
        .collect()
}

pub fn chart_title(series: &SymbolSeries, mode: ChartMode, timeframe: &str) -> String {
    format!("{} {} Chart ({})", series.symbol(), mode, timeframe)
}
