use crate::domain::chart::{ChartMode, Point, Rect};
use crate::domain::market_data::{Symbol, Timeframe};
use derive_more::Display;

use super::state::UiCommand;

/// The three top-bar dropdowns, in left-to-right order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DropdownId {
    #[display(fmt = "Crypto")]
    Symbol,
    #[display(fmt = "Chart")]
    ChartMode,
    #[display(fmt = "Time")]
    Timeframe,
}

impl DropdownId {
    pub const ALL: [DropdownId; 3] = [DropdownId::Symbol, DropdownId::ChartMode, DropdownId::Timeframe];

    pub fn slot(&self) -> usize {
        match self {
            DropdownId::Symbol => 0,
            DropdownId::ChartMode => 1,
            DropdownId::Timeframe => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub id: DropdownId,
    pub options: Vec<String>,
    pub bounds: Rect,
    pub open: bool,
    pub selected: usize,
}

impl Dropdown {
    pub fn new(id: DropdownId, options: Vec<String>, bounds: Rect, selected: usize) -> Self {
        Self { id, options, bounds, open: false, selected }
    }

    pub fn symbols(symbols: &[Symbol], bounds: Rect, selected: usize) -> Self {
        Self::new(DropdownId::Symbol, symbols.iter().map(|s| s.to_string()).collect(), bounds, selected)
    }

    pub fn chart_modes(bounds: Rect, selected: ChartMode) -> Self {
        let options = ChartMode::all().iter().map(|m| m.to_string()).collect();
        Self::new(DropdownId::ChartMode, options, bounds, selected.index())
    }

    pub fn timeframes(bounds: Rect, selected: Timeframe) -> Self {
        let options = Timeframe::all().iter().map(|tf| tf.to_string()).collect();
        Self::new(DropdownId::Timeframe, options, bounds, selected.index())
    }

    /// Text shown on the header pill
    pub fn header_text(&self) -> &str {
        self.options.get(self.selected).map(String::as_str).unwrap_or("-")
    }

    /// Row `index` of the option list, stacked directly under the header
    pub fn option_rect(&self, index: usize, line_height: f64) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.bottom() + index as f64 * line_height,
            self.bounds.width,
            line_height,
        )
    }

    pub fn options_panel(&self, line_height: f64) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.bottom(),
            self.bounds.width,
            self.options.len() as f64 * line_height,
        )
    }

    /// Option row under `point`, if the list is open
    pub fn option_at(&self, point: Point, line_height: f64) -> Option<usize> {
        if !self.open || line_height <= 0.0 || !self.options_panel(line_height).contains(point) {
            return None;
        }
        let index = ((point.y - self.bounds.bottom()) / line_height).floor() as usize;
        (index < self.options.len()).then_some(index)
    }

    /// Command bound to option `index`
    pub fn command_for(&self, index: usize) -> Option<UiCommand> {
        match self.id {
            DropdownId::Symbol => (index < self.options.len()).then_some(UiCommand::SelectSymbol(index)),
            DropdownId::ChartMode => ChartMode::from_index(index).map(UiCommand::SetChartMode),
            DropdownId::Timeframe => Timeframe::from_index(index).map(UiCommand::SetTimeframe),
        }
    }
}
