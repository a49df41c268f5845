use crate::domain::chart::ChartMode;
use crate::domain::market_data::Timeframe;
use serde::{Deserialize, Serialize};

/// What the user is looking at. Mutated only by `UiStateMachine::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    /// Index into the configured symbol list; `None` until the user picks one
    #[serde(rename = "symbol", default)]
    pub selected_symbol: Option<usize>,
    #[serde(default)]
    pub chart_mode: ChartMode,
    #[serde(default)]
    pub timeframe: Timeframe,
}

impl SelectionState {
    /// Drop a symbol index that no longer points into the configured list.
    pub fn clamp_to(mut self, symbol_count: usize) -> Self {
        if self.selected_symbol.is_some_and(|i| i >= symbol_count) {
            self.selected_symbol = None;
        }
        self
    }
}
