use crate::domain::market_data::{SeriesRecord, Symbol};
use crate::domain::selection::SelectionState;

/// Full readable/persistable state of every symbol at one instant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub series: Vec<SeriesRecord>,
    pub selection: Option<SelectionState>,
}

impl Snapshot {
    pub fn record(&self, symbol: &Symbol) -> Option<&SeriesRecord> {
        self.series.iter().find(|r| &r.symbol == symbol)
    }

    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
