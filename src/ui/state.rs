use super::dropdown::{Dropdown, DropdownId};
use super::layout::DashboardLayout;
use crate::domain::chart::{ChartMode, Point, Rect};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Symbol, Timeframe};
use crate::domain::selection::SelectionState;

/// The effect of picking a dropdown option or legend row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    SelectSymbol(usize),
    SetChartMode(ChartMode),
    SetTimeframe(Timeframe),
}

/// What a single pointer press did. At most one state mutation per press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    ToggledDropdown { id: DropdownId, open: bool },
    OptionSelected { id: DropdownId, index: usize, command: UiCommand },
    Dismissed(DropdownId),
    SymbolRowSelected(usize),
    Ignored,
}

impl PressOutcome {
    /// Whether the press changed anything worth a redraw
    pub fn is_handled(&self) -> bool {
        !matches!(self, PressOutcome::Ignored)
    }
}

/// Selection plus dropdown open/closed state, driven by pointer presses.
#[derive(Debug, Clone)]
pub struct UiStateMachine {
    dropdowns: Vec<Dropdown>,
    active: Option<DropdownId>,
    legend_rows: Vec<Rect>,
    selection: SelectionState,
    symbol_count: usize,
    line_height: f64,
}

impl UiStateMachine {
    /// A stale symbol index is cleared, and with no symbol selected the
    /// first configured one is picked.
    pub fn new(symbols: &[Symbol], selection: SelectionState, layout: &DashboardLayout) -> Self {
        let mut selection = selection.clamp_to(symbols.len());
        if selection.selected_symbol.is_none() && !symbols.is_empty() {
            selection.selected_symbol = Some(0);
        }
        let dropdowns = vec![
            Dropdown::symbols(
                symbols,
                layout.dropdown_header(DropdownId::Symbol.slot()),
                selection.selected_symbol.unwrap_or(0),
            ),
            Dropdown::chart_modes(layout.dropdown_header(DropdownId::ChartMode.slot()), selection.chart_mode),
            Dropdown::timeframes(layout.dropdown_header(DropdownId::Timeframe.slot()), selection.timeframe),
        ];
        Self {
            dropdowns,
            active: None,
            legend_rows: Vec::new(),
            selection,
            symbol_count: symbols.len(),
            line_height: layout.line_height(),
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn active_dropdown(&self) -> Option<DropdownId> {
        self.active
    }

    pub fn dropdowns(&self) -> &[Dropdown] {
        &self.dropdowns
    }

    pub fn dropdown(&self, id: DropdownId) -> Option<&Dropdown> {
        self.dropdowns.iter().find(|d| d.id == id)
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn legend_rows(&self) -> &[Rect] {
        &self.legend_rows
    }

    /// Recompute header geometry after a resize or scale change
    pub fn relayout(&mut self, layout: &DashboardLayout) {
        for dropdown in &mut self.dropdowns {
            dropdown.bounds = layout.dropdown_header(dropdown.id.slot());
        }
        self.line_height = layout.line_height();
    }

    /// Legend hit boxes, one per symbol in configured order
    pub fn set_legend_rows(&mut self, rows: Vec<Rect>) {
        self.legend_rows = rows;
    }

    /// Route one pointer press. Targets are tested in priority order
    /// (header, open option list, dismiss, legend row) and the first match
    /// consumes the press.
    pub fn press(&mut self, point: Point) -> PressOutcome {
        if let Some(slot) = self.dropdowns.iter().position(|d| d.bounds.contains(point)) {
            return self.toggle(slot);
        }

        if let Some(active) = self.active {
            let line_height = self.line_height;
            let hit = self.dropdowns.iter().position(|d| d.id == active).and_then(|slot| {
                let dropdown = &self.dropdowns[slot];
                let index = dropdown.option_at(point, line_height)?;
                Some((slot, index, dropdown.command_for(index)?))
            });
            if let Some((slot, index, command)) = hit {
                self.dropdowns[slot].selected = index;
                self.dropdowns[slot].open = false;
                self.active = None;
                self.dispatch(command);
                return PressOutcome::OptionSelected { id: active, index, command };
            }

            self.close_all();
            return PressOutcome::Dismissed(active);
        }

        if let Some(index) = self.legend_rows.iter().position(|row| row.contains(point)) {
            if index < self.symbol_count {
                self.dispatch(UiCommand::SelectSymbol(index));
                return PressOutcome::SymbolRowSelected(index);
            }
        }

        PressOutcome::Ignored
    }

    fn toggle(&mut self, slot: usize) -> PressOutcome {
        let id = self.dropdowns[slot].id;
        let open = !self.dropdowns[slot].open;
        if open {
            self.close_all();
        }
        self.dropdowns[slot].open = open;
        self.active = if open {
            Some(id)
        } else if self.active == Some(id) {
            None
        } else {
            self.active
        };
        PressOutcome::ToggledDropdown { id, open }
    }

    fn close_all(&mut self) {
        for dropdown in &mut self.dropdowns {
            dropdown.open = false;
        }
        self.active = None;
    }

    /// The single state-transition function for selection changes. Keeps
    /// the matching dropdown header in sync.
    pub fn dispatch(&mut self, command: UiCommand) {
        let (id, index) = match command {
            UiCommand::SelectSymbol(index) => {
                if index >= self.symbol_count {
                    crate::log_warn!(LogComponent::Presentation("UiState"), "symbol index {} out of range", index);
                    return;
                }
                self.selection.selected_symbol = Some(index);
                (DropdownId::Symbol, index)
            }
            UiCommand::SetChartMode(mode) => {
                self.selection.chart_mode = mode;
                (DropdownId::ChartMode, mode.index())
            }
            UiCommand::SetTimeframe(timeframe) => {
                self.selection.timeframe = timeframe;
                (DropdownId::Timeframe, timeframe.index())
            }
        };
        if let Some(dropdown) = self.dropdowns.iter_mut().find(|d| d.id == id) {
            dropdown.selected = index;
        }
    }
}
