mod support;

use price_dashboard_wasm::domain::chart::{ChartMode, Point};
use price_dashboard_wasm::domain::market_data::Timeframe;
use price_dashboard_wasm::domain::selection::SelectionState;
use price_dashboard_wasm::ui::{DashboardLayout, DropdownId, PressOutcome, UiCommand, UiStateMachine};
use support::symbols;

// At scale 1: headers are 80x28 at x = 12, 104, 196 (bottom edge y = 33)
// and every option/legend row is 23px tall.
const SYMBOL_HEADER: Point = Point { x: 50.0, y: 20.0 };
const MODE_HEADER: Point = Point { x: 140.0, y: 20.0 };
const TIMEFRAME_HEADER: Point = Point { x: 230.0, y: 20.0 };

fn option_point(header_x: f64, index: usize) -> Point {
    Point::new(header_x, 33.0 + 23.0 * index as f64 + 10.0)
}

fn machine() -> UiStateMachine {
    let layout = DashboardLayout::new(800.0, 600.0, 1.0);
    let syms = symbols(&["BTCUSDT", "ETHUSDT", "BNBUSDT"]);
    let mut ui = UiStateMachine::new(&syms, SelectionState::default(), &layout);
    ui.set_legend_rows(
        syms.iter()
            .enumerate()
            .map(|(i, s)| layout.legend_row(i, layout.estimated_text_width(&format!("{s}: Loading..."))))
            .collect(),
    );
    ui
}

#[test]
fn starts_on_the_first_symbol() {
    let ui = machine();
    assert_eq!(ui.selection().selected_symbol, Some(0));
    assert_eq!(ui.active_dropdown(), None);
    assert!(ui.dropdowns().iter().all(|d| !d.open));
}

#[test]
fn header_press_toggles_its_dropdown() {
    let mut ui = machine();
    assert_eq!(ui.press(MODE_HEADER), PressOutcome::ToggledDropdown { id: DropdownId::ChartMode, open: true });
    assert_eq!(ui.active_dropdown(), Some(DropdownId::ChartMode));
    assert_eq!(ui.press(MODE_HEADER), PressOutcome::ToggledDropdown { id: DropdownId::ChartMode, open: false });
    assert_eq!(ui.active_dropdown(), None);
}

#[test]
fn choosing_an_option_applies_it_and_closes() {
    let mut ui = machine();
    ui.press(MODE_HEADER);

    let outcome = ui.press(option_point(140.0, 1));

    assert_eq!(
        outcome,
        PressOutcome::OptionSelected {
            id: DropdownId::ChartMode,
            index: 1,
            command: UiCommand::SetChartMode(ChartMode::Candle)
        }
    );
    let dropdown = ui.dropdown(DropdownId::ChartMode).unwrap();
    assert_eq!(dropdown.selected, 1);
    assert_eq!(dropdown.header_text(), "Candle");
    assert!(!dropdown.open);
    assert_eq!(ui.active_dropdown(), None);
    assert_eq!(ui.selection().chart_mode, ChartMode::Candle);
}

#[test]
fn timeframe_option_changes_window() {
    let mut ui = machine();
    ui.press(TIMEFRAME_HEADER);
    ui.press(option_point(230.0, 3));
    assert_eq!(ui.selection().timeframe, Timeframe::OneWeek);
    assert_eq!(ui.dropdown(DropdownId::Timeframe).unwrap().header_text(), "1w");
}

#[test]
fn press_outside_open_list_only_dismisses() {
    let mut ui = machine();
    ui.press(MODE_HEADER);

    // Inside the second legend row, outside the open list.
    let legend_hit = Point::new(20.0, 80.0);
    assert!(ui.legend_rows()[1].contains(legend_hit));

    assert_eq!(ui.press(legend_hit), PressOutcome::Dismissed(DropdownId::ChartMode));
    assert_eq!(ui.selection().selected_symbol, Some(0));
    assert_eq!(ui.active_dropdown(), None);

    // With nothing open the same press reaches the legend.
    assert_eq!(ui.press(legend_hit), PressOutcome::SymbolRowSelected(1));
    assert_eq!(ui.selection().selected_symbol, Some(1));
    assert_eq!(ui.dropdown(DropdownId::Symbol).unwrap().header_text(), "ETHUSDT");
}

#[test]
fn opening_another_dropdown_closes_the_first() {
    let mut ui = machine();
    ui.press(SYMBOL_HEADER);
    assert_eq!(ui.press(TIMEFRAME_HEADER), PressOutcome::ToggledDropdown { id: DropdownId::Timeframe, open: true });
    let open: Vec<DropdownId> = ui.dropdowns().iter().filter(|d| d.open).map(|d| d.id).collect();
    assert_eq!(open, vec![DropdownId::Timeframe]);
}

#[test]
fn closed_list_options_are_not_hit() {
    let mut ui = machine();
    // Where the timeframe list would be if it were open; clear of the legend.
    let point = option_point(230.0, 1);
    assert!(ui.legend_rows().iter().all(|row| !row.contains(point)));
    assert_eq!(ui.press(point), PressOutcome::Ignored);
    assert_eq!(ui.selection().timeframe, Timeframe::OneHour);
    assert_eq!(ui.selection().chart_mode, ChartMode::Line);
}

#[test]
fn empty_area_is_ignored() {
    let mut ui = machine();
    let outcome = ui.press(Point::new(700.0, 500.0));
    assert_eq!(outcome, PressOutcome::Ignored);
    assert!(!outcome.is_handled());
}

#[test]
fn stale_symbol_index_is_reset() {
    let layout = DashboardLayout::new(800.0, 600.0, 1.0);
    let selection = SelectionState { selected_symbol: Some(9), ..SelectionState::default() };
    let ui = UiStateMachine::new(&symbols(&["BTCUSDT", "ETHUSDT"]), selection, &layout);
    assert_eq!(ui.selection().selected_symbol, Some(0));
}

#[test]
fn out_of_range_dispatch_is_rejected() {
    let mut ui = machine();
    ui.dispatch(UiCommand::SelectSymbol(7));
    assert_eq!(ui.selection().selected_symbol, Some(0));
}

#[test]
fn relayout_moves_hit_targets_with_scale() {
    let mut ui = machine();
    ui.relayout(&DashboardLayout::new(1600.0, 1200.0, 2.0));
    // Line height doubles with scale: 12*2*1.5 + 10
    assert_eq!(ui.line_height(), 46.0);
    assert!(ui.press(MODE_HEADER).is_handled());
}
