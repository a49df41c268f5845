mod support;

use chrono::TimeDelta;
use price_dashboard_wasm::application::{DashboardSession, status_message};
use price_dashboard_wasm::config::DashboardConfig;
use price_dashboard_wasm::domain::chart::{ChartMode, ChartShape, Color, Point};
use price_dashboard_wasm::domain::errors::{AppError, PersistenceError, StartupError};
use price_dashboard_wasm::domain::history::Snapshot;
use price_dashboard_wasm::domain::market_data::{PricePoint, SeriesRecord, SnapshotGateway, Symbol, Timeframe};
use price_dashboard_wasm::domain::selection::SelectionState;
use price_dashboard_wasm::infrastructure::{InMemoryGateway, decode_snapshot};
use price_dashboard_wasm::ui::{DashboardLayout, PressOutcome, TextMeasure};
use std::rc::Rc;
use std::sync::Arc;
use support::{ManualClock, symbols, t0};

fn config() -> DashboardConfig {
    DashboardConfig::default().with_symbols(symbols(&["BTCUSDT", "ETHUSDT"]))
}

/// Every label measures the same width, whatever its text
struct FixedWidth(f64);

impl TextMeasure for FixedWidth {
    fn text_width(&self, _layout: &DashboardLayout, _text: &str) -> f64 {
        self.0
    }
}

fn session_with(gateway: Rc<InMemoryGateway>) -> DashboardSession {
    DashboardSession::bootstrap(config(), gateway, DashboardLayout::default()).expect("valid config")
}

#[test]
fn fresh_start_shows_loading_rows() {
    let session = session_with(Rc::new(InMemoryGateway::new()));
    assert!(session.load_error().is_none());

    let frame = session.frame();
    let legend: Vec<&str> = frame.legend.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(legend, vec!["BTCUSDT: Loading...", "ETHUSDT: Loading..."]);
    assert!(frame.legend[0].selected);
    assert!(frame.readout.is_none());
    assert_eq!(frame.title.unwrap().text, "BTCUSDT Line Chart (1h)");
    assert_eq!(frame.chart.shape, ChartShape::NoData);
}

#[test]
fn restore_follows_configured_symbols() {
    let saved = Snapshot {
        series: vec![
            SeriesRecord {
                symbol: Symbol::from("DOGEUSDT"),
                last_price: Some("0.1".into()),
                previous_price: None,
                price_history: vec![PricePoint::new(0.1, t0())],
            },
            SeriesRecord {
                symbol: Symbol::from("BTCUSDT"),
                last_price: Some("64000.5".into()),
                previous_price: Some("64000.0".into()),
                price_history: vec![PricePoint::new(64000.0, t0()), PricePoint::new(64000.5, t0())],
            },
        ],
        selection: Some(SelectionState {
            selected_symbol: Some(0),
            chart_mode: ChartMode::Candle,
            timeframe: Timeframe::OneDay,
        }),
    };
    let gateway = Rc::new(InMemoryGateway::new());
    gateway.save(&saved).unwrap();

    let session = session_with(gateway);

    assert_eq!(session.store().symbols(), symbols(&["BTCUSDT", "ETHUSDT"]));
    let btc = session.store().series(&Symbol::from("BTCUSDT")).unwrap();
    assert_eq!(btc.history().len(), 2);
    assert_eq!(btc.display_text(), "BTCUSDT: 64000.500");
    assert!(session.store().series(&Symbol::from("ETHUSDT")).unwrap().is_loading());
    assert_eq!(session.selection().chart_mode, ChartMode::Candle);

    let frame = session.frame();
    assert_eq!(frame.title.unwrap().text, "BTCUSDT Candle Chart (1d)");
    let readout = frame.readout.unwrap();
    assert_eq!(readout.text, "BTCUSDT: 64000.5");
    assert_eq!(readout.color, Color::UP);
}

#[test]
fn unreadable_state_starts_fresh() {
    let session = session_with(Rc::new(InMemoryGateway::with_document("[1, 2")));
    assert!(matches!(session.load_error(), Some(PersistenceError::Codec(_))));
    assert!(session.store().read(|series| series.iter().all(|s| s.is_loading() && s.history().is_empty())));
    assert_eq!(session.selection().selected_symbol, Some(0));
}

#[test]
fn invalid_config_fails_bootstrap() {
    let result = DashboardSession::bootstrap(
        DashboardConfig::default().with_symbols(Vec::new()),
        Rc::new(InMemoryGateway::new()),
        DashboardLayout::default(),
    );
    assert!(matches!(result, Err(StartupError::InvalidConfig(_))));
}

#[test]
fn legend_press_switches_the_chart() {
    let mut session = session_with(Rc::new(InMemoryGateway::new()));

    assert_eq!(session.press(Point::new(20.0, 80.0)), PressOutcome::SymbolRowSelected(1));

    let frame = session.frame();
    assert!(frame.legend[1].selected);
    assert_eq!(frame.title.unwrap().text, "ETHUSDT Line Chart (1h)");
}

#[test]
fn legend_hit_boxes_follow_measured_text() {
    let mut session = session_with(Rc::new(InMemoryGateway::new())).with_text_measure(Rc::new(FixedWidth(40.0)));

    assert_eq!(session.frame().legend[1].bounds.width, 40.0);
    assert_eq!(session.press(Point::new(60.0, 80.0)), PressOutcome::Ignored);
    assert!(session.frame().legend[0].selected);
    assert_eq!(session.press(Point::new(30.0, 80.0)), PressOutcome::SymbolRowSelected(1));
}

#[test]
fn startup_status_marks_recoverable_errors() {
    let fatal = AppError::from(StartupError::ContextUnavailable("2d".into()));
    assert_eq!(status_message(&fatal), "Startup Error: 2D rendering context unavailable: 2d");

    let load = AppError::from(PersistenceError::Codec("eof".into()));
    assert_eq!(status_message(&load), "Persistence Error: failed to decode state data: eof; started fresh");
}

#[test]
fn open_dropdown_is_drawn_with_its_options() {
    let mut session = session_with(Rc::new(InMemoryGateway::new()));
    session.press(Point::new(140.0, 20.0));

    let frame = session.frame();
    let mode = &frame.dropdowns[1];
    assert!(mode.open);
    assert_eq!(mode.header, "Line ▲");
    let options: Vec<(&str, bool)> = mode.options.iter().map(|o| (o.text.as_str(), o.selected)).collect();
    assert_eq!(options, vec![("Line", true), ("Candle", false)]);
    assert!(frame.dropdowns[0].options.is_empty());
}

#[test]
fn flush_persists_history_and_selection() {
    let gateway = Rc::new(InMemoryGateway::new());
    let mut session = session_with(gateway.clone());
    session.store().commit(&Symbol::from("ETHUSDT"), Ok("3000.25".into()));
    session.press(Point::new(140.0, 20.0));
    session.press(Point::new(140.0, 33.0 + 23.0 + 10.0));

    session.flush().unwrap();

    let saved = decode_snapshot(&gateway.document().unwrap()).unwrap();
    assert_eq!(saved.selection.map(|s| s.chart_mode), Some(ChartMode::Candle));
    let eth = saved.record(&Symbol::from("ETHUSDT")).unwrap();
    assert_eq!(eth.last_price.as_deref(), Some("3000.25"));
    assert_eq!(eth.price_history.len(), 1);
}

#[test]
fn timeframe_limits_the_plotted_history() {
    let clock = Arc::new(ManualClock::at(t0()));
    let session = session_with(Rc::new(InMemoryGateway::new())).with_clock(clock.clone());
    let btc = Symbol::from("BTCUSDT");

    session.store().commit(&btc, Ok("1".into()));
    clock.advance(TimeDelta::hours(2));
    session.store().commit(&btc, Ok("2".into()));
    clock.advance(TimeDelta::seconds(1));
    session.store().commit(&btc, Ok("3".into()));

    assert_eq!(session.frame().chart.point_count, 2);
}

#[test]
fn resize_moves_the_chart_region() {
    let mut session = session_with(Rc::new(InMemoryGateway::new()));
    session.resize(1200.0, 900.0, 1.0);
    let region = session.frame().chart_region;
    assert_eq!((region.x, region.y, region.width, region.height), (180.0, 38.0, 1020.0, 862.0));
}
