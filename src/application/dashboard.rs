use super::render_frame::{FrameModel, legend_bounds};
use crate::config::DashboardConfig;
use crate::domain::{
    chart::{ChartProjector, Point},
    errors::{AppError, PersistenceError, StartupError},
    history::{Clock, HistoryStore, Snapshot},
    logging::{LogComponent, LogLevel, get_logger},
    market_data::SnapshotGateway,
    selection::SelectionState,
};
use crate::ui::{DashboardLayout, GlyphEstimate, PressOutcome, TextMeasure, UiStateMachine};
use std::rc::Rc;
use std::sync::Arc;

/// Status line text for `error`. Fatal errors stand alone; anything else
/// means the dashboard carried on without the failed piece.
pub fn status_message(error: &AppError) -> String {
    if error.is_fatal() { error.to_string() } else { format!("{error}; started fresh") }
}

/// One running dashboard: the store, the interaction state, the current
/// layout and the durable record behind them.
pub struct DashboardSession {
    config: DashboardConfig,
    store: HistoryStore,
    ui: UiStateMachine,
    layout: DashboardLayout,
    projector: ChartProjector,
    gateway: Rc<dyn SnapshotGateway>,
    measure: Rc<dyn TextMeasure>,
    load_error: Option<PersistenceError>,
}

impl DashboardSession {
    /// Validate the config and restore whatever the gateway holds.
    ///
    /// A snapshot that cannot be read is reported through `load_error` and
    /// every symbol starts fresh; only an invalid config fails.
    pub fn bootstrap(
        config: DashboardConfig,
        gateway: Rc<dyn SnapshotGateway>,
        layout: DashboardLayout,
    ) -> Result<Self, StartupError> {
        config.validate()?;

        let (snapshot, load_error) = match gateway.load() {
            Ok(snapshot) => (snapshot, None),
            Err(error) => {
                get_logger().log_with_metadata(
                    LogLevel::Error,
                    LogComponent::Application("Dashboard"),
                    &format!("{error}; starting with fresh state"),
                    &format!("{{\"storage_key\":\"{}\"}}", config.storage_key),
                );
                (None, Some(error))
            }
        };
        if snapshot.is_none() && load_error.is_none() {
            get_logger().info(LogComponent::Application("Dashboard"), "no saved state, starting fresh");
        }

        let store = HistoryStore::restore(&config.symbols, snapshot.as_ref(), config.price_precision);
        let selection = snapshot.and_then(|s| s.selection).unwrap_or_default();
        let ui = UiStateMachine::new(&config.symbols, selection, &layout);
        let projector = ChartProjector::new(config.grid_lines, config.gap_threshold());

        Ok(Self { config, store, ui, layout, projector, gateway, measure: Rc::new(GlyphEstimate), load_error })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.store = self.store.with_clock(clock);
        self
    }

    /// Size legend hit boxes and the readout with `measure` instead of the
    /// glyph estimate.
    pub fn with_text_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Handle shared with the refresh orchestrator
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn ui(&self) -> &UiStateMachine {
        &self.ui
    }

    pub fn layout(&self) -> DashboardLayout {
        self.layout
    }

    pub fn selection(&self) -> SelectionState {
        self.ui.selection()
    }

    pub fn load_error(&self) -> Option<&PersistenceError> {
        self.load_error.as_ref()
    }

    pub fn resize(&mut self, width: f64, height: f64, scale: f64) {
        self.layout = DashboardLayout::new(width, height, scale);
        self.ui.relayout(&self.layout);
    }

    /// Route a pointer press given in canvas pixels.
    pub fn press(&mut self, point: Point) -> PressOutcome {
        let rows = self.store.read(|series| legend_bounds(series, &self.layout, self.measure.as_ref()));
        self.ui.set_legend_rows(rows);

        let outcome = self.ui.press(point);
        crate::log_debug!(LogComponent::Application("Dashboard"), "press at ({:.0}, {:.0}): {:?}", point.x, point.y, outcome);
        outcome
    }

    pub fn frame(&self) -> FrameModel {
        self.render_with(FrameModel::clone)
    }

    /// Build a frame and hand it to `draw` with the store lock held throughout.
    pub fn render_with<R>(&self, draw: impl FnOnce(&FrameModel) -> R) -> R {
        self.store.read(|series| {
            let frame = FrameModel::build(series, &self.ui, &self.layout, &self.projector, self.measure.as_ref());
            draw(&frame)
        })
    }

    /// Persistable state including the current selection
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot().with_selection(self.ui.selection())
    }

    /// Write the snapshot through the gateway.
    pub fn flush(&self) -> Result<(), PersistenceError> {
        self.gateway.save(&self.snapshot()).inspect_err(|error| {
            get_logger().error(LogComponent::Application("Dashboard"), &error.to_string());
        })
    }
}
