use crate::domain::{
    errors::FetchError,
    history::{Clock, CommitOutcome, HistoryStore, SystemClock},
    logging::{LogComponent, get_logger},
    market_data::{PriceSource, Symbol},
};
use futures::future::{Either, LocalBoxFuture, join_all, select};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Async sleep, supplied by the host (gloo timers in the browser)
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// Summary of one completed refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn status_line(&self) -> String {
        format!(
            "updated {}/{} symbols in {}ms",
            self.succeeded,
            self.succeeded + self.failed,
            self.elapsed.as_millis()
        )
    }
}

/// When the next tick fires relative to the start of the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDecision {
    pub delay: Duration,
    /// Ticks that fell inside an overrunning cycle and are dropped, not queued
    pub skipped: u32,
}

/// Fixed-rate tick grid anchored at each cycle start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickScheduler {
    interval: Duration,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The next tick is the first grid point at or after `elapsed`; grid
    /// points already passed are skipped.
    pub fn next_tick(&self, elapsed: Duration) -> TickDecision {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return TickDecision { delay: Duration::ZERO, skipped: 0 };
        }
        let elapsed_ns = elapsed.as_nanos();
        let ticks = elapsed_ns.div_ceil(interval).max(1);
        let delay_ns = ticks * interval - elapsed_ns;
        TickDecision {
            delay: Duration::from_nanos(u64::try_from(delay_ns).unwrap_or(u64::MAX)),
            skipped: u32::try_from(ticks - 1).unwrap_or(u32::MAX),
        }
    }
}

type CommitListener = Rc<dyn Fn(&Symbol, CommitOutcome)>;
type CycleListener = Rc<dyn Fn(&CycleReport)>;

/// Drives the periodic fan-out of price fetches into the history store.
///
/// Each cycle launches one fetch per symbol, commits every result as soon
/// as it arrives and only finishes once all of them have completed or timed
/// out. At most one cycle runs at a time.
pub struct RefreshOrchestrator {
    source: Rc<dyn PriceSource>,
    timer: Rc<dyn Timer>,
    store: HistoryStore,
    clock: Arc<dyn Clock>,
    scheduler: TickScheduler,
    request_timeout: Duration,
    state: Cell<RefreshState>,
    stopped: Cell<bool>,
    on_commit: Option<CommitListener>,
    on_cycle: Option<CycleListener>,
}

impl RefreshOrchestrator {
    pub fn new(
        source: Rc<dyn PriceSource>,
        timer: Rc<dyn Timer>,
        store: HistoryStore,
        update_interval: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            source,
            timer,
            store,
            clock: Arc::new(SystemClock),
            scheduler: TickScheduler::new(update_interval),
            request_timeout,
            state: Cell::new(RefreshState::Idle),
            stopped: Cell::new(false),
            on_commit: None,
            on_cycle: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Called after every individual commit, e.g. to schedule a redraw.
    pub fn with_commit_listener(mut self, listener: impl Fn(&Symbol, CommitOutcome) + 'static) -> Self {
        self.on_commit = Some(Rc::new(listener));
        self
    }

    pub fn with_cycle_listener(mut self, listener: impl Fn(&CycleReport) + 'static) -> Self {
        self.on_cycle = Some(Rc::new(listener));
        self
    }

    pub fn state(&self) -> RefreshState {
        self.state.get()
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Ask `run_forever` to return after the current cycle
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    async fn fetch_with_timeout(&self, symbol: &Symbol) -> Result<String, FetchError> {
        let fetch = self.source.fetch_price(symbol);
        let deadline = self.timer.sleep(self.request_timeout);
        match select(fetch, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _abandoned)) => Err(FetchError::timeout(self.request_timeout.as_millis())),
        }
    }

    async fn refresh_symbol(&self, symbol: Symbol) -> CommitOutcome {
        let outcome = self.fetch_with_timeout(&symbol).await;
        if let Err(error) = &outcome {
            get_logger().warn(
                LogComponent::Application("Refresh"),
                &format!("{} fetch failed ({}): {}", symbol, error.kind(), error),
            );
        }
        let committed = self.store.commit(&symbol, outcome);
        crate::log_debug!(LogComponent::Application("Refresh"), "{} committed: {:?}", symbol, committed);
        if let Some(listener) = &self.on_commit {
            listener(&symbol, committed);
        }
        committed
    }

    /// Run one refresh cycle. Returns `None` without doing anything when a
    /// cycle is already in flight.
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        if self.state.get() == RefreshState::Refreshing {
            return None;
        }
        self.state.set(RefreshState::Refreshing);
        let started = self.clock.now();

        let outcomes = join_all(self.store.symbols().into_iter().map(|symbol| self.refresh_symbol(symbol))).await;

        let succeeded = outcomes.iter().filter(|o| matches!(o, CommitOutcome::Appended { .. })).count();
        let report = CycleReport {
            succeeded,
            failed: outcomes.len() - succeeded,
            elapsed: (self.clock.now() - started).to_std().unwrap_or_default(),
        };
        self.state.set(RefreshState::Idle);

        if let Some(listener) = &self.on_cycle {
            listener(&report);
        }
        Some(report)
    }

    /// Tick forever at the configured interval, starting immediately.
    pub async fn run_forever(&self) {
        get_logger().info(
            LogComponent::Application("Refresh"),
            &format!("refresh loop started, interval {}ms", self.scheduler.interval().as_millis()),
        );
        while !self.stopped.get() {
            let started = self.clock.now();
            if let Some(report) = self.run_cycle().await {
                crate::log_debug!(LogComponent::Application("Refresh"), "{}", report.status_line());
            }
            let elapsed = (self.clock.now() - started).to_std().unwrap_or_default();
            let decision = self.scheduler.next_tick(elapsed);
            if decision.skipped > 0 {
                get_logger().warn(
                    LogComponent::Application("Refresh"),
                    &format!("cycle overran by {} tick(s), skipping ahead", decision.skipped),
                );
            }
            if self.stopped.get() {
                break;
            }
            self.timer.sleep(decision.delay).await;
        }
        get_logger().info(LogComponent::Application("Refresh"), "refresh loop stopped");
    }
}
