use super::clock::{Clock, SystemClock};
use super::snapshot::Snapshot;
use crate::domain::errors::FetchError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Symbol, SymbolSeries, parse_price};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of applying one fetch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Appended { len: usize },
    Failed,
    UnknownSymbol,
}

struct StoreState {
    series: Vec<SymbolSeries>,
    revision: u64,
}

/// Shared owner of every symbol's series.
///
/// All symbols live behind one mutex. A commit holds it only for the one
/// symbol it mutates, so a reader running between two commits of the same
/// refresh cycle sees some symbols on the new tick and others on the old one.
/// `read` holds the lock for the whole closure, which is what the render pass
/// uses to get a frame that is internally consistent.
#[derive(Clone)]
pub struct HistoryStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
    precision: usize,
}

impl HistoryStore {
    pub fn new(symbols: &[Symbol], precision: usize) -> Self {
        let series = symbols.iter().cloned().map(SymbolSeries::fresh).collect();
        Self::from_series(series, precision)
    }

    pub fn from_series(series: Vec<SymbolSeries>, precision: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState { series, revision: 0 })),
            clock: Arc::new(SystemClock),
            precision,
        }
    }

    /// Build the store for `symbols`, taking matching series from a loaded
    /// snapshot. Configured symbols the snapshot lacks start fresh; snapshot
    /// entries for symbols no longer configured are dropped.
    pub fn restore(symbols: &[Symbol], snapshot: Option<&Snapshot>, precision: usize) -> Self {
        let series = symbols
            .iter()
            .map(|symbol| match snapshot.and_then(|s| s.record(symbol)) {
                Some(record) => SymbolSeries::restore(record.clone(), precision),
                None => SymbolSeries::fresh(symbol.clone()),
            })
            .collect();
        Self::from_series(series, precision)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Series are replaced whole, never left half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one fetch outcome to one symbol.
    ///
    /// A success whose payload is not a finite number is recorded as a
    /// `FetchError::Value` failure.
    pub fn commit(&self, symbol: &Symbol, outcome: Result<String, FetchError>) -> CommitOutcome {
        let mut state = self.lock();
        let now = self.clock.now();
        let precision = self.precision;
        let Some(series) = state.series.iter_mut().find(|s| s.symbol() == symbol) else {
            crate::log_warn!(LogComponent::Domain("HistoryStore"), "commit for unknown symbol {} ignored", symbol);
            return CommitOutcome::UnknownSymbol;
        };

        let result = match outcome.and_then(|raw| match parse_price(&raw) {
            Some(price) => Ok((raw, price)),
            None => Err(FetchError::Value(raw)),
        }) {
            Ok((raw, price)) => {
                series.record_success(raw, price, now, precision);
                CommitOutcome::Appended { len: series.history().len() }
            }
            Err(error) => {
                series.record_failure(error);
                CommitOutcome::Failed
            }
        };
        state.revision += 1;
        result
    }

    /// Copy of the persistable state of every symbol, in configured order
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            series: state.series.iter().map(SymbolSeries::to_record).collect(),
            selection: None,
        }
    }

    /// Run `f` over all series with the store lock held for its duration.
    pub fn read<R>(&self, f: impl FnOnce(&[SymbolSeries]) -> R) -> R {
        let state = self.lock();
        f(&state.series)
    }

    pub fn series(&self, symbol: &Symbol) -> Option<SymbolSeries> {
        self.read(|all| all.iter().find(|s| s.symbol() == symbol).cloned())
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.read(|all| all.iter().map(|s| s.symbol().clone()).collect())
    }

    /// Number of commits applied since construction
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("symbols", &self.symbols())
            .field("precision", &self.precision)
            .finish()
    }
}
