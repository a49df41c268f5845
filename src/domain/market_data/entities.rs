use super::value_objects::{PricePoint, Symbol, Trend, parse_price};
use crate::domain::errors::FetchError;
use chrono::{DateTime, Utc};

/// Persistable part of a symbol's state. Transient fields (display text,
/// loading flag, last error) are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub symbol: Symbol,
    pub last_price: Option<String>,
    pub previous_price: Option<String>,
    pub price_history: Vec<PricePoint>,
}

/// Domain entity - everything the dashboard knows about one symbol.
///
/// `history` is append-only within a run and its timestamps never decrease.
/// `last_price`/`previous_price` form a two-slot ring that only moves on a
/// successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    symbol: Symbol,
    last_price: Option<String>,
    previous_price: Option<String>,
    history: Vec<PricePoint>,
    display_text: String,
    last_error: Option<FetchError>,
    loading: bool,
}

impl SymbolSeries {
    /// A symbol that has never been fetched.
    pub fn fresh(symbol: Symbol) -> Self {
        let display_text = loading_text(&symbol);
        Self {
            symbol,
            last_price: None,
            previous_price: None,
            history: Vec::new(),
            display_text,
            last_error: None,
            loading: true,
        }
    }

    /// Rebuild a series from a persisted record. Samples are put back in
    /// time order so the non-decreasing invariant holds from the start.
    pub fn restore(record: SeriesRecord, precision: usize) -> Self {
        let SeriesRecord { symbol, last_price, previous_price, mut price_history } = record;
        price_history.retain(|p| p.price.is_finite());
        price_history.sort_by_key(|p| p.timestamp);

        let last_price = last_price.filter(|p| !p.is_empty());
        let previous_price = previous_price.filter(|p| !p.is_empty());
        let (display_text, loading) = match last_price.as_deref() {
            Some(raw) => match parse_price(raw) {
                Some(price) => (price_text(&symbol, price, precision), false),
                None => (parse_error_text(&symbol), false),
            },
            None => (loading_text(&symbol), true),
        };

        Self {
            symbol,
            last_price,
            previous_price,
            history: price_history,
            display_text,
            last_error: None,
            loading,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn last_price(&self) -> Option<&str> {
        self.last_price.as_deref()
    }

    pub fn previous_price(&self) -> Option<&str> {
        self.previous_price.as_deref()
    }

    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Trend coloring hint; a symbol in error is always neutral.
    pub fn trend(&self) -> Trend {
        if self.last_error.is_some() {
            return Trend::Neutral;
        }
        Trend::between(self.previous_price(), self.last_price())
    }

    pub fn to_record(&self) -> SeriesRecord {
        SeriesRecord {
            symbol: self.symbol.clone(),
            last_price: self.last_price.clone(),
            previous_price: self.previous_price.clone(),
            price_history: self.history.clone(),
        }
    }

    /// Apply a successful lookup. The caller supplies the commit-time clock
    /// reading; it is clamped so history timestamps never go backwards.
    pub(crate) fn record_success(&mut self, raw: String, price: f64, now: DateTime<Utc>, precision: usize) {
        let timestamp = match self.history.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.loading = false;
        self.previous_price = self.last_price.take();
        self.last_price = Some(raw);
        self.last_error = None;
        self.display_text = price_text(&self.symbol, price, precision);
        self.history.push(PricePoint::new(price, timestamp));
    }

    /// Apply a failed lookup. History and the price ring stay untouched.
    pub(crate) fn record_failure(&mut self, error: FetchError) {
        self.loading = false;
        self.display_text = match error {
            FetchError::Value(_) => parse_error_text(&self.symbol),
            _ => error_text(&self.symbol),
        };
        self.last_error = Some(error);
    }
}

pub fn price_text(symbol: &Symbol, price: f64, precision: usize) -> String {
    format!("{}: {:.*}", symbol, precision, price)
}

pub fn loading_text(symbol: &Symbol) -> String {
    format!("{symbol}: Loading...")
}

pub fn error_text(symbol: &Symbol) -> String {
    format!("{symbol}: Error")
}

pub fn parse_error_text(symbol: &Symbol) -> String {
    format!("{symbol}: Parse Error")
}
