use crate::domain::errors::{FetchError, PersistenceError};
use crate::domain::history::Snapshot;
use crate::domain::market_data::Symbol;
use futures::future::LocalBoxFuture;

/// Source of spot prices. Returns the raw decimal string exactly as the
/// exchange sent it; parsing happens when the value is committed.
pub trait PriceSource {
    fn fetch_price<'a>(&'a self, symbol: &'a Symbol) -> LocalBoxFuture<'a, Result<String, FetchError>>;
}

/// Durable storage for the dashboard snapshot
pub trait SnapshotGateway {
    /// `Ok(None)` means nothing was ever saved.
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// Replace the stored snapshot in full.
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
