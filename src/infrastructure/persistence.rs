use crate::domain::{
    errors::PersistenceError,
    history::Snapshot,
    logging::{LogComponent, get_logger},
    market_data::{PricePoint, SeriesRecord, SnapshotGateway, Symbol},
    selection::SelectionState,
};
use gloo::storage::{LocalStorage, Storage, errors::StorageError};
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;

/// On-disk document. Field names are the stable wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub coin_data: Vec<PersistedCoin>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_selection")]
    pub selection: Option<SelectionState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCoin {
    pub symbol: String,
    #[serde(default)]
    pub last_price: String,
    #[serde(default)]
    pub previous_price: String,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

/// A selection object that does not parse is treated as absent rather than
/// failing the whole document.
fn lenient_selection<'de, D>(deserializer: D) -> Result<Option<SelectionState>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl From<&Snapshot> for PersistedState {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            coin_data: snapshot
                .series
                .iter()
                .map(|record| PersistedCoin {
                    symbol: record.symbol.to_string(),
                    last_price: record.last_price.clone().unwrap_or_default(),
                    previous_price: record.previous_price.clone().unwrap_or_default(),
                    price_history: record.price_history.clone(),
                })
                .collect(),
            selection: snapshot.selection,
        }
    }
}

impl From<PersistedState> for Snapshot {
    /// Entries whose symbol is not a valid ticker are dropped.
    fn from(state: PersistedState) -> Self {
        let series = state
            .coin_data
            .into_iter()
            .filter_map(|coin| match Symbol::new(&coin.symbol) {
                Ok(symbol) => Some(SeriesRecord {
                    symbol,
                    last_price: Some(coin.last_price).filter(|p| !p.is_empty()),
                    previous_price: Some(coin.previous_price).filter(|p| !p.is_empty()),
                    price_history: coin.price_history,
                }),
                Err(reason) => {
                    crate::log_warn!(LogComponent::Infrastructure("Persistence"), "dropping stored entry: {}", reason);
                    None
                }
            })
            .collect();
        Snapshot { series, selection: state.selection }
    }
}

pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(&PersistedState::from(snapshot)).map_err(|e| PersistenceError::Codec(e.to_string()))
}

pub fn decode_snapshot(document: &str) -> Result<Snapshot, PersistenceError> {
    serde_json::from_str::<PersistedState>(document)
        .map(Snapshot::from)
        .map_err(|e| PersistenceError::Codec(e.to_string()))
}

/// Snapshot stored under one `localStorage` key
#[derive(Debug, Clone)]
pub struct LocalStorageGateway {
    key: String,
}

impl LocalStorageGateway {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SnapshotGateway for LocalStorageGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match LocalStorage::get::<PersistedState>(&self.key) {
            Ok(state) => {
                let snapshot = Snapshot::from(state);
                get_logger().info(
                    LogComponent::Infrastructure("Persistence"),
                    &format!("loaded {} series from '{}'", snapshot.series.len(), self.key),
                );
                Ok(Some(snapshot))
            }
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(PersistenceError::Codec(e.to_string())),
            Err(e) => Err(PersistenceError::Load(e.to_string())),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        LocalStorage::set(&self.key, PersistedState::from(snapshot)).map_err(|e| PersistenceError::Save(e.to_string()))?;
        get_logger().info(
            LogComponent::Infrastructure("Persistence"),
            &format!("saved {} series to '{}'", snapshot.series.len(), self.key),
        );
        Ok(())
    }
}

/// Keeps the encoded document in memory. Used by native tests and as a
/// fallback when browser storage is unavailable.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    document: RefCell<Option<String>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self { document: RefCell::new(Some(document.into())) }
    }

    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl SnapshotGateway for InMemoryGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        self.document.borrow().as_deref().map(decode_snapshot).transpose()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let document = encode_snapshot(snapshot)?;
        self.document.replace(Some(document));
        Ok(())
    }
}
