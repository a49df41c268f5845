use chrono::{DateTime, TimeDelta, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Value Object - trading symbol as the exchange spells it (upper case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("Symbol must be alphanumeric: {trimmed}"));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// One committed price sample. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }
}

/// Parse a raw exchange price string, rejecting anything that is not a
/// finite decimal number.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Direction of the latest move, derived from the last/previous price pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    /// Neutral whenever either side is missing or does not parse.
    pub fn between(previous: Option<&str>, last: Option<&str>) -> Self {
        let (Some(prev), Some(last)) = (previous.and_then(parse_price), last.and_then(parse_price)) else {
            return Trend::Neutral;
        };
        if last > prev {
            Trend::Up
        } else if last < prev {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }
}

/// Value Object - chart timeframe selectable in the top bar
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum Timeframe {
    #[default]
    #[display(fmt = "1h")]
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[display(fmt = "4h")]
    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[display(fmt = "1d")]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,

    #[display(fmt = "1w")]
    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timeframe {
    pub fn all() -> Vec<Timeframe> {
        Timeframe::iter().collect()
    }

    pub fn index(&self) -> usize {
        Timeframe::iter().position(|tf| tf == *self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Timeframe> {
        Timeframe::iter().nth(index)
    }

    pub fn span(&self) -> TimeDelta {
        match self {
            Self::OneHour => TimeDelta::hours(1),
            Self::FourHours => TimeDelta::hours(4),
            Self::OneDay => TimeDelta::days(1),
            Self::OneWeek => TimeDelta::weeks(1),
        }
    }

    /// Suffix of an ordered history whose samples fall within this span of
    /// the newest sample.
    pub fn window<'a>(&self, history: &'a [PricePoint]) -> &'a [PricePoint] {
        let Some(newest) = history.last() else {
            return history;
        };
        let cutoff = newest.timestamp - self.span();
        let start = history.partition_point(|p| p.timestamp < cutoff);
        &history[start..]
    }
}
