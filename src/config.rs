use crate::domain::errors::StartupError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Symbol;
use chrono::TimeDelta;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_SYMBOLS: [&str; 5] = ["ETHUSDT", "BTCUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"];
pub const DEFAULT_STORAGE_KEY: &str = "crypto_app_state";
pub const MAX_PRECISION: usize = 8;
/// A history hole longer than this many refresh intervals splits the line
pub const GAP_INTERVALS: u32 = 10;

/// Runtime settings handed to the fetcher, orchestrator and session at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub symbols: Vec<Symbol>,
    pub update_interval: Duration,
    pub request_timeout: Duration,
    pub price_precision: usize,
    pub grid_lines: usize,
    pub storage_key: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| Symbol::from(*s)).collect(),
            update_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            price_precision: 3,
            grid_lines: 6,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.price_precision = precision;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Ten refresh intervals
    pub fn gap_threshold(&self) -> TimeDelta {
        TimeDelta::from_std(self.update_interval * GAP_INTERVALS).unwrap_or_else(|_| TimeDelta::weeks(52))
    }

    pub fn validate(&self) -> Result<(), StartupError> {
        if self.symbols.is_empty() {
            return Err(StartupError::InvalidConfig("symbol list is empty".into()));
        }
        if self.update_interval.is_zero() {
            return Err(StartupError::InvalidConfig("update interval must be positive".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(StartupError::InvalidConfig("request timeout must be positive".into()));
        }
        if self.price_precision > MAX_PRECISION {
            return Err(StartupError::InvalidConfig(format!(
                "price precision {} exceeds {}",
                self.price_precision, MAX_PRECISION
            )));
        }
        if self.base_url.is_empty() {
            return Err(StartupError::InvalidConfig("base url is empty".into()));
        }
        Ok(())
    }

    /// Apply `key=value` overrides (the browser passes URL query parameters).
    /// Unknown keys and unparsable values are logged and ignored.
    pub fn apply_overrides<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (key, value) in pairs {
            let applied = match key {
                "symbols" => {
                    let parsed: Result<Vec<Symbol>, String> =
                        value.split(',').filter(|s| !s.trim().is_empty()).map(Symbol::new).collect();
                    match parsed {
                        Ok(symbols) if !symbols.is_empty() => {
                            self.symbols = symbols;
                            true
                        }
                        _ => false,
                    }
                }
                "interval_ms" => parse_millis(value).map(|d| self.update_interval = d).is_some(),
                "timeout_ms" => parse_millis(value).map(|d| self.request_timeout = d).is_some(),
                "precision" => value
                    .parse::<usize>()
                    .ok()
                    .filter(|p| *p <= MAX_PRECISION)
                    .map(|p| self.price_precision = p)
                    .is_some(),
                "base_url" if value.starts_with("http://") || value.starts_with("https://") => {
                    self = self.with_base_url(value);
                    true
                }
                _ => false,
            };
            if !applied {
                crate::log_warn!(LogComponent::Application("Config"), "ignoring override {}={}", key, value);
            }
        }
        self
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value.parse::<u64>().ok().filter(|ms| *ms > 0).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gap_threshold(), TimeDelta::seconds(10));
    }
}
