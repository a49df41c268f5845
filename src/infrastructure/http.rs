use crate::domain::{
    errors::FetchError,
    logging::{LogComponent, get_logger},
    market_data::{PriceSource, Symbol, parse_price},
};
use futures::future::LocalBoxFuture;
use gloo::net::http::Request;
use serde::Deserialize;

/// `GET /api/v3/ticker/price` payload; only the price is needed
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Spot price lookups against the Binance REST API
#[derive(Debug, Clone)]
pub struct BinancePriceClient {
    base_url: String,
}

impl BinancePriceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub fn price_url(&self, symbol: &Symbol) -> String {
        format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol.value())
    }

    async fn fetch(&self, symbol: &Symbol) -> Result<String, FetchError> {
        let url = self.price_url(symbol);
        crate::log_trace!(LogComponent::Infrastructure("BinancePriceClient"), "GET {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("{e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read body: {e}")))?;

        interpret_price_response(status, &body).inspect_err(|error| {
            get_logger().debug(
                LogComponent::Infrastructure("BinancePriceClient"),
                &format!("{} lookup rejected: {}", symbol, error),
            );
        })
    }
}

impl PriceSource for BinancePriceClient {
    fn fetch_price<'a>(&'a self, symbol: &'a Symbol) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        Box::pin(self.fetch(symbol))
    }
}

/// Turn a raw HTTP status/body into the price string.
///
/// Non-2xx keeps the body verbatim. A 2xx body must be a JSON object with
/// a `price` string that parses as a finite number; the original string
/// is returned so the exchange's precision is preserved.
pub fn interpret_price_response(status: u16, body: &str) -> Result<String, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Protocol { status, body: body.to_string() });
    }
    let ticker: TickerPrice = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    match parse_price(&ticker.price) {
        Some(_) => Ok(ticker.price),
        None => Err(FetchError::Value(ticker.price)),
    }
}
