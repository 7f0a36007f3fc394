use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::AppError,
    prices::model::{PriceList, UpstreamPayload},
};

#[derive(Clone)]
pub struct PricesService {
    client: Client,
    base_url: Arc<str>,
}

impl PricesService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_timeout(&config.price_api_url, config.price_api_timeout)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches `{base}/prices` once and normalizes whichever shape comes back.
    pub async fn fetch_prices(&self) -> Result<PriceList, AppError> {
        if self.base_url.is_empty() {
            return Err(AppError::UpstreamError("missing base URL".into()));
        }

        let url = format!("{}/prices", self.base_url);
        debug!(%url, "fetching upstream prices");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "upstream request failed");
            AppError::from(e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, %status, "upstream returned non-OK status");
            return Err(AppError::UpstreamError(format!(
                "failed to fetch prices: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let prices = decode_prices(&body)?;

        debug!(count = prices.prices.len(), "decoded upstream prices");
        Ok(prices)
    }

    /// Looks up one symbol, ignoring case and surrounding whitespace.
    pub async fn get_price(&self, symbol: &str) -> Result<f64, AppError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::ValidationError("missing price id".into()));
        }
        let symbol = symbol.to_uppercase();

        let prices = self.fetch_prices().await?;

        prices
            .find(&symbol)
            .map(|entry| entry.price)
            .ok_or_else(|| AppError::NotFoundError(format!("price for symbol {} not found", symbol)))
    }
}

/// Shape A (`{"prices":[...]}`) first, then shape B (`{"BTC": 1.0}`).
pub fn decode_prices(body: &[u8]) -> Result<PriceList, AppError> {
    serde_json::from_slice::<UpstreamPayload>(body)
        .map(PriceList::from)
        .map_err(|e| {
            warn!(error = %e, "upstream body matched no known price shape");
            AppError::DecodeError("upstream body matched no known price shape".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::model::PriceEntry;

    fn entry(symbol: &str, price: f64) -> PriceEntry {
        PriceEntry {
            symbol: symbol.into(),
            price,
        }
    }

    #[test]
    fn decodes_listed_shape_in_upstream_order() {
        let body = br#"{"prices":[{"symbol":"eth","price":3100.5},{"symbol":"BTC","price":64000.0}]}"#;

        let list = decode_prices(body).unwrap();

        assert_eq!(list.prices, vec![entry("eth", 3100.5), entry("BTC", 64000.0)]);
    }

    #[test]
    fn listed_shape_ignores_unknown_fields() {
        let body = br#"{"source":"x","prices":[{"symbol":"SOL","price":150.0}]}"#;

        let list = decode_prices(body).unwrap();

        assert_eq!(list.prices, vec![entry("SOL", 150.0)]);
    }

    #[test]
    fn empty_listed_shape_is_an_empty_list() {
        let list = decode_prices(br#"{"prices":[]}"#).unwrap();
        assert!(list.prices.is_empty());
    }

    #[test]
    fn falls_back_to_flat_map() {
        let body = br#"{"BTC":123.45,"ETH":2.5,"DOGE":0.1}"#;

        let mut list = decode_prices(body).unwrap();
        list.prices.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        assert_eq!(
            list.prices,
            vec![entry("BTC", 123.45), entry("DOGE", 0.1), entry("ETH", 2.5)]
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        let bodies: [&[u8]; 4] = [
            b"not json",
            br#"[1,2,3]"#,
            br#"{"prices":null}"#,
            br#"{"BTC":"expensive"}"#,
        ];

        for body in bodies {
            assert!(matches!(decode_prices(body), Err(AppError::DecodeError(_))));
        }
    }

    #[test]
    fn find_ignores_case() {
        let list = PriceList {
            prices: vec![entry("btc", 1.0), entry("ETH", 2.0)],
        };

        assert_eq!(list.find("BTC").map(|e| e.price), Some(1.0));
        assert_eq!(list.find("eth").map(|e| e.price), Some(2.0));
        assert!(list.find("SOL").is_none());
    }

    #[test]
    fn find_ignores_case_for_non_ascii_symbols() {
        let list = PriceList {
            prices: vec![entry("é", 1.0), entry("ß", 2.0)],
        };

        assert_eq!(list.find("é").map(|e| e.price), Some(1.0));
        assert_eq!(list.find("É").map(|e| e.price), Some(1.0));
        assert_eq!(list.find("ß").map(|e| e.price), Some(2.0));
        assert_eq!(list.find("SS").map(|e| e.price), Some(2.0));
    }

    #[test]
    fn listed_entry_without_price_reads_as_zero() {
        let body = br#"{"prices":[{"symbol":"BTC"},{"symbol":"ETH","price":null}]}"#;

        let list = decode_prices(body).unwrap();

        assert_eq!(list.prices, vec![entry("BTC", 0.0), entry("ETH", 0.0)]);
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let service = PricesService::with_client("http://upstream:8081/", Client::new());
        assert_eq!(service.base_url(), "http://upstream:8081");
    }

    #[tokio::test]
    async fn blank_symbol_is_a_validation_error() {
        let service = PricesService::with_client("http://127.0.0.1:9", Client::new());

        let result = service.get_price("   ").await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn missing_base_url_is_an_upstream_error() {
        let service = PricesService::with_client("", Client::new());

        let result = service.fetch_prices().await;

        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }
}
