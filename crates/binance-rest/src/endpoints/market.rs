//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::endpoints::decode_response;
use crate::error::RestResult;
use crate::history::{resolve_range, save_history_csv, WindowPlan};
use crate::types::{
    BookLevel, BookTicker, Candle, ExchangeInfo, OrderBook, PriceTicker, ServerTime, Stats24hr,
};

/// Order book depth returned when no limit is given
const DEFAULT_DEPTH_LIMIT: u16 = 50;

/// Per-request candle cap on the klines endpoint
pub const MAX_KLINES_LIMIT: u32 = 500;

/// Fixed pause between paginated history requests, to stay inside the
/// exchange's request-weight limits
const HISTORY_REQUEST_PAUSE: Duration = Duration::from_secs(1);

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    client: &'a Client,
    base_url: &'a str,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(client: &'a Client, base_url: &'a str) -> Self {
        Self { client, base_url }
    }

    /// Test connectivity to the REST API
    #[instrument(skip(self))]
    pub async fn ping(&self) -> RestResult<()> {
        let url = format!("{}/api/v3/ping", self.base_url);
        debug!("Pinging server");

        let response = self.client.get(&url).send().await?;
        let _: serde_json::Value = decode_response(response).await?;
        Ok(())
    }

    /// Get server time
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> RestResult<ServerTime> {
        let url = format!("{}/api/v3/time", self.base_url);
        debug!("Fetching server time");

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get exchange information (trading rules and symbol list)
    #[instrument(skip(self))]
    pub async fn get_exchange_info(&self) -> RestResult<ExchangeInfo> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        debug!("Fetching exchange info");

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get the lexicographically sorted list of listed symbol names
    #[instrument(skip(self))]
    pub async fn get_symbols(&self) -> RestResult<Vec<String>> {
        let info = self.get_exchange_info().await?;
        Ok(info.symbol_names())
    }

    /// Get the order book for a symbol
    ///
    /// # Arguments
    /// * `symbol` - Symbol name (e.g. "BTCUSDT")
    /// * `limit` - Number of price levels per side (default 50)
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, symbol: &str, limit: Option<u16>) -> RestResult<OrderBook> {
        let limit = limit.unwrap_or(DEFAULT_DEPTH_LIMIT);
        let url = format!(
            "{}/api/v3/depth?symbol={}&limit={}",
            self.base_url, symbol, limit
        );
        debug!("Fetching order book for {}", symbol);

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get the bid side of the order book as (price, quantity) pairs
    #[instrument(skip(self))]
    pub async fn get_bids(&self, symbol: &str, limit: Option<u16>) -> RestResult<Vec<BookLevel>> {
        let book = self.get_order_book(symbol, limit).await?;
        Ok(book.bids)
    }

    /// Get the ask side of the order book as (price, quantity) pairs
    #[instrument(skip(self))]
    pub async fn get_asks(&self, symbol: &str, limit: Option<u16>) -> RestResult<Vec<BookLevel>> {
        let book = self.get_order_book(symbol, limit).await?;
        Ok(book.asks)
    }

    /// Fetch one page of klines (candlestick data)
    ///
    /// # Arguments
    /// * `symbol` - Symbol name
    /// * `interval` - Candle interval (e.g. "1m", "1h", "1d")
    /// * `start_time` - Range start, UNIX milliseconds (optional)
    /// * `end_time` - Range end, UNIX milliseconds (optional)
    /// * `limit` - Number of candles (max 500)
    #[instrument(skip(self))]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_time: Option<i64>,
        end_time: Option<i64>,
        limit: Option<u32>,
    ) -> RestResult<Vec<Candle>> {
        let mut url = format!(
            "{}/api/v3/klines?symbol={}&interval={}",
            self.base_url, symbol, interval
        );

        if let Some(start) = start_time {
            url.push_str(&format!("&startTime={}", start));
        }
        if let Some(end) = end_time {
            url.push_str(&format!("&endTime={}", end));
        }
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={}", limit.min(MAX_KLINES_LIMIT)));
        }

        debug!("Fetching klines for {} {}", symbol, interval);

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Fetch historical candles for a day range, paginating as needed
    ///
    /// The range is split into sequential request windows sized so that no
    /// window holds more than `limit` candles of the given interval, with
    /// a fixed 1-second pause before each request. Candles are returned in
    /// chronological order; windows share inclusive boundaries, so a
    /// candle on a window edge can appear twice.
    ///
    /// # Arguments
    /// * `symbol` - Symbol name
    /// * `start_day` / `end_day` - `mm/dd/yy` day strings; each side
    ///   defaults to 30 days from the other, or from today when both are
    ///   omitted
    /// * `interval` - Candle interval (default "1d" at the client surface)
    /// * `limit` - Per-request candle cap (max 500)
    #[instrument(skip(self))]
    pub async fn get_history(
        &self,
        symbol: &str,
        start_day: Option<&str>,
        end_day: Option<&str>,
        interval: &str,
        limit: u32,
    ) -> RestResult<Vec<Candle>> {
        let limit = limit.clamp(1, MAX_KLINES_LIMIT);
        let now_secs = chrono::Utc::now().timestamp();
        let (start_ms, end_ms) = resolve_range(start_day, end_day, now_secs)?;
        let plan = WindowPlan::new(start_ms, end_ms, interval, limit);

        info!(
            "Fetching {} history for {} ({} -> {})",
            interval, symbol, start_ms, end_ms
        );

        let mut candles = Vec::new();
        for (window_start, window_end) in plan.windows() {
            tokio::time::sleep(HISTORY_REQUEST_PAUSE).await;

            let batch = self
                .get_klines(
                    symbol,
                    interval,
                    Some(window_start),
                    Some(window_end),
                    Some(limit),
                )
                .await?;
            candles.extend(batch);
        }

        info!("Fetched {} candles for {}", candles.len(), symbol);
        Ok(candles)
    }

    /// Fetch historical candles and write them to a CSV file
    ///
    /// Columns: open-time (seconds), close-time (seconds), open, high,
    /// low, close, volume.
    #[instrument(skip(self))]
    pub async fn save_history(
        &self,
        symbol: &str,
        start_day: Option<&str>,
        end_day: Option<&str>,
        interval: &str,
        limit: u32,
        path: &std::path::Path,
    ) -> RestResult<Vec<Candle>> {
        let candles = self
            .get_history(symbol, start_day, end_day, interval, limit)
            .await?;
        save_history_csv(&candles, path)?;

        info!("Saved {} candles to {}", candles.len(), path.display());
        Ok(candles)
    }

    /// Get the latest price for a symbol
    #[instrument(skip(self))]
    pub async fn get_latest_price(&self, symbol: &str) -> RestResult<PriceTicker> {
        let url = format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol);
        debug!("Fetching latest price for {}", symbol);

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get the latest price for every symbol
    #[instrument(skip(self))]
    pub async fn get_latest_prices(&self) -> RestResult<Vec<PriceTicker>> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        debug!("Fetching latest prices");

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get the best bid/ask on the order book for a symbol
    #[instrument(skip(self))]
    pub async fn get_best_price(&self, symbol: &str) -> RestResult<BookTicker> {
        let url = format!(
            "{}/api/v3/ticker/bookTicker?symbol={}",
            self.base_url, symbol
        );
        debug!("Fetching best price for {}", symbol);

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get the best bid/ask on the order book for every symbol
    #[instrument(skip(self))]
    pub async fn get_best_prices(&self) -> RestResult<Vec<BookTicker>> {
        let url = format!("{}/api/v3/ticker/bookTicker", self.base_url);
        debug!("Fetching best prices");

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get 24-hour price change statistics for a symbol
    #[instrument(skip(self))]
    pub async fn get_24hr_stats(&self, symbol: &str) -> RestResult<Stats24hr> {
        let url = format!("{}/api/v3/ticker/24hr?symbol={}", self.base_url, symbol);
        debug!("Fetching 24hr stats for {}", symbol);

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    /// Get 24-hour price change statistics for every symbol
    ///
    /// Considerably heavier on request weight than the single-symbol
    /// variant.
    #[instrument(skip(self))]
    pub async fn get_24hr_stats_all(&self) -> RestResult<Vec<Stats24hr>> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        debug!("Fetching 24hr stats for all symbols");

        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_klines_limit_is_capped() {
        assert_eq!(1000u32.min(super::MAX_KLINES_LIMIT), 500);
    }
}
