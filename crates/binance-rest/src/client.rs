//! Main REST client implementation

use binance_auth::Credentials;
use reqwest::Client;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::types::{
    AccountInformation, Balance, BookLevel, BookTicker, Candle, CanceledOrder, ExchangeInfo,
    Order, OrderAck, OrderBook, OrderRequest, OrderSide, PriceTicker, ServerTime, Stats24hr,
    TimeInForce,
};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Production REST API host
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Spot testnet host
pub const TESTNET_BASE_URL: &str = "https://testnet.binance.vision";

/// Binance REST API client
///
/// Provides access to both public and private endpoints. The private
/// surface is the public one plus signing credentials — one client value,
/// no separate trading type.
///
/// # Example
///
/// ```no_run
/// use binance_rest::{BinanceRestClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = BinanceRestClient::new();
///     let price = client.get_latest_price("BTCUSDT").await?;
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = BinanceRestClient::with_credentials(creds);
///     let balances = auth_client.get_balances().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BinanceRestClient {
    http_client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl BinanceRestClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("binance-rest/0.1.0"))
            .build()
            .expect("Failed to create HTTP client");

        info!("Created Binance REST client for {}", config.base_url);

        Self {
            http_client,
            base_url: config.base_url,
            credentials: config.credentials,
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.http_client, &self.base_url)
    }

    /// Test connectivity to the REST API
    pub async fn ping(&self) -> RestResult<()> {
        self.market().ping().await
    }

    /// Get server time
    pub async fn get_server_time(&self) -> RestResult<ServerTime> {
        self.market().get_server_time().await
    }

    /// Get exchange information (trading rules and symbol list)
    pub async fn get_exchange_info(&self) -> RestResult<ExchangeInfo> {
        self.market().get_exchange_info().await
    }

    /// Get the lexicographically sorted list of listed symbol names
    pub async fn get_symbols(&self) -> RestResult<Vec<String>> {
        self.market().get_symbols().await
    }

    /// Get the order book for a symbol
    pub async fn get_order_book(&self, symbol: &str, limit: Option<u16>) -> RestResult<OrderBook> {
        self.market().get_order_book(symbol, limit).await
    }

    /// Get the bid side of the order book
    pub async fn get_bids(&self, symbol: &str, limit: Option<u16>) -> RestResult<Vec<BookLevel>> {
        self.market().get_bids(symbol, limit).await
    }

    /// Get the ask side of the order book
    pub async fn get_asks(&self, symbol: &str, limit: Option<u16>) -> RestResult<Vec<BookLevel>> {
        self.market().get_asks(symbol, limit).await
    }

    /// Fetch historical candles for a day range, paginating as needed
    ///
    /// # Arguments
    /// * `symbol` - Symbol name (e.g. "BTCUSDT")
    /// * `start_day` / `end_day` - optional `mm/dd/yy` day strings
    /// * `interval` - Candle interval (e.g. "1m", "1h", "1d")
    /// * `limit` - Per-request candle cap (max 500)
    pub async fn get_history(
        &self,
        symbol: &str,
        start_day: Option<&str>,
        end_day: Option<&str>,
        interval: &str,
        limit: u32,
    ) -> RestResult<Vec<Candle>> {
        self.market()
            .get_history(symbol, start_day, end_day, interval, limit)
            .await
    }

    /// Fetch historical candles and write them to a CSV file
    pub async fn save_history(
        &self,
        symbol: &str,
        start_day: Option<&str>,
        end_day: Option<&str>,
        interval: &str,
        limit: u32,
        path: &Path,
    ) -> RestResult<Vec<Candle>> {
        self.market()
            .save_history(symbol, start_day, end_day, interval, limit, path)
            .await
    }

    /// Get the latest price for a symbol
    pub async fn get_latest_price(&self, symbol: &str) -> RestResult<PriceTicker> {
        self.market().get_latest_price(symbol).await
    }

    /// Get the latest price for every symbol
    pub async fn get_latest_prices(&self) -> RestResult<Vec<PriceTicker>> {
        self.market().get_latest_prices().await
    }

    /// Get the best bid/ask on the order book for a symbol
    pub async fn get_best_price(&self, symbol: &str) -> RestResult<BookTicker> {
        self.market().get_best_price(symbol).await
    }

    /// Get the best bid/ask on the order book for every symbol
    pub async fn get_best_prices(&self) -> RestResult<Vec<BookTicker>> {
        self.market().get_best_prices().await
    }

    /// Get 24-hour price change statistics for a symbol
    pub async fn get_24hr_stats(&self, symbol: &str) -> RestResult<Stats24hr> {
        self.market().get_24hr_stats(symbol).await
    }

    /// Get 24-hour price change statistics for every symbol
    pub async fn get_24hr_stats_all(&self) -> RestResult<Vec<Stats24hr>> {
        self.market().get_24hr_stats_all().await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        let creds = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
        Ok(AccountEndpoints::new(
            &self.http_client,
            &self.base_url,
            creds,
        ))
    }

    /// Get the current account snapshot
    pub async fn get_account_information(&self) -> RestResult<AccountInformation> {
        self.account()?.get_account_information().await
    }

    /// Get balances sorted descending by free amount
    pub async fn get_balances(&self) -> RestResult<Vec<Balance>> {
        self.account()?.get_balances().await
    }

    /// Get balances as an asset -> free amount mapping
    pub async fn get_balances_map(&self) -> RestResult<HashMap<String, Decimal>> {
        self.account()?.get_balances_map().await
    }

    /// Get all orders for a symbol: active, cancelled or filled
    pub async fn get_all_orders(&self, symbol: &str) -> RestResult<Vec<Order>> {
        self.account()?.get_all_orders(symbol).await
    }

    /// Get open orders across all symbols
    pub async fn get_open_orders(&self) -> RestResult<Vec<Order>> {
        self.account()?.get_open_orders().await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        let creds = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
        Ok(TradingEndpoints::new(
            &self.http_client,
            &self.base_url,
            creds,
        ))
    }

    /// Submit an order
    pub async fn place_order(&self, order: &OrderRequest) -> RestResult<OrderAck> {
        self.trading()?.place_order(order).await
    }

    /// Place a market order
    pub async fn market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.trading()?
            .market_order(symbol, side, quantity, test)
            .await
    }

    /// Place a limit order (immediate-or-cancel unless overridden)
    pub async fn limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.trading()?
            .limit_order(symbol, side, quantity, price, time_in_force, test)
            .await
    }

    /// Place a limit buy order
    pub async fn limit_buy(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.trading()?
            .limit_buy(symbol, quantity, price, time_in_force, test)
            .await
    }

    /// Place a limit sell order
    pub async fn limit_sell(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.trading()?
            .limit_sell(symbol, quantity, price, time_in_force, test)
            .await
    }

    /// Place a stop-loss-limit order (good-till-cancelled unless overridden)
    pub async fn stop_loss_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.trading()?
            .stop_loss_limit_order(symbol, side, quantity, price, stop_price, time_in_force, test)
            .await
    }

    /// Cancel an order by symbol and order ID
    pub async fn cancel_order(&self, symbol: &str, order_id: i64) -> RestResult<CanceledOrder> {
        self.trading()?.cancel_order(symbol, order_id).await
    }

    /// Cancel every open order, best-effort
    ///
    /// Fetches open orders and cancels each one sequentially. A failed
    /// cancellation is recorded in its slot and does not halt the
    /// remaining cancellations; the result always holds one entry per
    /// open order.
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self) -> RestResult<Vec<RestResult<CanceledOrder>>> {
        let open = self.account()?.get_open_orders().await?;
        let trading = self.trading()?;

        info!("Cancelling {} open orders", open.len());

        let mut results = Vec::with_capacity(open.len());
        for order in &open {
            let result = trading.cancel_order(&order.symbol, order.order_id).await;
            if let Err(e) = &result {
                warn!(
                    "Failed to cancel order {} on {}: {}",
                    order.order_id, order.symbol, e
                );
            }
            results.push(result);
        }

        Ok(results)
    }
}

impl Default for BinanceRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BinanceRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// REST API host
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the REST API host (e.g. the spot testnet)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credentials() {
        let client = BinanceRestClient::new();
        assert!(!client.has_credentials());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_base_url(TESTNET_BASE_URL);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.base_url, TESTNET_BASE_URL);
    }

    #[test]
    fn test_auth_required_error() {
        let client = BinanceRestClient::new();
        let result = client.account();
        assert!(matches!(result, Err(RestError::AuthRequired)));

        let result = client.trading();
        assert!(matches!(result, Err(RestError::AuthRequired)));
    }
}
