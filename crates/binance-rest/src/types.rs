//! Types for Binance REST API requests and responses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Market Data Types
// ============================================================================

/// Server time response
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Server UNIX time in milliseconds
    pub server_time: i64,
}

/// Exchange information (trading rules and symbol list)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    /// Exchange timezone (always "UTC")
    pub timezone: String,
    /// Server UNIX time in milliseconds
    pub server_time: i64,
    /// Listed symbols
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// Lexicographically sorted symbol names, deduplicated
    pub fn symbol_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.symbols.iter().map(|s| s.symbol.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Per-symbol trading rules
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Symbol name (e.g. "BTCUSDT")
    pub symbol: String,
    /// Trading status (e.g. "TRADING")
    pub status: String,
    /// Base asset (e.g. "BTC")
    pub base_asset: String,
    /// Quote asset (e.g. "USDT")
    pub quote_asset: String,
}

/// A price level: (price, quantity), both kept as the exchange's exact
/// decimal strings
pub type BookLevel = (String, String);

/// Order book snapshot
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    /// Snapshot sequence number
    pub last_update_id: u64,
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().and_then(|(price, _)| price.parse().ok())
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().and_then(|(price, _)| price.parse().ok())
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// One kline (candlestick) row
///
/// The exchange returns each candle as a 12-element array:
/// `[open time, open, high, low, close, volume, close time, quote volume,
/// trade count, taker buy base, taker buy quote, unused]`.
/// Prices and volumes stay `String` to preserve the exact decimal
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candle {
    /// Open time, UNIX milliseconds
    pub open_time: i64,
    /// Open price
    pub open: String,
    /// High price
    pub high: String,
    /// Low price
    pub low: String,
    /// Close price
    pub close: String,
    /// Base asset volume
    pub volume: String,
    /// Close time, UNIX milliseconds
    pub close_time: i64,
    /// Quote asset volume
    pub quote_volume: String,
    /// Number of trades
    pub trades: u64,
    /// Taker buy base asset volume
    pub taker_buy_base_volume: String,
    /// Taker buy quote asset volume
    pub taker_buy_quote_volume: String,
    /// Unused field, always present on the wire
    pub ignore: String,
}

/// Latest price for a symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTicker {
    /// Symbol name
    pub symbol: String,
    /// Latest price
    pub price: String,
}

/// Best bid/ask on the order book for a symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    /// Symbol name
    pub symbol: String,
    /// Best bid price
    pub bid_price: String,
    /// Best bid quantity
    pub bid_qty: String,
    /// Best ask price
    pub ask_price: String,
    /// Best ask quantity
    pub ask_qty: String,
}

/// 24-hour rolling window price change statistics
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats24hr {
    /// Symbol name
    pub symbol: String,
    /// Absolute price change
    pub price_change: String,
    /// Relative price change in percent
    pub price_change_percent: String,
    /// Volume-weighted average price
    pub weighted_avg_price: String,
    /// Last price
    pub last_price: String,
    /// Best bid price
    pub bid_price: String,
    /// Best ask price
    pub ask_price: String,
    /// Open price
    pub open_price: String,
    /// High price
    pub high_price: String,
    /// Low price
    pub low_price: String,
    /// Base asset volume
    pub volume: String,
    /// Quote asset volume
    pub quote_volume: String,
    /// Window open time, UNIX milliseconds
    pub open_time: i64,
    /// Window close time, UNIX milliseconds
    pub close_time: i64,
    /// Number of trades in the window
    pub count: u64,
}

// ============================================================================
// Account Types
// ============================================================================

/// Account snapshot
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInformation {
    /// Maker commission in basis points
    pub maker_commission: u32,
    /// Taker commission in basis points
    pub taker_commission: u32,
    /// Whether the account may trade
    pub can_trade: bool,
    /// Whether the account may withdraw
    pub can_withdraw: bool,
    /// Whether the account may deposit
    pub can_deposit: bool,
    /// Last update time, UNIX milliseconds
    pub update_time: i64,
    /// Per-asset balances
    pub balances: Vec<Balance>,
}

impl AccountInformation {
    /// Balances sorted descending by free amount
    pub fn balances_by_free(&self) -> Vec<Balance> {
        let mut balances = self.balances.clone();
        balances.sort_by(|a, b| {
            b.free_amount()
                .unwrap_or_default()
                .cmp(&a.free_amount().unwrap_or_default())
        });
        balances
    }

    /// Asset -> free amount mapping
    ///
    /// Built from the descending-sorted view, so a repeated asset collapses
    /// to its last-sorted entry.
    pub fn balances_map(&self) -> HashMap<String, Decimal> {
        self.balances_by_free()
            .into_iter()
            .map(|b| {
                let free = b.free_amount().unwrap_or_default();
                (b.asset, free)
            })
            .collect()
    }
}

/// Asset balance
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Asset symbol (e.g. "BTC")
    pub asset: String,
    /// Free amount
    pub free: String,
    /// Amount locked in open orders
    pub locked: String,
}

impl Balance {
    /// Free amount parsed as a decimal
    pub fn free_amount(&self) -> Option<Decimal> {
        self.free.parse().ok()
    }

    /// Locked amount parsed as a decimal
    pub fn locked_amount(&self) -> Option<Decimal> {
        self.locked.parse().ok()
    }
}

/// Order status as reported by the order-query endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Symbol name
    pub symbol: String,
    /// Exchange-assigned order ID
    pub order_id: i64,
    /// Client-assigned order ID
    pub client_order_id: String,
    /// Order price
    pub price: String,
    /// Original quantity
    pub orig_qty: String,
    /// Executed quantity
    pub executed_qty: String,
    /// Order status (e.g. "NEW", "FILLED", "CANCELED")
    pub status: String,
    /// Time in force
    pub time_in_force: String,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: String,
    /// Order side
    pub side: String,
    /// Stop price ("0.0" when not applicable)
    pub stop_price: String,
    /// Creation time, UNIX milliseconds
    pub time: i64,
    /// Last update time, UNIX milliseconds
    pub update_time: i64,
    /// Whether the order is on the book
    pub is_working: bool,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
    /// Stop loss limit order
    StopLossLimit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::StopLossLimit => "STOP_LOSS_LIMIT",
        };
        write!(f, "{}", s)
    }
}

/// Time in force for orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled
    #[serde(rename = "GTC")]
    GoodTillCancelled,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Fill or kill
    #[serde(rename = "FOK")]
    FillOrKill,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoodTillCancelled => write!(f, "GTC"),
            Self::ImmediateOrCancel => write!(f, "IOC"),
            Self::FillOrKill => write!(f, "FOK"),
        }
    }
}

/// Request to place an order
///
/// Constructed per call and submitted through the signed order endpoint;
/// the `test` flag routes to `/api/v3/order/test`, which validates the
/// order without placing it.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Symbol name
    pub symbol: String,
    /// Order side
    pub side: OrderSide,
    /// Order type
    pub order_type: OrderType,
    /// Order quantity in the base asset
    pub quantity: Decimal,
    /// Price (limit and stop-loss-limit orders)
    pub price: Option<Decimal>,
    /// Stop price (stop-loss-limit orders)
    pub stop_price: Option<Decimal>,
    /// Order lifetime policy
    pub time_in_force: Option<TimeInForce>,
    /// Route to the validation-only test endpoint
    pub test: bool,
}

impl OrderRequest {
    /// Create a market order
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
            test: false,
        }
    }

    /// Create a limit order (immediate-or-cancel unless overridden)
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            stop_price: None,
            time_in_force: Some(TimeInForce::ImmediateOrCancel),
            test: false,
        }
    }

    /// Create a stop-loss-limit order (good-till-cancelled unless overridden)
    pub fn stop_loss_limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::StopLossLimit,
            quantity,
            price: Some(price),
            stop_price: Some(stop_price),
            time_in_force: Some(TimeInForce::GoodTillCancelled),
            test: false,
        }
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    /// Route to the validation-only test endpoint
    pub fn test_only(mut self) -> Self {
        self.test = true;
        self
    }
}

/// Response from placing an order
///
/// Every field is optional: the test endpoint acknowledges a valid order
/// with an empty body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    /// Symbol name
    pub symbol: Option<String>,
    /// Exchange-assigned order ID
    pub order_id: Option<i64>,
    /// Client-assigned order ID
    pub client_order_id: Option<String>,
    /// Transaction time, UNIX milliseconds
    pub transact_time: Option<i64>,
    /// Order price
    pub price: Option<String>,
    /// Original quantity
    pub orig_qty: Option<String>,
    /// Executed quantity
    pub executed_qty: Option<String>,
    /// Order status
    pub status: Option<String>,
    /// Time in force
    pub time_in_force: Option<String>,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    /// Order side
    pub side: Option<String>,
}

/// Response from cancelling an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanceledOrder {
    /// Symbol name
    pub symbol: String,
    /// Exchange-assigned order ID
    pub order_id: i64,
    /// Client order ID of the cancelled order
    pub orig_client_order_id: Option<String>,
    /// Client order ID of the cancel request
    pub client_order_id: Option<String>,
    /// Order price
    pub price: Option<String>,
    /// Original quantity
    pub orig_qty: Option<String>,
    /// Executed quantity
    pub executed_qty: Option<String>,
    /// Final order status
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXCHANGE_INFO_FIXTURE: &str = r#"{
        "timezone": "UTC",
        "serverTime": 1625097600000,
        "symbols": [
            {"symbol": "ETHUSDT", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "USDT"},
            {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"},
            {"symbol": "BNBBTC", "status": "TRADING", "baseAsset": "BNB", "quoteAsset": "BTC"},
            {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"}
        ]
    }"#;

    const ACCOUNT_FIXTURE: &str = r#"{
        "makerCommission": 15,
        "takerCommission": 15,
        "canTrade": true,
        "canWithdraw": true,
        "canDeposit": true,
        "updateTime": 1625097600000,
        "balances": [
            {"asset": "BTC", "free": "0.05000000", "locked": "0.00000000"},
            {"asset": "USDT", "free": "1250.75000000", "locked": "100.00000000"},
            {"asset": "ETH", "free": "0.00000000", "locked": "0.00000000"},
            {"asset": "BNB", "free": "3.20000000", "locked": "0.00000000"}
        ]
    }"#;

    #[test]
    fn test_symbol_names_sorted_and_deduplicated() {
        let info: ExchangeInfo = serde_json::from_str(EXCHANGE_INFO_FIXTURE).unwrap();
        let names = info.symbol_names();

        assert_eq!(names, vec!["BNBBTC", "BTCUSDT", "ETHUSDT"]);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_balances_sorted_descending_by_free() {
        let account: AccountInformation = serde_json::from_str(ACCOUNT_FIXTURE).unwrap();
        let balances = account.balances_by_free();

        let assets: Vec<&str> = balances.iter().map(|b| b.asset.as_str()).collect();
        assert_eq!(assets, vec!["USDT", "BNB", "BTC", "ETH"]);
    }

    #[test]
    fn test_balances_map_has_one_key_per_asset() {
        let mut account: AccountInformation = serde_json::from_str(ACCOUNT_FIXTURE).unwrap();
        // Repeat an asset; the mapping must still have one entry per name
        account.balances.push(Balance {
            asset: "BTC".to_string(),
            free: "0.01000000".to_string(),
            locked: "0.00000000".to_string(),
        });

        let map = account.balances_map();
        assert_eq!(map.len(), 4);
        // Last-sorted entry wins for the repeated asset
        assert_eq!(map["BTC"], "0.01".parse().unwrap());
    }

    #[test]
    fn test_candle_from_kline_row() {
        let row = r#"[1609459200000,"29000.00","29600.00","28800.00","29400.00","1234.50",1609545599999,"36000000.00",100,"600.00","17500000.00","0"]"#;
        let candle: Candle = serde_json::from_str(row).unwrap();

        assert_eq!(candle.open_time, 1609459200000);
        assert_eq!(candle.close_time, 1609545599999);
        assert_eq!(candle.open, "29000.00");
        assert_eq!(candle.close, "29400.00");
        assert_eq!(candle.trades, 100);
    }

    #[test]
    fn test_order_book_preserves_decimal_strings() {
        let body = r#"{
            "lastUpdateId": 1027024,
            "bids": [["4.00000000", "431.00000000"], ["3.99000000", "12.00000000"]],
            "asks": [["4.00000200", "12.00000000"]]
        }"#;
        let book: OrderBook = serde_json::from_str(body).unwrap();

        assert_eq!(book.bids[0].0, "4.00000000");
        assert_eq!(book.asks[0].1, "12.00000000");
        assert_eq!(book.best_bid(), Some("4.00000000".parse().unwrap()));
        assert!(book.spread().unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_order_request_builders() {
        let order = OrderRequest::limit(
            "BTCUSDT",
            OrderSide::Buy,
            "0.001".parse().unwrap(),
            "50000".parse().unwrap(),
        );
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.time_in_force, Some(TimeInForce::ImmediateOrCancel));
        assert!(!order.test);

        let order = OrderRequest::stop_loss_limit(
            "BTCUSDT",
            OrderSide::Sell,
            "0.001".parse().unwrap(),
            "48000".parse().unwrap(),
            "48500".parse().unwrap(),
        )
        .test_only();
        assert_eq!(order.time_in_force, Some(TimeInForce::GoodTillCancelled));
        assert!(order.stop_price.is_some());
        assert!(order.test);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(OrderSide::Buy.to_string(), "BUY");
        assert_eq!(OrderType::StopLossLimit.to_string(), "STOP_LOSS_LIMIT");
        assert_eq!(TimeInForce::FillOrKill.to_string(), "FOK");
    }

    #[test]
    fn test_order_ack_from_empty_body() {
        let ack: OrderAck = serde_json::from_str("{}").unwrap();
        assert!(ack.order_id.is_none());
        assert!(ack.status.is_none());
    }
}
