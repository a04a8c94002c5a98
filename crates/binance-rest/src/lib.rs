//! REST API client for the Binance cryptocurrency exchange
//!
//! This crate provides a REST API client for the Binance spot market,
//! including public market data and signed account/trading operations.
//!
//! # Features
//!
//! - **Market Data**: Ping, server time, exchange info, order book,
//!   tickers, 24 hr statistics
//! - **History**: Paginated kline (candlestick) fetching over arbitrary
//!   day ranges, with CSV export
//! - **Account**: Balances, order history, open orders
//! - **Trading**: Market, limit and stop-loss-limit orders; cancellation
//!
//! # Authentication
//!
//! Private endpoints require API credentials. The client signs the query
//! string with HMAC-SHA256 as specified by Binance's API documentation
//! and sends the API key in the `X-MBX-APIKEY` header.
//!
//! # Example
//!
//! ```no_run
//! use binance_rest::{BinanceRestClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = BinanceRestClient::new();
//!     let candles = client
//!         .get_history("BTCUSDT", Some("01/01/21"), Some("01/31/21"), "1d", 500)
//!         .await?;
//!     println!("Fetched {} candles", candles.len());
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = BinanceRestClient::with_credentials(creds);
//!     let balances = auth_client.get_balances().await?;
//!     println!("Balances: {:?}", balances);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! Paginated history fetches pause one second between requests. No other
//! client-side rate limiting is applied; callers are expected to stay
//! inside Binance's published request-weight limits.
//!
//! # Errors
//!
//! Every endpoint returns [`error::RestResult`]. Non-success responses
//! from the exchange are logged with their error code/message and
//! surfaced as [`error::RestError::Api`] — callers never receive an
//! error-shaped body as a success value.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod history;
pub mod types;

// Re-export main types
pub use binance_auth::Credentials;
pub use client::{BinanceRestClient, ClientConfig, DEFAULT_BASE_URL, TESTNET_BASE_URL};
pub use error::{RestError, RestResult};
pub use history::{save_history_csv, WindowPlan};

// Re-export endpoint-specific types
pub use types::{
    // Market data
    BookLevel, BookTicker, Candle, ExchangeInfo, OrderBook, PriceTicker, ServerTime, Stats24hr,
    SymbolInfo,
    // Account
    AccountInformation, Balance, Order,
    // Trading
    CanceledOrder, OrderAck, OrderRequest, OrderSide, OrderType, TimeInForce,
};
