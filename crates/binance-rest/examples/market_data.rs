//! Example: public market data
//!
//! This example demonstrates the unauthenticated endpoints:
//! - Connectivity and server time
//! - Symbol list and order book
//! - Paginated historical candles with CSV export
//!
//! Run with: cargo run --example market_data

use binance_rest::BinanceRestClient;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== Binance Market Data Example ===\n");

    let client = BinanceRestClient::new();

    // Connectivity
    client.ping().await?;
    let time = client.get_server_time().await?;
    println!("Server time: {}", time.server_time);

    // Symbol list
    let symbols = client.get_symbols().await?;
    println!("{} symbols listed, first: {:?}", symbols.len(), symbols.first());

    // Order book
    println!("\nFetching BTCUSDT order book...");
    let book = client.get_order_book("BTCUSDT", Some(10)).await?;
    if let Some((price, qty)) = book.bids.first() {
        println!("  Best bid: {} x {}", price, qty);
    }
    if let Some((price, qty)) = book.asks.first() {
        println!("  Best ask: {} x {}", price, qty);
    }

    // Tickers
    let price = client.get_latest_price("BTCUSDT").await?;
    println!("\nLatest BTCUSDT price: {}", price.price);

    let stats = client.get_24hr_stats("BTCUSDT").await?;
    println!(
        "24hr change: {} ({}%)",
        stats.price_change, stats.price_change_percent
    );

    // Historical candles (paginated, 1 request/second)
    println!("\nFetching January 2021 daily candles...");
    let candles = client
        .get_history("BTCUSDT", Some("01/01/21"), Some("01/31/21"), "1d", 500)
        .await?;
    for candle in &candles {
        println!(
            "{} \t {} \t {}",
            candle.open_time, candle.close_time, candle.close
        );
    }

    binance_rest::save_history_csv(&candles, Path::new("btcusdt_jan21.csv"))?;
    println!("Saved {} rows to btcusdt_jan21.csv", candles.len());

    Ok(())
}
