//! Example: authenticated account and trading operations
//!
//! This example demonstrates the signed endpoints:
//! - Account balances
//! - Placing a validation-only test order
//! - Cancelling open orders
//!
//! Run with: cargo run --example trading
//!
//! NOTE: set BINANCE_API_KEY and BINANCE_API_SECRET environment variables.
//! Orders below use the test endpoint, so nothing is actually placed.

use binance_rest::{BinanceRestClient, Credentials, OrderSide};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== Binance Trading Example ===\n");

    let creds = Credentials::from_env()?;
    let client = BinanceRestClient::with_credentials(creds);

    // Account snapshot
    let account = client.get_account_information().await?;
    println!(
        "Account can trade: {}, maker fee: {} bps",
        account.can_trade, account.maker_commission
    );

    let balances = client.get_balances().await?;
    println!("\nTop balances:");
    for balance in balances.iter().take(5) {
        println!("  {} \t free {} \t locked {}", balance.asset, balance.free, balance.locked);
    }

    // Validation-only test order (test = true routes to /api/v3/order/test)
    println!("\nSubmitting test limit buy...");
    match client
        .limit_buy("BTCUSDT", "0.001".parse()?, "20000".parse()?, None, true)
        .await
    {
        Ok(_) => println!("  Test order accepted"),
        Err(e) => println!("  Test order rejected: {}", e),
    }

    // Open orders and best-effort cancellation
    let open = client.get_open_orders().await?;
    println!("\n{} open orders", open.len());

    if !open.is_empty() {
        let results = client.cancel_all_orders().await?;
        let cancelled = results.iter().filter(|r| r.is_ok()).count();
        println!("Cancelled {}/{} orders", cancelled, results.len());
    }

    Ok(())
}
