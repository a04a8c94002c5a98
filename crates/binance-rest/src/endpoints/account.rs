//! Private account endpoints
//!
//! These endpoints require authentication.

use binance_auth::Credentials;
use reqwest::{Client, Method};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::endpoints::signed_request;
use crate::error::RestResult;
use crate::types::{AccountInformation, Balance, Order};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    client: &'a Client,
    base_url: &'a str,
    credentials: &'a Credentials,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a Client, base_url: &'a str, credentials: &'a Credentials) -> Self {
        Self {
            client,
            base_url,
            credentials,
        }
    }

    /// Get the current account snapshot
    #[instrument(skip(self))]
    pub async fn get_account_information(&self) -> RestResult<AccountInformation> {
        signed_request(
            self.client,
            self.base_url,
            self.credentials,
            Method::GET,
            "/api/v3/account",
            &[],
        )
        .await
    }

    /// Get balances sorted descending by free amount
    ///
    /// Recomputed on each call; nothing is cached.
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<Vec<Balance>> {
        let account = self.get_account_information().await?;
        Ok(account.balances_by_free())
    }

    /// Get balances as an asset -> free amount mapping
    ///
    /// Asset symbols are unique on the exchange, so collapsing repeated
    /// assets loses nothing.
    #[instrument(skip(self))]
    pub async fn get_balances_map(&self) -> RestResult<HashMap<String, Decimal>> {
        let account = self.get_account_information().await?;
        Ok(account.balances_map())
    }

    /// Get all orders for a symbol: active, cancelled or filled
    #[instrument(skip(self))]
    pub async fn get_all_orders(&self, symbol: &str) -> RestResult<Vec<Order>> {
        let params = [("symbol", symbol.to_string())];
        debug!("Fetching all orders for {}", symbol);

        signed_request(
            self.client,
            self.base_url,
            self.credentials,
            Method::GET,
            "/api/v3/allOrders",
            &params,
        )
        .await
    }

    /// Get open orders across all symbols
    ///
    /// Heavier on request weight than a symbol-scoped query.
    #[instrument(skip(self))]
    pub async fn get_open_orders(&self) -> RestResult<Vec<Order>> {
        debug!("Fetching open orders");

        signed_request(
            self.client,
            self.base_url,
            self.credentials,
            Method::GET,
            "/api/v3/openOrders",
            &[],
        )
        .await
    }
}
