//! Trading endpoints for order placement and cancellation
//!
//! These endpoints require authentication.

use binance_auth::Credentials;
use reqwest::{Client, Method};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::endpoints::signed_request;
use crate::error::RestResult;
use crate::types::{CanceledOrder, OrderAck, OrderRequest, OrderSide, TimeInForce};

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    client: &'a Client,
    base_url: &'a str,
    credentials: &'a Credentials,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(client: &'a Client, base_url: &'a str, credentials: &'a Credentials) -> Self {
        Self {
            client,
            base_url,
            credentials,
        }
    }

    /// Submit an order
    ///
    /// Routes to the validation-only test endpoint when the request's
    /// `test` flag is set.
    #[instrument(skip(self, order), fields(symbol = %order.symbol, side = %order.side, order_type = %order.order_type))]
    pub async fn place_order(&self, order: &OrderRequest) -> RestResult<OrderAck> {
        let mut params: Vec<(&str, String)> = vec![
            ("symbol", order.symbol.clone()),
            ("side", order.side.to_string()),
            ("type", order.order_type.to_string()),
            ("quantity", order.quantity.to_string()),
        ];

        if let Some(price) = order.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = order.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(tif) = order.time_in_force {
            params.push(("timeInForce", tif.to_string()));
        }

        let path = if order.test {
            "/api/v3/order/test"
        } else {
            "/api/v3/order"
        };

        debug!(
            "Placing {} {} order for {} {}",
            order.side, order.order_type, order.quantity, order.symbol
        );

        signed_request(
            self.client,
            self.base_url,
            self.credentials,
            Method::POST,
            path,
            &params,
        )
        .await
    }

    /// Place a market order
    #[instrument(skip(self))]
    pub async fn market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        test: bool,
    ) -> RestResult<OrderAck> {
        let mut order = OrderRequest::market(symbol, side, quantity);
        order.test = test;
        self.place_order(&order).await
    }

    /// Place a limit order (immediate-or-cancel unless overridden)
    #[instrument(skip(self))]
    pub async fn limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        let mut order = OrderRequest::limit(symbol, side, quantity, price);
        if let Some(tif) = time_in_force {
            order = order.with_time_in_force(tif);
        }
        order.test = test;
        self.place_order(&order).await
    }

    /// Place a limit buy order
    #[instrument(skip(self))]
    pub async fn limit_buy(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.limit_order(symbol, OrderSide::Buy, quantity, price, time_in_force, test)
            .await
    }

    /// Place a limit sell order
    #[instrument(skip(self))]
    pub async fn limit_sell(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        test: bool,
    ) -> RestResult<OrderAck> {
        self.limit_order(
            symbol,
            OrderSide::Sell,
            quantity,
            price,
            time_in_force,
            test,
        )
        .await
    }

    /// Place a stop-loss-limit order (good-till-cancelled unless overridden)
    #[instrument(skip(self))]
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
        let mut order = OrderRequest::stop_loss_limit(symbol, side, quantity, price, stop_price);
        if let Some(tif) = time_in_force {
            order = order.with_time_in_force(tif);
        }
        order.test = test;
        self.place_order(&order).await
    }

    /// Cancel an order by symbol and order ID
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order_id: i64) -> RestResult<CanceledOrder> {
        let params = [
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        debug!("Cancelling order {} on {}", order_id, symbol);

        signed_request(
            self.client,
            self.base_url,
            self.credentials,
            Method::DELETE,
            "/api/v3/order",
            &params,
        )
        .await
    }
}
