/*
[INPUT]:  Order requests with signed query parameters
[OUTPUT]: Order responses, cancellations and batch cancel reports
[POS]:    HTTP layer - trading endpoints (require API key + signature)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use reqwest::Method;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::http::{BinanceClient, BinanceError, Result};
use crate::types::{
    CancelOrderRequest, CancelOrderResponse, NewOrderRequest, NewOrderResponse, Side,
};

/// Pairs swept by [`BinanceClient::cancel_all_orders`]
pub const TRACKED_PAIRS: [&str; 3] = ["ZRXETH", "REPETH", "GNTETH"];

/// A cancellation, or the open-orders fetch for a pair, that failed
#[derive(Debug)]
pub struct CancelFailure {
    pub symbol: String,
    /// `None` when listing the pair's open orders failed
    pub order_id: Option<u64>,
    pub error: BinanceError,
}

/// Outcome of a batch cancel
#[derive(Debug, Default)]
pub struct CancelAllReport {
    pub cancelled: Vec<CancelOrderResponse>,
    pub failures: Vec<CancelFailure>,
}

impl CancelAllReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of orders a cancel was issued for
    pub fn attempted(&self) -> usize {
        self.cancelled.len()
            + self
                .failures
                .iter()
                .filter(|failure| failure.order_id.is_some())
                .count()
    }
}

impl BinanceClient {
    /// Place an order. A price makes it a GTC LIMIT order, no price a MARKET
    /// order; price and amount are sent with 8 decimals.
    ///
    /// POST /api/v3/order
    pub async fn place_order(
        &self,
        pair: &str,
        side: Side,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Result<NewOrderResponse> {
        self.new_order(NewOrderRequest::from_price(pair, side, amount, price))
            .await
    }

    /// POST /api/v3/order
    pub async fn new_order(&self, req: NewOrderRequest) -> Result<NewOrderResponse> {
        let url = self.api_url_v3("order")?;
        self.authenticated_request(Method::POST, url, &req.to_params())
            .await
    }

    /// Cancel one order by id
    ///
    /// DELETE /api/v3/order?symbol={pair}&orderId={order_id}
    pub async fn cancel_order(&self, pair: &str, order_id: u64) -> Result<CancelOrderResponse> {
        let req = CancelOrderRequest {
            symbol: pair.to_string(),
            order_id,
        };
        let url = self.api_url_v3("order")?;
        self.authenticated_request(Method::DELETE, url, &req.to_params())
            .await
    }

    /// Cancel every open order on every tracked pair
    pub async fn cancel_all_orders(&self) -> CancelAllReport {
        self.cancel_all_orders_for(&TRACKED_PAIRS).await
    }

    /// Cancel every open order on each of `pairs`.
    ///
    /// Failures are collected in the report; the sweep always visits every
    /// pair and every order.
    pub async fn cancel_all_orders_for(&self, pairs: &[&str]) -> CancelAllReport {
        let mut report = CancelAllReport::default();

        for &pair in pairs {
            let orders = match self.get_open_orders(Some(pair)).await {
                Ok(orders) => orders,
                Err(error) => {
                    warn!(symbol = %pair, error = %error, "failed to list open orders");
                    report.failures.push(CancelFailure {
                        symbol: pair.to_string(),
                        order_id: None,
                        error,
                    });
                    continue;
                }
            };

            for order in orders {
                match self.cancel_order(pair, order.order_id).await {
                    Ok(cancelled) => report.cancelled.push(cancelled),
                    Err(error) => {
                        warn!(
                            symbol = %pair,
                            order_id = order.order_id,
                            error = %error,
                            "failed to cancel order"
                        );
                        report.failures.push(CancelFailure {
                            symbol: pair.to_string(),
                            order_id: Some(order.order_id),
                            error,
                        });
                    }
                }
            }
        }

        info!(
            pairs = pairs.len(),
            cancelled = report.cancelled.len(),
            failed = report.failures.len(),
            "cancel sweep finished"
        );
        report
    }
}
