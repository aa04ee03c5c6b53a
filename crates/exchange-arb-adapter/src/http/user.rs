/*
[INPUT]:  Trading pair / asset symbols and signed query parameters
[OUTPUT]: User account data (orders, account snapshot, balances)
[POS]:    HTTP layer - user data endpoints (require API key + signature)
[UPDATE]: When adding new user endpoints or changing query parameters
*/

use reqwest::Method;
use rust_decimal::Decimal;

use crate::http::{BinanceClient, BinanceError, Result};
use crate::types::{AccountInfo, Order, QueryParams};

impl BinanceClient {
    /// All orders for a pair, any status
    ///
    /// GET /api/v3/allOrders?symbol={pair}
    pub async fn get_order_history(&self, pair: &str) -> Result<Vec<Order>> {
        let params = QueryParams::new().with("symbol", pair);
        let url = self.api_url_v3("allOrders")?;
        self.authenticated_request(Method::GET, url, &params).await
    }

    /// Full account snapshot
    ///
    /// GET /api/v3/account
    pub async fn get_account(&self) -> Result<AccountInfo> {
        let url = self.api_url_v3("account")?;
        self.authenticated_request(Method::GET, url, &QueryParams::new())
            .await
    }

    /// Free balance of one asset.
    ///
    /// Fails with [`BinanceError::NotFound`] when the asset is not listed in
    /// the account snapshot.
    pub async fn get_balance(&self, asset: &str) -> Result<Decimal> {
        let account = self.get_account().await?;
        account
            .balances_by_asset()
            .get(asset)
            .map(|balance| balance.free)
            .ok_or_else(|| BinanceError::NotFound(format!("balance for {asset}")))
    }

    /// Open orders, for one pair or for every pair
    ///
    /// GET /api/v3/openOrders?symbol={pair}
    pub async fn get_open_orders(&self, pair: Option<&str>) -> Result<Vec<Order>> {
        let mut params = QueryParams::new();
        if let Some(pair) = pair {
            params.push("symbol", pair);
        }
        let url = self.api_url_v3("openOrders")?;
        self.authenticated_request(Method::GET, url, &params).await
    }
}
