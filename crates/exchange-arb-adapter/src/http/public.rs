/*
[INPUT]:  Trading pair symbols and query parameters
[OUTPUT]: Market data (trades, klines, prices, depth, best bid/ask)
[POS]:    HTTP layer - public market data endpoints (no signature required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use reqwest::Method;

use crate::http::{BinanceClient, BinanceError, Result};
use crate::types::{
    BestBidAsk, DepthBook, DepthLevel, Kline, PriceTickerResponse, QueryParams, Quote, SymbolPrice,
    Trade,
};

/// Depth and trade list size requested from the exchange
pub const DEFAULT_LIMIT: u32 = 50;

impl BinanceClient {
    /// Older trades for a pair
    ///
    /// GET /api/v1/historicalTrades?symbol={pair}&limit=50 (API key header, unsigned)
    pub async fn get_historical_trades(&self, pair: &str) -> Result<Vec<Trade>> {
        let params = QueryParams::new()
            .with("symbol", pair)
            .with("limit", DEFAULT_LIMIT);
        let url = self.api_url("historicalTrades")?;
        self.keyed_request(Method::GET, url, &params).await
    }

    /// Recent trades for a pair
    ///
    /// GET /api/v1/trades?symbol={pair}&limit=50
    pub async fn get_recent_trades(&self, pair: &str) -> Result<Vec<Trade>> {
        let params = QueryParams::new()
            .with("symbol", pair)
            .with("limit", DEFAULT_LIMIT);
        let url = self.api_url("trades")?;
        self.unauthenticated_request(Method::GET, url, &params).await
    }

    /// Kline/candlestick bars
    ///
    /// GET /api/v1/klines?symbol={pair}&interval={interval}
    pub async fn get_candlesticks(&self, pair: &str, interval: &str) -> Result<Vec<Kline>> {
        let params = QueryParams::new()
            .with("symbol", pair)
            .with("interval", interval);
        let url = self.api_url("klines")?;
        self.unauthenticated_request(Method::GET, url, &params).await
    }

    /// Last traded price for a pair
    ///
    /// GET /api/v1/ticker/allPrices?symbol={pair}
    pub async fn get_last_price(&self, pair: &str) -> Result<SymbolPrice> {
        let params = QueryParams::new().with("symbol", pair);
        let url = self.api_url("ticker/allPrices")?;
        let response: PriceTickerResponse =
            self.unauthenticated_request(Method::GET, url, &params).await?;

        response
            .into_symbol(pair)
            .ok_or_else(|| BinanceError::NotFound(format!("last price for {pair}")))
    }

    /// Order book snapshot
    ///
    /// GET /api/v1/depth?symbol={pair}&limit=50
    pub async fn get_order_book(&self, pair: &str) -> Result<DepthBook> {
        let params = QueryParams::new()
            .with("symbol", pair)
            .with("limit", DEFAULT_LIMIT);
        let url = self.api_url("depth")?;
        self.unauthenticated_request(Method::GET, url, &params).await
    }

    /// Best bid and best ask as `(price, quantity)` floats.
    ///
    /// An empty side is reported as [`BinanceError::NotFound`].
    pub async fn get_best_bid_ask(&self, pair: &str) -> Result<BestBidAsk> {
        let book = self.get_order_book(pair).await?;
        innermost(&book, pair)
    }
}

/// Index 0 of each side of `book`
pub fn innermost(book: &DepthBook, pair: &str) -> Result<BestBidAsk> {
    let bid = book
        .best_bid()
        .ok_or_else(|| BinanceError::NotFound(format!("bids for {pair}")))?;
    let ask = book
        .best_ask()
        .ok_or_else(|| BinanceError::NotFound(format!("asks for {pair}")))?;

    Ok(BestBidAsk {
        bid: to_quote(bid)?,
        ask: to_quote(ask)?,
    })
}

fn to_quote(level: &DepthLevel) -> Result<Quote> {
    level
        .to_quote()
        .ok_or_else(|| BinanceError::InvalidResponse(format!("level {level:?} is not a float")))
}

#[cfg(test)]
mod tests {
    use crate::http::{BinanceClient, BinanceError, ClientConfig, Credentials};
    use crate::types::{BestBidAsk, Quote, SymbolPrice};
    use rust_decimal::Decimal;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BinanceClient {
        let v1 = format!("{}/api/v1", server.uri());
        let v3 = format!("{}/api/v3", server.uri());
        BinanceClient::with_config_and_base_urls(
            Credentials::new("test-key", "test-secret").expect("credentials"),
            ClientConfig::default(),
            &v1,
            &v3,
        )
        .expect("client init")
    }

    #[tokio::test]
    async fn test_get_recent_trades() {
        let server = MockServer::start().await;
        let mock_response = r#"[
            {
                "id": 28457,
                "price": "4.00000100",
                "qty": "12.00000000",
                "quoteQty": "48.000012",
                "time": 1499865549590,
                "isBuyerMaker": true,
                "isBestMatch": true
            }
        ]"#;

        Mock::given(method("GET"))
            .and(path("/api/v1/trades"))
            .and(query_param("symbol", "ETHZRX"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let trades = client
            .get_recent_trades("ETHZRX")
            .await
            .expect("get_recent_trades failed");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, 28457);
        assert_eq!(trades[0].price, "4.00000100".parse::<Decimal>().unwrap());
        assert_eq!(trades[0].quote_qty, Some("48.000012".parse().unwrap()));
        assert!(trades[0].is_buyer_maker);
    }

    #[tokio::test]
    async fn test_get_historical_trades_sends_api_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/historicalTrades"))
            .and(query_param("symbol", "ETHZRX"))
            .and(query_param("limit", "50"))
            .and(header("X-MBX-APIKEY", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "price": "1.0", "qty": "2.0", "time": 1, "isBuyerMaker": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let trades = client
            .get_historical_trades("ETHZRX")
            .await
            .expect("get_historical_trades failed");

        assert_eq!(trades.len(), 1);
        assert!(trades[0].quote_qty.is_none());
        assert!(!trades[0].is_best_match);
    }

    #[tokio::test]
    async fn test_get_candlesticks() {
        let server = MockServer::start().await;
        let mock_response = r#"[
            [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100",
             "148976.11427815", 1499644799999, "2434.19055334", 308,
             "1756.87402397", "28.46694368", "17928899.62484339"]
        ]"#;

        Mock::given(method("GET"))
            .and(path("/api/v1/klines"))
            .and(query_param("symbol", "ZRXETH"))
            .and(query_param("interval", "1h"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let klines = client
            .get_candlesticks("ZRXETH", "1h")
            .await
            .expect("get_candlesticks failed");

        assert_eq!(klines.len(), 1);
        assert_eq!(klines[0].high, "0.80000000".parse::<Decimal>().unwrap());
        assert_eq!(klines[0].close_time, 1_499_644_799_999);
    }

    #[tokio::test]
    async fn test_get_last_price_picks_requested_symbol() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/ticker/allPrices"))
            .and(query_param("symbol", "ZRXETH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"symbol": "ETHBTC", "price": "0.05"},
                {"symbol": "ZRXETH", "price": "0.00251000"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let price = client
            .get_last_price("ZRXETH")
            .await
            .expect("get_last_price failed");

        assert_eq!(
            price,
            SymbolPrice {
                symbol: "ZRXETH".to_string(),
                price: "0.00251000".parse().unwrap(),
            }
        );

        let err = client.get_last_price("GNTETH").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_best_bid_ask() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/depth"))
            .and(query_param("symbol", "ZRXETH"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lastUpdateId": 1027024,
                "bids": [["10.0", "2"], ["9.5", "4"]],
                "asks": [["10.5", "1"], ["11.0", "3"]]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let best = client
            .get_best_bid_ask("ZRXETH")
            .await
            .expect("get_best_bid_ask failed");

        assert_eq!(
            best,
            BestBidAsk {
                bid: Quote {
                    price: 10.0,
                    quantity: 2.0
                },
                ask: Quote {
                    price: 10.5,
                    quantity: 1.0
                },
            }
        );
    }

    #[tokio::test]
    async fn test_get_best_bid_ask_empty_side_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/depth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lastUpdateId": 1,
                "bids": [["10.0", "2"]],
                "asks": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_best_bid_ask("ZRXETH").await.unwrap_err();

        match err {
            BinanceError::NotFound(what) => assert_eq!(what, "asks for ZRXETH"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
