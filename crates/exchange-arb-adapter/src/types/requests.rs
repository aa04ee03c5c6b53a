/*
[INPUT]:  Per-call request parameters
[OUTPUT]: Ordered query parameter lists and order request bodies
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use url::form_urlencoded;

use super::enums::{OrderType, Side, TimeInForce};

/// Ordered query parameters.
///
/// The exchange signs the encoded query string, so the insertion order here
/// is the order that gets signed and transmitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encode in insertion order (`a=1&b=x+y`)
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Order placement request for `POST /api/v3/order`
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
}

impl NewOrderRequest {
    /// LIMIT order, good-till-cancelled
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            time_in_force: Some(TimeInForce::Gtc),
        }
    }

    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            time_in_force: None,
        }
    }

    /// LIMIT when a price is given, MARKET otherwise
    pub fn from_price(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Self {
        match price {
            Some(price) => Self::limit(symbol, side, quantity, price),
            None => Self::market(symbol, side, quantity),
        }
    }

    /// Query parameters: type, [price, timeInForce], symbol, side, quantity
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new().with("type", self.order_type.as_str());
        if let Some(price) = self.price {
            params.push("price", fixed_8(price));
        }
        if let Some(tif) = self.time_in_force {
            params.push("timeInForce", tif.as_str());
        }
        params.push("symbol", &self.symbol);
        params.push("side", self.side.as_str());
        params.push("quantity", fixed_8(self.quantity));
        params
    }
}

/// Cancel request for `DELETE /api/v3/order`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub order_id: u64,
}

impl CancelOrderRequest {
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("symbol", &self.symbol)
            .with("orderId", self.order_id)
    }
}

fn fixed_8(value: Decimal) -> String {
    format!("{:.8}", value.round_dp(8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn query_params_keep_insertion_order() {
        let params = QueryParams::new()
            .with("symbol", "ETHZRX")
            .with("limit", 50)
            .with("note", "a b&c");

        assert_eq!(params.encode(), "symbol=ETHZRX&limit=50&note=a+b%26c");
        assert_eq!(params.get("limit"), Some("50"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn limit_order_params() {
        let req = NewOrderRequest::limit("ZRXETH", Side::Buy, Decimal::new(25, 0), Decimal::new(15, 1));
        let params = req.to_params();

        assert_eq!(
            params.encode(),
            "type=LIMIT&price=1.50000000&timeInForce=GTC&symbol=ZRXETH&side=BUY&quantity=25.00000000"
        );
    }

    #[test]
    fn market_order_params_have_no_price() {
        let req = NewOrderRequest::from_price("ZRXETH", Side::Sell, Decimal::new(3, 1), None);
        let params = req.to_params();

        assert_eq!(params.get("type"), Some("MARKET"));
        assert_eq!(params.get("price"), None);
        assert_eq!(params.get("timeInForce"), None);
        assert_eq!(params.get("quantity"), Some("0.30000000"));
    }

    #[rstest]
    #[case("1.5", "1.50000000")]
    #[case("0.000000016", "0.00000002")]
    #[case("100", "100.00000000")]
    #[case("0.12345678", "0.12345678")]
    fn prices_use_eight_decimals(#[case] input: &str, #[case] expected: &str) {
        let price: Decimal = input.parse().expect("decimal");
        assert_eq!(fixed_8(price), expected);
    }

    #[test]
    fn cancel_params() {
        let req = CancelOrderRequest {
            symbol: "REPETH".to_string(),
            order_id: 42,
        };
        assert_eq!(req.to_params().encode(), "symbol=REPETH&orderId=42");
    }
}
