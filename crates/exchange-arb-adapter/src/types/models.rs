/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, OrderType, Side, TimeInForce};

/// Public trade from `/trades` or `/historicalTrades`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_qty: Option<Decimal>,
    pub time: i64,
    pub is_buyer_maker: bool,
    #[serde(default)]
    pub is_best_match: bool,
}

/// Candlestick from `/klines`; the wire format is a positional array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_helpers::RawKline")]
pub struct Kline {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: i64,
    pub quote_volume: Decimal,
    pub trades: u64,
    pub taker_buy_base_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPrice {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// One `[price, quantity]` book level. Trailing elements are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthLevel(
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
);

impl DepthLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    pub fn quantity(&self) -> Decimal {
        self.1
    }

    /// Float view of the level; `None` if either side does not fit an f64
    pub fn to_quote(&self) -> Option<Quote> {
        Some(Quote {
            price: self.0.to_f64()?,
            quantity: self.1.to_f64()?,
        })
    }
}

/// Order book snapshot, sides sorted best-first by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBook {
    #[serde(rename = "lastUpdateId", default)]
    pub last_update_id: u64,
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

impl DepthBook {
    pub fn best_bid(&self) -> Option<&DepthLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&DepthLevel> {
        self.asks.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub quantity: f64,
}

/// Innermost level of each side of the book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestBidAsk {
    pub bid: Quote,
    pub ask: Quote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub symbol: String,
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub orig_qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub executed_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub cummulative_quote_qty: Decimal,
    pub status: OrderStatus,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub stop_price: Decimal,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub is_working: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

/// Account snapshot from `/api/v3/account`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub maker_commission: i64,
    #[serde(default)]
    pub taker_commission: i64,
    #[serde(default)]
    pub buyer_commission: i64,
    #[serde(default)]
    pub seller_commission: i64,
    #[serde(default)]
    pub can_trade: bool,
    #[serde(default)]
    pub can_withdraw: bool,
    #[serde(default)]
    pub can_deposit: bool,
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub account_type: String,
    pub balances: Vec<AssetBalance>,
}

impl AccountInfo {
    /// Balance entries keyed by asset symbol
    pub fn balances_by_asset(&self) -> HashMap<&str, &AssetBalance> {
        self.balances
            .iter()
            .map(|balance| (balance.asset.as_str(), balance))
            .collect()
    }
}

pub(crate) mod serde_helpers {
    use super::{Decimal, DepthLevel, Kline};
    use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::fmt;
    use std::str::FromStr;

    /// Positional kline row; columns past the eleventh are skipped
    pub struct RawKline(
        i64,
        Decimal,
        Decimal,
        Decimal,
        Decimal,
        Decimal,
        i64,
        Decimal,
        u64,
        Decimal,
        Decimal,
    );

    impl<'de> Deserialize<'de> for RawKline {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct KlineVisitor;

            fn decimal<'de, A>(seq: &mut A, index: usize) -> Result<Decimal, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let raw: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(index, &KlineVisitor))?;
                Decimal::from_str(&raw).map_err(de::Error::custom)
            }

            fn element<'de, A, T>(seq: &mut A, index: usize) -> Result<T, A::Error>
            where
                A: SeqAccess<'de>,
                T: Deserialize<'de>,
            {
                seq.next_element()?
                    .ok_or_else(|| de::Error::invalid_length(index, &KlineVisitor))
            }

            impl<'de> Visitor<'de> for KlineVisitor {
                type Value = RawKline;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a kline array of at least 11 elements")
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<RawKline, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    let raw = RawKline(
                        element(&mut seq, 0)?,
                        decimal(&mut seq, 1)?,
                        decimal(&mut seq, 2)?,
                        decimal(&mut seq, 3)?,
                        decimal(&mut seq, 4)?,
                        decimal(&mut seq, 5)?,
                        element(&mut seq, 6)?,
                        decimal(&mut seq, 7)?,
                        element(&mut seq, 8)?,
                        decimal(&mut seq, 9)?,
                        decimal(&mut seq, 10)?,
                    );
                    while seq.next_element::<IgnoredAny>()?.is_some() {}
                    Ok(raw)
                }
            }

            deserializer.deserialize_seq(KlineVisitor)
        }
    }

    impl From<RawKline> for Kline {
        fn from(raw: RawKline) -> Self {
            Kline {
                open_time: raw.0,
                open: raw.1,
                high: raw.2,
                low: raw.3,
                close: raw.4,
                volume: raw.5,
                close_time: raw.6,
                quote_volume: raw.7,
                trades: raw.8,
                taker_buy_base_volume: raw.9,
                taker_buy_quote_volume: raw.10,
            }
        }
    }

    impl<'de> Deserialize<'de> for DepthLevel {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct LevelVisitor;

            impl<'de> Visitor<'de> for LevelVisitor {
                type Value = DepthLevel;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a [price, quantity] array")
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<DepthLevel, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    let price: String = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                    let qty: String = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                    while seq.next_element::<IgnoredAny>()?.is_some() {}

                    Ok(DepthLevel(
                        Decimal::from_str(&price).map_err(de::Error::custom)?,
                        Decimal::from_str(&qty).map_err(de::Error::custom)?,
                    ))
                }
            }

            deserializer.deserialize_seq(LevelVisitor)
        }
    }

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw).map_err(de::Error::custom);
        }

        if value.is_number() {
            return Decimal::from_str(&value.to_string()).map_err(de::Error::custom);
        }

        Err(de::Error::custom("invalid decimal value"))
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}
