/*
[INPUT]:  Parsed subcommand and a configured exchange client
[OUTPUT]: Human-readable command output
[POS]:    Command layer - one exchange call per command
[UPDATE]: When adding new subcommands
*/

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::info;

use exchange_arb_adapter::{BestBidAsk, BinanceClient, CancelAllReport, Order};

/// Pair queried when no subcommand is given
pub const DEFAULT_PAIR: &str = "ZRXETH";

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the best bid and best ask of a pair
    BestBidAsk {
        #[arg(long, default_value = DEFAULT_PAIR)]
        pair: String,
    },
    /// Print the free balance of an asset
    Balance {
        #[arg(long)]
        asset: String,
    },
    /// List open orders, optionally for one pair
    OpenOrders {
        #[arg(long)]
        pair: Option<String>,
    },
    /// Cancel every open order on the tracked pairs
    CancelAll,
}

impl Default for Command {
    fn default() -> Self {
        Command::BestBidAsk {
            pair: DEFAULT_PAIR.to_string(),
        }
    }
}

/// Run one command and render its result
pub async fn run(client: &BinanceClient, command: &Command) -> Result<String> {
    match command {
        Command::BestBidAsk { pair } => {
            let best = client
                .get_best_bid_ask(pair)
                .await
                .with_context(|| format!("fetch best bid/ask for {pair}"))?;
            Ok(render_best_bid_ask(pair, &best))
        }
        Command::Balance { asset } => {
            let free = client
                .get_balance(asset)
                .await
                .with_context(|| format!("fetch balance for {asset}"))?;
            Ok(format!("{asset} free: {free}"))
        }
        Command::OpenOrders { pair } => {
            let orders = client
                .get_open_orders(pair.as_deref())
                .await
                .context("fetch open orders")?;
            Ok(render_orders(&orders))
        }
        Command::CancelAll => {
            let report = client.cancel_all_orders().await;
            let rendered = render_cancel_report(&report);
            if !report.is_complete() {
                bail!("{rendered}");
            }
            info!(cancelled = report.cancelled.len(), "all tracked orders cancelled");
            Ok(rendered)
        }
    }
}

pub fn render_best_bid_ask(pair: &str, best: &BestBidAsk) -> String {
    format!(
        "{pair} bid: [{}, {}] ask: [{}, {}]",
        best.bid.price, best.bid.quantity, best.ask.price, best.ask.quantity
    )
}

pub fn render_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "no open orders".to_string();
    }
    let mut out = String::new();
    for order in orders {
        let _ = writeln!(
            out,
            "{} #{} {:?} {:?} {} @ {} ({:?})",
            order.symbol,
            order.order_id,
            order.side,
            order.order_type,
            order.orig_qty,
            order.price,
            order.status
        );
    }
    out.trim_end().to_string()
}

pub fn render_cancel_report(report: &CancelAllReport) -> String {
    let mut out = format!(
        "cancelled {} order(s), {} failure(s)",
        report.cancelled.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        let target = match failure.order_id {
            Some(id) => format!("order {id}"),
            None => "open orders".to_string(),
        };
        let _ = write!(out, "\n  {} {}: {}", failure.symbol, target, failure.error);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_arb_adapter::{BinanceError, CancelFailure, ClientConfig, Credentials, Quote};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn renders_best_bid_ask_as_float_pairs() {
        let best = BestBidAsk {
            bid: Quote {
                price: 10.0,
                quantity: 2.0,
            },
            ask: Quote {
                price: 10.5,
                quantity: 1.0,
            },
        };
        assert_eq!(
            render_best_bid_ask("ZRXETH", &best),
            "ZRXETH bid: [10, 2] ask: [10.5, 1]"
        );
    }

    #[test]
    fn renders_cancel_failures() {
        let report = CancelAllReport {
            cancelled: Vec::new(),
            failures: vec![CancelFailure {
                symbol: "REPETH".to_string(),
                order_id: None,
                error: BinanceError::NotFound("open orders".to_string()),
            }],
        };
        let rendered = render_cancel_report(&report);
        assert!(rendered.starts_with("cancelled 0 order(s), 1 failure(s)"));
        assert!(rendered.contains("REPETH open orders: Not found: open orders"));
    }

    #[tokio::test]
    async fn best_bid_ask_command_queries_depth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/depth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lastUpdateId": 1,
                "bids": [["0.0024", "150"]],
                "asks": [["0.0025", "80"]]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BinanceClient::with_config_and_base_urls(
            Credentials::new("key", "secret").unwrap(),
            ClientConfig::default(),
            &format!("{}/api/v1", server.uri()),
            &format!("{}/api/v3", server.uri()),
        )
        .unwrap();

        let output = run(&client, &Command::default()).await.unwrap();
        assert_eq!(output, "ZRXETH bid: [0.0024, 150] ask: [0.0025, 80]");
    }
}
