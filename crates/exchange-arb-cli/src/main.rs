/*
[INPUT]:  CLI arguments, optional YAML configuration file, BINANCE_* environment
[OUTPUT]: One exchange query or action printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use exchange_arb_adapter::BinanceClient;
use exchange_arb_cli::{AppConfig, Command, commands};

#[derive(Parser, Debug)]
#[command(name = "exchange-arb", version, about = "Binance REST client smoke-test runner")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        api_url = %config.api_url,
        api_url_v3 = %config.api_url_v3,
        "configuration loaded"
    );

    let client = BinanceClient::with_config_and_base_urls(
        config.credentials()?,
        config.client_config(),
        &config.api_url,
        &config.api_url_v3,
    )
    .context("build exchange client")?;

    let command = args.command.unwrap_or_default();
    let output = commands::run(&client, &command).await?;
    println!("{output}");

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
