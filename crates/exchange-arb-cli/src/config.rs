/*
[INPUT]:  Optional YAML configuration file and BINANCE_* environment variables
[OUTPUT]: Parsed application configuration, adapter credentials and client config
[POS]:    Configuration layer - credential sourcing lives here, not in the adapter
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use exchange_arb_adapter::http::client::{API_URL, API_URL_V3};
use exchange_arb_adapter::{ClientConfig, Credentials};

/// Environment variable prefix (`BINANCE_API_KEY`, `BINANCE_API_SECRET`, ...)
pub const ENV_PREFIX: &str = "BINANCE";

/// Top-level configuration for the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// API key sent as `X-MBX-APIKEY`
    pub api_key: String,
    /// API secret used as the HMAC key
    pub api_secret: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_url_v3")]
    pub api_url_v3: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_recv_window")]
    pub recv_window: u64,
}

fn default_api_url() -> String {
    API_URL.to_string()
}

fn default_api_url_v3() -> String {
    API_URL_V3.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_recv_window() -> u64 {
    120_000
}

impl AppConfig {
    /// Load from an optional YAML file overlaid with `BINANCE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Same as [`AppConfig::load`] with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(env)
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("BINANCE_API_KEY and BINANCE_API_SECRET must be set")?;

        config.credentials()?;
        Ok(config)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(self.api_key.clone(), self.api_secret.clone())
            .context("invalid exchange credentials")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            recv_window: self.recv_window,
            ..ClientConfig::default()
        }
    }
}
