/*
[INPUT]:  HTTP configuration (base URLs, timeouts, recvWindow, credentials)
[OUTPUT]: Configured reqwest client and the request/response helpers
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{BinanceError, RequestSigner, Result};
use crate::types::{ApiErrorPayload, QueryParams};

/// Base URLs for the Binance REST API
pub const API_URL: &str = "https://www.binance.com/api/v1";
pub const API_URL_V3: &str = "https://www.binance.com/api/v3";

/// Header carrying the API key on keyed and signed requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Taker/maker fee ratio, informational only
pub const FEE_RATIO: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Server-side tolerance for signed requests, in milliseconds
    pub recv_window: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            recv_window: 120_000,
        }
    }
}

/// API key and secret; both are required
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.trim().is_empty() {
            return Err(BinanceError::Signature("api key is missing".to_string()));
        }
        if api_secret.trim().is_empty() {
            return Err(BinanceError::Signature("api secret is missing".to_string()));
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Main HTTP client for the Binance REST API
#[derive(Debug)]
pub struct BinanceClient {
    http_client: Client,
    api_url: Url,
    api_url_v3: Url,
    api_key: String,
    signer: RequestSigner,
    recv_window: u64,
    fee_ratio: Decimal,
}

impl BinanceClient {
    /// Create a new client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_urls(credentials, config, API_URL, API_URL_V3)
    }

    /// Create a new client with custom configuration and base URLs
    pub fn with_config_and_base_urls(
        credentials: Credentials,
        config: ClientConfig,
        api_url: &str,
        api_url_v3: &str,
    ) -> Result<Self> {
        let credentials = Credentials::new(credentials.api_key, credentials.api_secret)?;
        let signer = RequestSigner::new(&credentials.api_secret)?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_url: parse_base_url(api_url)?,
            api_url_v3: parse_base_url(api_url_v3)?,
            api_key: credentials.api_key,
            signer,
            recv_window: config.recv_window,
            fee_ratio: FEE_RATIO,
        })
    }

    pub fn fee_ratio(&self) -> Decimal {
        self.fee_ratio
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Full URL for a v1 endpoint
    pub(crate) fn api_url(&self, endpoint: &str) -> Result<Url> {
        join(&self.api_url, endpoint)
    }

    /// Full URL for a v3 endpoint
    pub(crate) fn api_url_v3(&self, endpoint: &str) -> Result<Url> {
        join(&self.api_url_v3, endpoint)
    }

    /// GET/POST/DELETE with params in the query string and no credentials
    pub async fn unauthenticated_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        params: &QueryParams,
    ) -> Result<T> {
        let builder = self.request(method, url, &params.encode(), false);
        self.send_json(builder).await
    }

    /// Unsigned request that still carries the API key header
    pub async fn keyed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        params: &QueryParams,
    ) -> Result<T> {
        let builder = self.request(method, url, &params.encode(), true);
        self.send_json(builder).await
    }

    /// Append `recvWindow`, sign, and send with the API key header
    pub async fn authenticated_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        params: &QueryParams,
    ) -> Result<T> {
        let query = self.signed_query(params)?;
        let builder = self.request(method, url, &query, true);
        self.send_json(builder).await
    }

    /// Encoded query for a signed call; this exact string is transmitted
    pub fn signed_query(&self, params: &QueryParams) -> Result<String> {
        let params = params.clone().with("recvWindow", self.recv_window);
        Ok(self.signer.sign(&params)?.encode())
    }

    fn request(&self, method: Method, mut url: Url, query: &str, with_key: bool) -> RequestBuilder {
        debug!(method = %method, path = url.path(), keyed = with_key, "dispatching request");

        if !query.is_empty() {
            url.set_query(Some(query));
        }
        let builder = self.http_client.request(method, url);
        if with_key {
            builder.header(API_KEY_HEADER, &self.api_key)
        } else {
            builder
        }
    }

    /// The single response decoding step shared by every endpoint
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorPayload>(&body) {
                Ok(payload) => BinanceError::exchange_error(status, payload.code, payload.msg),
                Err(_) => BinanceError::exchange_error(status, 0, body),
            });
        }

        // Some gateways report failures with a 200 and an error body
        if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(&body) {
            if payload.code < 0 {
                return Err(BinanceError::exchange_error(status, payload.code, payload.msg));
            }
        }

        serde_json::from_str(&body).map_err(BinanceError::from)
    }
}

fn join(base: &Url, endpoint: &str) -> Result<Url> {
    let url = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    Ok(Url::parse(&url)?)
}

/// Base URLs must be http(s) and able to carry a path
fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(BinanceError::Config(format!("unsupported base URL: {raw}")));
    }
    Ok(url)
}
