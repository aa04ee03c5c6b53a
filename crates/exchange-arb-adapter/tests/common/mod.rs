/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for exchange-arb-adapter tests

use exchange_arb_adapter::{BinanceClient, ClientConfig, Credentials, RequestSigner};
use wiremock::{Match, MockServer, Request};

pub const TEST_API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
pub const TEST_API_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_API_KEY, TEST_API_SECRET).expect("test credentials")
}

/// Client whose v1 and v3 bases point at the mock server
pub fn mock_client(server: &MockServer) -> BinanceClient {
    let v1 = format!("{}/api/v1", server.uri());
    let v3 = format!("{}/api/v3", server.uri());
    BinanceClient::with_config_and_base_urls(test_credentials(), ClientConfig::default(), &v1, &v3)
        .expect("client init")
}

/// Matches requests whose trailing `signature` is the HMAC of the exact
/// query string transmitted before it
pub struct SignedQuery {
    signer: RequestSigner,
}

impl SignedQuery {
    pub fn new(secret: &str) -> Self {
        Self {
            signer: RequestSigner::new(secret).expect("signer"),
        }
    }
}

impl Match for SignedQuery {
    fn matches(&self, request: &Request) -> bool {
        let Some(query) = request.url.query() else {
            return false;
        };
        let Some((payload, signature)) = query.rsplit_once("&signature=") else {
            return false;
        };
        self.signer
            .signature(payload)
            .map(|expected| expected == signature)
            .unwrap_or(false)
    }
}
