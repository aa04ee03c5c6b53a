/*
[INPUT]:  Error sources (transport, exchange payloads, serialization, credentials)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Binance adapter
#[derive(Error, Debug)]
pub enum BinanceError {
    /// Network failure, TLS failure or timeout
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Exchange answered with a non-success status or an error payload
    #[error("Exchange error (status {status}, code {code}): {message}")]
    Exchange {
        status: u16,
        code: i64,
        message: String,
    },

    /// Credentials missing or rejected while building the signer
    #[error("Signature error: {0}")]
    Signature(String),

    /// Requested asset, symbol or book level is absent from the response
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BinanceError {
    /// Check if the error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, BinanceError::Transport(_))
    }

    /// Check if the error reports a missing asset, symbol or level
    pub fn is_not_found(&self) -> bool {
        matches!(self, BinanceError::NotFound(_))
    }

    /// Create an exchange error from status code, exchange code and message
    pub fn exchange_error(status: StatusCode, code: i64, message: impl Into<String>) -> Self {
        BinanceError::Exchange {
            status: status.as_u16(),
            code,
            message: message.into(),
        }
    }
}

/// Result type alias for Binance operations
pub type Result<T> = std::result::Result<T, BinanceError>;
