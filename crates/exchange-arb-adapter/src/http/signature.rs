/*
[INPUT]:  Query parameters and API secret
[OUTPUT]: Signed query parameters (timestamp + signature)
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or parameter format
*/

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::{BinanceError, Result};
use crate::types::QueryParams;

type HmacSha256 = Hmac<Sha256>;

/// Signs query strings with HMAC-SHA256 keyed by the API secret
pub struct RequestSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl RequestSigner {
    /// Create a new request signer keyed by the given API secret
    pub fn new(api_secret: &str) -> Result<Self> {
        if api_secret.is_empty() {
            return Err(BinanceError::Signature("api secret is empty".to_string()));
        }
        Ok(Self {
            secret: api_secret.as_bytes().to_vec(),
        })
    }

    /// Hex HMAC-SHA256 of `payload`
    pub fn signature(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| BinanceError::Signature(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Sign with the current wall clock
    pub fn sign(&self, params: &QueryParams) -> Result<QueryParams> {
        self.sign_at(params, now_millis())
    }

    /// Copy `params`, append `timestamp`, then append the `signature` of the
    /// encoded copy. The input is left untouched.
    ///
    /// The signed string is exactly the encoded result minus its trailing
    /// `&signature=...` pair.
    pub fn sign_at(&self, params: &QueryParams, timestamp_ms: i64) -> Result<QueryParams> {
        let mut signed = params.clone();
        signed.push("timestamp", timestamp_ms);
        let signature = self.signature(&signed.encode())?;
        signed.push("signature", signature);
        Ok(signed)
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
