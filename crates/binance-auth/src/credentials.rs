//! Authentication credentials for the Binance API
//!
//! Implements HMAC-SHA256 query-string signing as required by Binance's
//! signed (USER_DATA / TRADE) endpoints.
//!
//! # Security
//!
//! Secret keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// API credentials for authenticated requests
///
/// The secret key is automatically zeroized when the Credentials are
/// dropped, preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (sent in the `X-MBX-APIKEY` header)
    api_key: String,
    /// Secret key (zeroized on drop)
    secret_key: SecretBox<String>,
}

impl Credentials {
    /// Create new credentials from an API key and secret key
    ///
    /// # Arguments
    /// * `api_key` - Your Binance API key
    /// * `secret_key` - Your Binance secret key
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();

        if api_key.is_empty() || secret_key.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "API key and secret key must be non-empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            secret_key: SecretBox::new(Box::new(secret_key)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BINANCE_API_KEY` and `BINANCE_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var("BINANCE_API_KEY")
            .map_err(|_| AuthError::EnvVarNotSet("BINANCE_API_KEY".to_string()))?;
        let secret_key = std::env::var("BINANCE_API_SECRET")
            .map_err(|_| AuthError::EnvVarNotSet("BINANCE_API_SECRET".to_string()))?;

        Self::new(api_key, secret_key)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Current UNIX time in milliseconds, as required by the `timestamp`
    /// parameter on signed endpoints.
    pub fn timestamp_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as i64
    }

    /// Compute the HMAC-SHA256 signature of a payload, hex-encoded
    ///
    /// The payload must be the exact query string that will be sent,
    /// excluding the `signature` parameter itself.
    pub fn signature(&self, payload: &str) -> String {
        // expose_secret() provides controlled access to the key
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret_key: SecretBox::new(Box::new(self.secret_key.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", &self.api_key[..8.min(self.api_key.len())]),
            )
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Signer for building authenticated query strings
///
/// Binance signature algorithm:
/// 1. Sort parameters by key and URL-encode into `k=v&k=v` form
/// 2. Append `&timestamp=<milliseconds>` as the last parameter
/// 3. HMAC-SHA256(secret_key, query), hex-encoded
/// 4. Append `&signature=<hex>` to the query
///
/// The exchange rejects any request whose signature does not cover exactly
/// the timestamped, sorted, encoded parameter string.
#[derive(Debug)]
pub struct QuerySigner<'a> {
    credentials: &'a Credentials,
}

impl<'a> QuerySigner<'a> {
    /// Create a new query signer
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Canonicalize parameters: lexicographic key order, URL-encoded
    pub fn canonical_query(params: &[(&str, String)]) -> String {
        let mut sorted: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        serde_urlencoded::to_string(&sorted).expect("string pairs always encode")
    }

    /// Build the signed query string for a fixed timestamp
    ///
    /// Deterministic: the same parameters, timestamp and secret always
    /// produce a byte-identical query.
    pub fn signed_query(&self, params: &[(&str, String)], timestamp_ms: i64) -> String {
        let canonical = Self::canonical_query(params);

        let mut query = if canonical.is_empty() {
            format!("timestamp={}", timestamp_ms)
        } else {
            format!("{}&timestamp={}", canonical, timestamp_ms)
        };

        let signature = self.credentials.signature(&query);
        query.push_str("&signature=");
        query.push_str(&signature);
        query
    }

    /// Build the signed query string stamped with the current time
    pub fn signed_query_now(&self, params: &[(&str, String)]) -> String {
        self.signed_query(params, Credentials::timestamp_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials::new("test_api_key", "test_secret_key").unwrap()
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("key", "").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = test_credentials();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("test_secret_key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_canonical_query_sorts_keys() {
        let params = [
            ("symbol", "BTCUSDT".to_string()),
            ("limit", "50".to_string()),
        ];
        assert_eq!(
            QuerySigner::canonical_query(&params),
            "limit=50&symbol=BTCUSDT"
        );
    }

    #[test]
    fn test_canonical_query_url_encodes_values() {
        let params = [("note", "a b&c".to_string())];
        assert_eq!(QuerySigner::canonical_query(&params), "note=a+b%26c");
    }

    #[test]
    fn test_signed_query_layout() {
        let creds = test_credentials();
        let signer = QuerySigner::new(&creds);

        let params = [("symbol", "BTCUSDT".to_string())];
        let query = signer.signed_query(&params, 1_600_000_000_000);

        assert!(query.starts_with("symbol=BTCUSDT&timestamp=1600000000000&signature="));
        let signature = query.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signed_query_without_params() {
        let creds = test_credentials();
        let signer = QuerySigner::new(&creds);

        let query = signer.signed_query(&[], 1_600_000_000_000);
        assert!(query.starts_with("timestamp=1600000000000&signature="));
    }

    #[test]
    fn test_signing_determinism() {
        let creds = test_credentials();
        let signer = QuerySigner::new(&creds);

        let params = [
            ("symbol", "ETHUSDT".to_string()),
            ("side", "BUY".to_string()),
        ];
        let q1 = signer.signed_query(&params, 1_600_000_000_000);
        let q2 = signer.signed_query(&params, 1_600_000_000_000);
        assert_eq!(q1, q2);

        // Independent recomputation over the same payload matches
        let payload = "side=BUY&symbol=ETHUSDT&timestamp=1600000000000";
        let expected = creds.signature(payload);
        assert!(q1.ends_with(&expected));
    }

    #[test]
    fn test_signature_reference_vector() {
        // Worked example from the Binance API documentation
        let creds = Credentials::new(
            "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A",
            "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
        )
        .unwrap();

        let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            creds.signature(payload),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }
}
