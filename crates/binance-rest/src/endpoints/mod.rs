//! REST endpoint groups
//!
//! Endpoints are grouped by concern: market data (public), account
//! queries and trading (both signed). The signed transport is shared —
//! Binance uses one query-string signature scheme across GET, POST and
//! DELETE.

pub mod account;
pub mod market;
pub mod trading;

pub use account::AccountEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

use binance_auth::{Credentials, QuerySigner};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};

/// Error body returned by the exchange on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Decode a response body, mapping non-2xx statuses to [`RestError`]
///
/// The exchange reports failures as `{"code": <i64>, "msg": <str>}`; the
/// code and message are logged and surfaced in the error value.
pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> RestResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => {
            warn!("request failed - error code {} - {}", err.code, err.msg);
            Err(RestError::Api {
                code: err.code,
                message: err.msg,
            })
        }
        Err(_) => {
            warn!("request failed - HTTP {} - {}", status, body);
            Err(RestError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Issue a signed request
///
/// Canonicalizes and signs `params` (sorted keys, millisecond timestamp,
/// HMAC-SHA256 signature appended), attaches the API key header and sends
/// the request with the signed query in the URL.
pub(crate) async fn signed_request<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    method: Method,
    path: &str,
    params: &[(&str, String)],
) -> RestResult<T> {
    let signer = QuerySigner::new(credentials);
    let query = signer.signed_query_now(params);
    let url = format!("{}{}?{}", base_url, path, query);

    debug!("Signed request {} {}", method, path);

    let response = client
        .request(method, &url)
        .header("X-MBX-APIKEY", signer.api_key())
        .send()
        .await?;

    decode_response(response).await
}
