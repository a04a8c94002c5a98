//! Error types for REST API operations

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// The exchange returned an error body
    #[error("API error {code}: {message}")]
    Api {
        /// Binance error code (e.g. -1121 for an invalid symbol)
        code: i64,
        /// Error message from the exchange
        message: String,
    },

    /// Non-success HTTP status without a decodable error body
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// CSV export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RestError {
    /// Check if this error indicates rate limiting
    ///
    /// Binance signals rate limiting with error codes -1003 (too many
    /// requests) and -1015 (too many orders), or HTTP 429/418 when the
    /// body is absent.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { code, .. } => matches!(code, -1003 | -1015),
            Self::Status { status, .. } => matches!(status, 429 | 418),
            _ => false,
        }
    }

    /// Check if this error indicates an unknown or invalid symbol
    pub fn is_invalid_symbol(&self) -> bool {
        matches!(self, Self::Api { code: -1121, .. })
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification() {
        let err = RestError::Api {
            code: -1003,
            message: "Too many requests.".to_string(),
        };
        assert!(err.is_rate_limited());

        let err = RestError::Status {
            status: 429,
            body: String::new(),
        };
        assert!(err.is_rate_limited());

        assert!(!RestError::AuthRequired.is_rate_limited());
    }

    #[test]
    fn test_invalid_symbol_classification() {
        let err = RestError::Api {
            code: -1121,
            message: "Invalid symbol.".to_string(),
        };
        assert!(err.is_invalid_symbol());
        assert!(!err.is_rate_limited());
    }
}
