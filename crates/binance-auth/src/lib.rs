//! Authentication and request signing for the Binance REST API
//!
//! Binance authenticates private endpoints with an HMAC-SHA256 signature
//! computed over the request's query string. This crate holds the API
//! credentials and produces signed query strings ready to be appended to
//! a request URL.
//!
//! # Example
//!
//! ```no_run
//! use binance_auth::{Credentials, QuerySigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!
//!     // Sign a query for GET /api/v3/account
//!     let signer = QuerySigner::new(&creds);
//!     let query = signer.signed_query_now(&[]);
//!     println!("?{}", query);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;

pub use credentials::{Credentials, QuerySigner};
pub use error::{AuthError, AuthResult};
