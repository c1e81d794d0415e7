//! Transport kernel shared by every exchange
//!
//! The kernel holds only exchange-agnostic pieces:
//!
//! - [`query`]: typed params flattened into canonical, URL-encoded query strings
//! - [`signer`]: pluggable request signing (`HmacSha256Signer` for Binance)
//! - [`rest`]: the outbound request, request hooks, the `RequestMaker` seam
//!   and the `HttpTransport` boundary with its reqwest implementation
//!
//! Exchange modules implement `RequestMaker`; everything else is reused as is.
//!
//! ```rust,no_run
//! use cex_rest::core::kernel::*;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = RestClientBuilder::new(
//!     RestClientConfig::new("binance".to_string()).with_timeout(10),
//! )
//! .build()?;
//! let hooks = [hooks::timeout(std::time::Duration::from_secs(5))];
//! # let _ = (transport, hooks);
//! # Ok(())
//! # }
//! ```

pub mod query;
pub mod rest;
pub mod signer;

pub use query::{encode, to_query_pairs, QueryPairs};
pub use rest::{
    hooks, HttpTransport, OutboundRequest, RawResponse, ReqwestTransport, RequestHook,
    RequestMaker, RestClientBuilder, RestClientConfig, TransportReply,
};
pub use signer::{hmac_sha256_hex, HmacSha256Signer, Signer};
