use crate::core::config::{Credentials, ExchangeConfig};
use crate::core::endpoint::EndpointBase;
use crate::core::errors::BuildError;
use crate::core::kernel::query::{encode, to_query_pairs};
use crate::core::kernel::rest::{OutboundRequest, RequestHook, RequestMaker};
use crate::exchanges::binance::signer::{signed_query, timestamp_ms};
use serde::Serialize;
use tracing::trace;

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance request maker.
///
/// Public endpoints get a canonical query string. User-data endpoints are
/// timestamped, signed with the credentials and carry the API key header.
#[derive(Debug, Clone)]
pub struct BinanceUser {
    credentials: Credentials,
}

impl BinanceUser {
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// User without keys, for public market data
    pub fn public() -> Self {
        Self::new(Credentials::new("", ""))
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.credentials())
    }

    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn make_with_timestamp<P>(
        &self,
        endpoint: &EndpointBase,
        params: &P,
        hooks: &[RequestHook],
        timestamp: i64,
    ) -> Result<OutboundRequest, BuildError>
    where
        P: Serialize + ?Sized,
    {
        let pairs = to_query_pairs(params)?;

        let mut request = if endpoint.requires_auth {
            let query = signed_query(pairs, timestamp, &self.credentials)?;
            OutboundRequest::new(endpoint.method.clone(), format!("{}?{}", endpoint.url(), query))
                .with_header(API_KEY_HEADER, self.credentials.api_key())
        } else {
            let url = if pairs.is_empty() {
                endpoint.url()
            } else {
                format!("{}?{}", endpoint.url(), encode(&pairs))
            };
            OutboundRequest::new(endpoint.method.clone(), url)
        };

        request.apply_hooks(hooks);
        trace!(method = %request.method, path = %endpoint.path, "request built");
        Ok(request)
    }
}

impl RequestMaker for BinanceUser {
    fn make<P>(
        &self,
        endpoint: &EndpointBase,
        params: &P,
        hooks: &[RequestHook],
    ) -> Result<OutboundRequest, BuildError>
    where
        P: Serialize + ?Sized,
    {
        self.make_with_timestamp(endpoint, params, hooks, timestamp_ms())
    }
}
