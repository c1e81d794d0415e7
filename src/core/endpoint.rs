use crate::core::errors::{BodyError, HttpErrorKind};
use reqwest::Method;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Maps an HTTP status to an error verdict, or `None` when the status is acceptable.
pub type StatusClassifier = fn(u16) -> Option<HttpErrorKind>;

/// Decodes a raw response body into the endpoint's response type.
pub type BodyDecoder<R> = fn(&[u8]) -> Result<R, BodyError>;

/// Read-only description of one REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBase {
    /// e.g. `https://api.binance.com`
    pub base_url: Cow<'static, str>,
    /// e.g. `/api/v3/order`
    pub path: Cow<'static, str>,
    pub method: Method,
    /// Signed "user data" endpoint that needs the API key.
    pub requires_auth: bool,
    /// Minimum interval between calls per credential, in milliseconds.
    pub user_interval_ms: u64,
    /// Minimum interval between calls per network address, in milliseconds.
    pub ip_interval_ms: u64,
}

impl EndpointBase {
    pub const fn new(
        base_url: &'static str,
        path: &'static str,
        method: Method,
        requires_auth: bool,
        user_interval_ms: u64,
        ip_interval_ms: u64,
    ) -> Self {
        Self {
            base_url: Cow::Borrowed(base_url),
            path: Cow::Borrowed(path),
            method,
            requires_auth,
            user_interval_ms,
            ip_interval_ms,
        }
    }

    /// Base URL joined with the path, without a query string.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// An endpoint bound to its params type `P` and response type `R`.
///
/// Endpoints are declared once as `const` items by the exchange module and
/// handed to [`request`](crate::core::request::request) together with a value of `P`.
pub struct Endpoint<P, R> {
    pub base: EndpointBase,
    pub classify_status: StatusClassifier,
    pub decode_body: BodyDecoder<R>,
    _params: PhantomData<fn(&P)>,
}

impl<P, R> Endpoint<P, R> {
    pub const fn new(
        base: EndpointBase,
        classify_status: StatusClassifier,
        decode_body: BodyDecoder<R>,
    ) -> Self {
        Self {
            base,
            classify_status,
            decode_body,
            _params: PhantomData,
        }
    }

    /// Same endpoint served from another host, e.g. a testnet.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<Cow<'static, str>>) -> Self {
        self.base.base_url = base_url.into();
        self
    }
}

impl<P, R> Clone for Endpoint<P, R> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            classify_status: self.classify_status,
            decode_body: self.decode_body,
            _params: PhantomData,
        }
    }
}

impl<P, R> fmt::Debug for Endpoint<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
