use crate::core::config::ConfigError;
use crate::core::endpoint::EndpointBase;
use crate::core::errors::{BuildError, TransportError};
use async_trait::async_trait;
use reqwest::{Client, Method, Proxy};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, trace};

/// Customization applied to an outbound request after the maker built it.
///
/// Hooks run in the order given and only mutate the request.
pub type RequestHook = Arc<dyn Fn(&mut OutboundRequest) + Send + Sync>;

/// Fully formed request handed to the transport.
///
/// The URL already carries the path and the encoded query string; transports
/// must send it as is so that the signature stays the last parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            timeout: None,
            proxy: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets a header, replacing any existing one with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    pub fn apply_hooks(&mut self, hooks: &[RequestHook]) {
        for hook in hooks {
            hook(self);
        }
    }
}

/// Ready-made hooks.
pub mod hooks {
    use super::{OutboundRequest, RequestHook};
    use std::sync::Arc;
    use std::time::Duration;

    pub fn timeout(timeout: Duration) -> RequestHook {
        Arc::new(move |req: &mut OutboundRequest| req.timeout = Some(timeout))
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> RequestHook {
        let name = name.into();
        let value = value.into();
        Arc::new(move |req: &mut OutboundRequest| req.set_header(name.clone(), value.clone()))
    }

    pub fn user_agent(user_agent: impl Into<String>) -> RequestHook {
        header("User-Agent", user_agent)
    }

    pub fn proxy(url: impl Into<String>) -> RequestHook {
        let url = url.into();
        Arc::new(move |req: &mut OutboundRequest| req.proxy = Some(url.clone()))
    }
}

/// Exchange-specific request construction.
///
/// Implementations branch on [`EndpointBase::requires_auth`]: public endpoints
/// get a canonical query string, user-data endpoints get a signed one plus the
/// API key header.
pub trait RequestMaker: Send + Sync {
    fn make<P>(
        &self,
        endpoint: &EndpointBase,
        params: &P,
        hooks: &[RequestHook],
    ) -> Result<OutboundRequest, BuildError>
    where
        P: Serialize + ?Sized;
}

/// Status and raw body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// What a transport hands back for one request.
///
/// A transport may report an error and still return a response (for example
/// when it flags error statuses); the executor inspects the body either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportReply {
    pub response: Option<RawResponse>,
    pub error: Option<TransportError>,
}

impl TransportReply {
    pub const fn ok(response: RawResponse) -> Self {
        Self {
            response: Some(response),
            error: None,
        }
    }

    pub const fn failed(error: TransportError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    pub const fn with_error(response: RawResponse, error: TransportError) -> Self {
        Self {
            response: Some(response),
            error: Some(error),
        }
    }
}

/// HTTP transport boundary
///
/// The executor depends only on this trait; [`ReqwestTransport`] is the
/// production implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> TransportReply;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: OutboundRequest) -> TransportReply {
        (**self).send(request).await
    }
}

/// Configuration for the REST transport
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("cex-rest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating [`ReqwestTransport`] instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestTransport, ConfigError> {
        let client = base_client(&self.config)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(ReqwestTransport {
            client,
            config: self.config,
        })
    }
}

fn base_client(config: &RestClientConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(&config.user_agent)
}

/// Implementation of [`HttpTransport`] using reqwest
///
/// Statuses of 400 and above are reported as [`TransportError::Status`]
/// alongside the response, so callers see both the status and the body.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new(exchange_name: impl Into<String>) -> Result<Self, ConfigError> {
        RestClientBuilder::new(RestClientConfig::new(exchange_name.into())).build()
    }

    pub const fn config(&self) -> &RestClientConfig {
        &self.config
    }

    fn client_for(&self, request: &OutboundRequest) -> Result<Client, TransportError> {
        let Some(url) = &request.proxy else {
            return Ok(self.client.clone());
        };
        let proxy_err = |e: reqwest::Error| TransportError::Proxy {
            url: url.clone(),
            reason: e.to_string(),
        };
        let proxy = Proxy::all(url.as_str()).map_err(proxy_err)?;
        base_client(&self.config)
            .proxy(proxy)
            .build()
            .map_err(proxy_err)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(exchange = %self.config.exchange_name, method = %request.method))]
    async fn send(&self, request: OutboundRequest) -> TransportReply {
        let client = match self.client_for(&request) {
            Ok(client) => client,
            Err(e) => return TransportReply::failed(e),
        };

        let mut builder = client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return TransportReply::failed(e.into()),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return TransportReply::failed(TransportError::Body(e.to_string())),
        };
        trace!(status = status.as_u16(), body = %String::from_utf8_lossy(&body), "response body");

        let raw = RawResponse::new(status.as_u16(), body);
        if status.is_client_error() || status.is_server_error() {
            TransportReply::with_error(raw, TransportError::Status(status.as_u16()))
        } else {
            TransportReply::ok(raw)
        }
    }
}
