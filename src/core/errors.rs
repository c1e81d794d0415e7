use crate::core::endpoint::EndpointBase;
use reqwest::{Method, StatusCode};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Semantic cause behind an exchange error code.
///
/// Exchanges map their numeric codes onto these kinds through an
/// [`ErrorCodeTable`](crate::core::codec::ErrorCodeTable), so callers can
/// test for a specific cause without knowing the exchange's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Unknown,
    Disconnected,
    Unauthorized,
    TooManyRequests,
    UnexpectedResponse,
    Timeout,
    ServerBusy,
    UnknownOrderComposition,
    TooManyOrders,
    ServiceShuttingDown,
    UnsupportedOperation,
    /// Request timestamp is outside the exchange's receive window.
    InvalidTimestamp,
    InvalidSignature,
    IllegalChars,
    TooManyParameters,
    MandatoryParamMissing,
    UnknownParam,
    UnreadParameters,
    EmptyParam,
    ParamNotRequired,
    BadPrecision,
    InvalidParameter,
    InvalidSymbol,
    InvalidListenKey,
    NewOrderRejected,
    CancelRejected,
    NoSuchOrder,
    BadApiKeyFormat,
    RejectedApiKey,
    NoNeedToChangeMarginType,
    NoNeedToChangePositionSide,
}

impl ApiErrorKind {
    /// Whether the exchange documents this condition as transient.
    ///
    /// Informational only: the executor retries clock skew and nothing else.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Unknown
                | Self::Disconnected
                | Self::TooManyRequests
                | Self::UnexpectedResponse
                | Self::Timeout
                | Self::ServerBusy
                | Self::TooManyOrders
                | Self::ServiceShuttingDown
                | Self::InvalidTimestamp
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown error",
            Self::Disconnected => "disconnected",
            Self::Unauthorized => "unauthorized",
            Self::TooManyRequests => "too many requests",
            Self::UnexpectedResponse => "unexpected response",
            Self::Timeout => "timeout",
            Self::ServerBusy => "server busy",
            Self::UnknownOrderComposition => "unknown order composition",
            Self::TooManyOrders => "too many orders",
            Self::ServiceShuttingDown => "service shutting down",
            Self::UnsupportedOperation => "unsupported operation",
            Self::InvalidTimestamp => "invalid timestamp",
            Self::InvalidSignature => "invalid signature",
            Self::IllegalChars => "illegal characters",
            Self::TooManyParameters => "too many parameters",
            Self::MandatoryParamMissing => "mandatory parameter missing or malformed",
            Self::UnknownParam => "unknown parameter",
            Self::UnreadParameters => "unread parameters",
            Self::EmptyParam => "empty parameter",
            Self::ParamNotRequired => "parameter not required",
            Self::BadPrecision => "bad precision",
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidSymbol => "invalid symbol",
            Self::InvalidListenKey => "invalid listen key",
            Self::NewOrderRejected => "new order rejected",
            Self::CancelRejected => "cancel rejected",
            Self::NoSuchOrder => "no such order",
            Self::BadApiKeyFormat => "bad api key format",
            Self::RejectedApiKey => "api key rejected",
            Self::NoNeedToChangeMarginType => "no need to change margin type",
            Self::NoNeedToChangePositionSide => "no need to change position side",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure while turning typed params into an outbound request.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("serialize params: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("params must serialize to an object, got {0}")]
    NotAnObject(&'static str),

    #[error("unsupported value for param `{key}`: {kind}")]
    UnsupportedField { key: String, kind: &'static str },

    #[error("param `{0}` is reserved")]
    ReservedParam(String),
}

/// Failure reported by the transport layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("read response body: {0}")]
    Body(String),

    #[error("invalid proxy {url}: {reason}")]
    Proxy { url: String, reason: String },

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Verdict of a status classifier for a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    Redirection,
    ClientError,
    /// 403, usually a web application firewall rejection.
    Forbidden,
    Conflict,
    /// 418, the address has been banned after ignoring 429s.
    IpBanned,
    RateLimited,
    ServerError,
    Unexpected,
}

impl HttpErrorKind {
    pub const fn from_status(status: u16) -> Self {
        match status {
            300..=399 => Self::Redirection,
            403 => Self::Forbidden,
            409 => Self::Conflict,
            418 => Self::IpBanned,
            429 => Self::RateLimited,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unexpected,
        }
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Redirection => "unexpected redirection",
            Self::ClientError => "malformed request",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::IpBanned => "ip banned",
            Self::RateLimited => "rate limited",
            Self::ServerError => "server error",
            Self::Unexpected => "unexpected status",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: u16,
    pub kind: HttpErrorKind,
}

impl HttpError {
    pub const fn new(status: u16, kind: HttpErrorKind) -> Self {
        Self { status, kind }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("");
        write!(f, "status {} {}: {}", self.status, reason, self.kind)
    }
}

impl StdError for HttpError {}

/// Failure while decoding a response body, including exchange error envelopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    #[error("decode response body: {0}")]
    Decode(String),

    /// Error envelope with a code the exchange documents as a failure.
    /// `kind` is `None` when the code is not in the exchange's table.
    #[error("exchange error {code}: {message}")]
    Exchange {
        code: i64,
        message: String,
        kind: Option<ApiErrorKind>,
    },

    /// Error envelope with a positive code that is not a success sentinel.
    #[error("unexpected exchange code {code}: {message}")]
    UnexpectedCode { code: i64, message: String },
}

impl BodyError {
    pub fn decode(err: impl fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Exchange { code, .. } | Self::UnexpectedCode { code, .. } => Some(*code),
            Self::Decode(_) => None,
        }
    }

    pub const fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Exchange { kind, .. } => *kind,
            _ => None,
        }
    }
}

/// Errors collected after a response came back.
///
/// Every part is evaluated independently; any subset may be present.
#[derive(Debug, Default)]
pub struct ResponseFailure {
    pub transport: Option<TransportError>,
    pub http: Option<HttpError>,
    pub body: Option<BodyError>,
}

impl ResponseFailure {
    pub const fn is_empty(&self) -> bool {
        self.transport.is_none() && self.http.is_none() && self.body.is_none()
    }
}

struct Part<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for Part<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(err) => err.fmt(f),
            None => f.write_str("none"),
        }
    }
}

impl fmt::Display for ResponseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transport err: {}, http err: {}, body err: {}",
            Part(self.transport.as_ref()),
            Part(self.http.as_ref()),
            Part(self.body.as_ref()),
        )
    }
}

impl StdError for ResponseFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(body) = &self.body {
            return Some(body);
        }
        if let Some(http) = &self.http {
            return Some(http);
        }
        self.transport
            .as_ref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[derive(Error, Debug)]
pub enum RequestErrorKind {
    /// Request construction failed; nothing was sent.
    #[error("make request: {0}")]
    Build(#[source] BuildError),

    #[error("http method {0} is not supported")]
    UnsupportedMethod(Method),

    /// Transport failed without producing a response.
    #[error("request: {0}")]
    Transport(#[source] TransportError),

    /// Transport produced neither a response nor an error.
    #[error("transport returned neither a response nor an error")]
    MissingResponse,

    #[error("{0}")]
    Response(#[source] ResponseFailure),
}

/// Structured error for one executor call.
///
/// Carries the endpoint it came from so callers can log or route on it.
#[derive(Debug)]
pub struct RequestError {
    endpoint: EndpointBase,
    kind: RequestErrorKind,
}

impl RequestError {
    pub const fn new(endpoint: EndpointBase, kind: RequestErrorKind) -> Self {
        Self { endpoint, kind }
    }

    pub const fn endpoint(&self) -> &EndpointBase {
        &self.endpoint
    }

    pub const fn kind(&self) -> &RequestErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> RequestErrorKind {
        self.kind
    }

    pub const fn transport(&self) -> Option<&TransportError> {
        match &self.kind {
            RequestErrorKind::Transport(err) => Some(err),
            RequestErrorKind::Response(failure) => failure.transport.as_ref(),
            _ => None,
        }
    }

    pub const fn http(&self) -> Option<&HttpError> {
        match &self.kind {
            RequestErrorKind::Response(failure) => failure.http.as_ref(),
            _ => None,
        }
    }

    pub const fn body(&self) -> Option<&BodyError> {
        match &self.kind {
            RequestErrorKind::Response(failure) => failure.body.as_ref(),
            _ => None,
        }
    }

    /// Exchange-level cause decoded from the body, if any.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        self.body().and_then(BodyError::kind)
    }

    pub fn is(&self, kind: ApiErrorKind) -> bool {
        self.api_kind() == Some(kind)
    }

    /// Clock skew between this host and the exchange.
    pub fn is_invalid_timestamp(&self) -> bool {
        self.is(ApiErrorKind::InvalidTimestamp)
    }

    /// True when the transport broke its contract and returned nothing at all.
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self.kind, RequestErrorKind::MissingResponse)
    }

    pub const fn is_build(&self) -> bool {
        matches!(self.kind, RequestErrorKind::Build(_))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}, {}",
            self.endpoint.method, self.endpoint.base_url, self.endpoint.path, self.kind
        )
    }
}

impl StdError for RequestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.kind)
    }
}
