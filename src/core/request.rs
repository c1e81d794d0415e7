//! Generic request executor.
//!
//! One call builds the request through the exchange's [`RequestMaker`], sends
//! it, classifies the status, decodes the body and assembles either the typed
//! payload or a [`RequestError`]. Clock-skew rejections are retried
//! immediately, up to [`MAX_ATTEMPTS`] attempts in total.

use crate::core::endpoint::Endpoint;
use crate::core::errors::{HttpError, RequestError, RequestErrorKind, ResponseFailure};
use crate::core::kernel::rest::{
    HttpTransport, RawResponse, ReqwestTransport, RequestHook, RequestMaker,
};
use reqwest::Method;
use serde::Serialize;
use std::iter;
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::{debug, error, instrument, warn};

/// Attempts per call, first attempt included.
pub const MAX_ATTEMPTS: usize = 3;

const SUPPORTED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

pub fn is_supported_method(method: &Method) -> bool {
    SUPPORTED_METHODS.contains(method)
}

/// Executes `endpoint` with `params`.
///
/// Hooks are applied to every attempt's outbound request in order. Dropping
/// the returned future abandons the attempt in flight and any later retries.
#[instrument(
    skip_all,
    fields(method = %endpoint.base.method, path = %endpoint.base.path)
)]
pub async fn request<M, T, P, R>(
    maker: &M,
    transport: &T,
    endpoint: &Endpoint<P, R>,
    params: &P,
    hooks: &[RequestHook],
) -> Result<R, RequestError>
where
    M: RequestMaker,
    T: HttpTransport + ?Sized,
    P: Serialize,
{
    // Retries only; the first attempt is not counted here.
    let strategy = iter::repeat(Duration::ZERO).take(MAX_ATTEMPTS - 1);

    let mut attempt = 0_usize;
    RetryIf::spawn(
        strategy,
        || {
            attempt += 1;
            let current = attempt;
            async move {
                debug!(attempt = current, "sending request");
                request_once(maker, transport, endpoint, params, hooks).await
            }
        },
        |err: &RequestError| {
            let retry = err.is_invalid_timestamp();
            if retry {
                warn!(error = %err, "timestamp rejected by exchange, retrying");
            }
            retry
        },
    )
    .await
}

async fn request_once<M, T, P, R>(
    maker: &M,
    transport: &T,
    endpoint: &Endpoint<P, R>,
    params: &P,
    hooks: &[RequestHook],
) -> Result<R, RequestError>
where
    M: RequestMaker,
    T: HttpTransport + ?Sized,
    P: Serialize,
{
    let fail = |kind| RequestError::new(endpoint.base.clone(), kind);

    let request = maker
        .make(&endpoint.base, params, hooks)
        .map_err(|e| fail(RequestErrorKind::Build(e)))?;

    if !is_supported_method(&request.method) {
        return Err(fail(RequestErrorKind::UnsupportedMethod(request.method)));
    }

    let reply = transport.send(request).await;
    let response = match (reply.response, reply.error) {
        (Some(response), transport_err) => (response, transport_err),
        (None, Some(transport_err)) => {
            return Err(fail(RequestErrorKind::Transport(transport_err)));
        }
        (None, None) => {
            error!("transport returned neither a response nor an error");
            return Err(fail(RequestErrorKind::MissingResponse));
        }
    };

    let (RawResponse { status, body }, transport_err) = response;
    let http = (endpoint.classify_status)(status).map(|kind| HttpError::new(status, kind));
    let decoded = (endpoint.decode_body)(&body);

    // With a response in hand the endpoint's classifier owns the status verdict;
    // a transport-level status flag only travels along on failure.
    match decoded {
        Ok(payload) if http.is_none() => {
            if let Some(err) = &transport_err {
                debug!(error = %err, "transport flagged status, accepted by classifier");
            }
            Ok(payload)
        }
        decoded => Err(fail(RequestErrorKind::Response(ResponseFailure {
            transport: transport_err,
            http,
            body: decoded.err(),
        }))),
    }
}

/// Request maker and transport bundled with client-wide hooks.
#[derive(Clone)]
pub struct Requester<M, T = ReqwestTransport> {
    maker: M,
    transport: T,
    hooks: Vec<RequestHook>,
}

impl<M, T> Requester<M, T>
where
    M: RequestMaker,
    T: HttpTransport,
{
    pub const fn new(maker: M, transport: T) -> Self {
        Self {
            maker,
            transport,
            hooks: Vec::new(),
        }
    }

    /// Adds a hook applied before any per-call hooks.
    #[must_use]
    pub fn with_hook(mut self, hook: RequestHook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub const fn maker(&self) -> &M {
        &self.maker
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn request<P, R>(
        &self,
        endpoint: &Endpoint<P, R>,
        params: &P,
        hooks: &[RequestHook],
    ) -> Result<R, RequestError>
    where
        P: Serialize,
    {
        if hooks.is_empty() {
            return request(&self.maker, &self.transport, endpoint, params, &self.hooks).await;
        }
        let all: Vec<RequestHook> = self.hooks.iter().chain(hooks).cloned().collect();
        request(&self.maker, &self.transport, endpoint, params, &all).await
    }
}
