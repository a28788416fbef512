//! Outbound HTTP forwarding to the new backend service.
//!
//! One [`Forwarder`] is built at startup and shared process-wide; it owns
//! the pooled `reqwest` client every forwarded and shadowed request goes
//! through. All outbound requests carry the loop-break header so the module
//! never intercepts its own traffic.

use crate::models::error::RoutingError;
use actix_web::http::header::HeaderMap as InboundHeaderMap;
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::HttpResponse;
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Marker header stamped on every outbound request and honored on inbound
/// requests as a hard bypass.
pub const FORWARDED_HEADER: &str = "x-requestrouting-forwarded";

/// Inbound headers never copied onto an outbound request. Content-Type is
/// re-set explicitly from the captured value.
const FORWARD_SKIP_HEADERS: &[&str] = &[
    "host",
    "connection",
    "content-length",
    "expect",
    "transfer-encoding",
    "content-type",
];

/// Upstream headers never mirrored back to the client.
const COPY_BACK_SKIP_HEADERS: &[&str] = &["transfer-encoding", "server", "x-powered-by"];

/// Overall budget for one forwarded call, dispatch through body read.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Converts the host's method type to the outbound client's.
pub fn outbound_method(method: &actix_web::http::Method) -> Method {
    Method::from_bytes(method.as_str().as_bytes()).unwrap_or(Method::GET)
}

/// Shared outbound HTTP client for forwarded and shadowed requests.
pub struct Forwarder {
    client: Client,
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}

impl Forwarder {
    /// Builds the process-wide client. Called once at startup.
    pub fn new() -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(32)
            .timeout(FORWARD_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Forwards a request and returns the upstream response, or `None` on
    /// any transport failure or timeout (logged, never raised).
    pub async fn forward(
        &self,
        url: &str,
        method: Method,
        headers: &InboundHeaderMap,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Option<Response> {
        debug!("Forwarding {} to {}", method, url);
        match self
            .build_request(url, method, headers, content_type, body)
            .send()
            .await
        {
            Ok(response) => Some(response),
            Err(e) if e.is_timeout() => {
                error!("Forwarding to {}: {}", url, RoutingError::Timeout);
                None
            }
            Err(e) => {
                error!("Forwarding to {}: {}", url, RoutingError::Upstream(e.to_string()));
                None
            }
        }
    }

    /// Forwards a shadow copy of a request and returns the response body as
    /// text.
    ///
    /// Cancellation is observed twice: while the request is in flight, and
    /// again before the response body is read. A cancelled or failed shadow
    /// resolves to `None`; nothing is ever raised to the caller.
    pub async fn forward_shadow(
        &self,
        url: String,
        method: Method,
        headers: InboundHeaderMap,
        content_type: Option<String>,
        body: Option<Bytes>,
        cancel: CancellationToken,
    ) -> Option<String> {
        let request = self.build_request(
            &url,
            method,
            &headers,
            content_type.as_deref(),
            body.as_deref(),
        );

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Shadow request to {} cancelled in flight", url);
                return None;
            }
            result = request.send() => match result {
                Ok(response) => response,
                Err(e) => {
                    error!("Shadow request to {} failed: {}", url, e);
                    return None;
                }
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Shadow request to {} cancelled before the body was read", url);
                None
            }
            result = response.text() => match result {
                Ok(text) => Some(text),
                Err(e) => {
                    error!("Failed to read shadow response body from {}: {}", url, e);
                    None
                }
            }
        }
    }

    /// Builds the outbound request: filtered headers, the loop-break marker,
    /// and the body (POST/PUT only) with its original Content-Type.
    fn build_request(
        &self,
        url: &str,
        method: Method,
        headers: &InboundHeaderMap,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> RequestBuilder {
        let mut outbound = HeaderMap::with_capacity(headers.len() + 1);
        for (key, value) in headers {
            let name = key.as_str();
            if FORWARD_SKIP_HEADERS
                .iter()
                .any(|skip| name.eq_ignore_ascii_case(skip))
            {
                continue;
            }
            if value.as_bytes().is_empty() {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                outbound.append(name, value);
            }
        }
        outbound.insert(
            HeaderName::from_static(FORWARDED_HEADER),
            HeaderValue::from_static("true"),
        );

        let mut builder = self.client.request(method.clone(), url).headers(outbound);

        let has_body = body.map(|b| !b.is_empty()).unwrap_or(false);
        if has_body && (method == Method::POST || method == Method::PUT) {
            builder = builder.body(body.unwrap_or_default().to_vec());
            if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
                match HeaderValue::from_str(ct) {
                    Ok(value) => builder = builder.header(CONTENT_TYPE, value),
                    Err(e) => {
                        error!("Dropping unparseable Content-Type '{}': {}", ct, e)
                    }
                }
            }
        }

        builder
    }
}

/// Mirrors an upstream response into a response for the client.
///
/// Status code and headers are copied, minus the copy-back skip list;
/// multi-valued headers are joined with `,`. The body is read fully; a read
/// failure is logged and whatever was read is sent as-is.
pub async fn copy_response(upstream: Response) -> Result<HttpResponse, RoutingError> {
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| RoutingError::Mirror(format!("invalid upstream status: {}", e)))?;
    let mut builder = HttpResponse::build(status);

    let headers = upstream.headers().clone();
    for key in headers.keys() {
        let name = key.as_str();
        if COPY_BACK_SKIP_HEADERS
            .iter()
            .any(|skip| name.eq_ignore_ascii_case(skip))
        {
            continue;
        }
        let joined = headers
            .get_all(key)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        if let Ok(value) = actix_web::http::header::HeaderValue::from_str(&joined) {
            builder.insert_header((name, value));
        }
    }

    match upstream.bytes().await {
        Ok(bytes) if !bytes.is_empty() => Ok(builder.body(bytes)),
        Ok(_) => Ok(builder.finish()),
        Err(e) => {
            error!("Failed to read upstream response body: {}", e);
            Ok(builder.finish())
        }
    }
}
