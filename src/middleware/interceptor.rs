//! The traffic-splitting interceptor middleware.
//!
//! This is the module's hook into the host: it sees every request after the
//! host has matched a handler, and decides whether the legacy handler runs
//! (`RO`), the new service answers instead (`RN`), or both run with the new
//! service's answer captured for offline comparison (`RP`).
//!
//! The middleware never raises into the host. Every failure becomes a
//! legacy pass-through, a synthetic error response, or a log line.

use actix_web::{
    body::BoxBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::CONTENT_TYPE,
    http::Method,
    Error, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{debug, error, info};
use std::rc::Rc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::hot_reload::ConfigManager;
use crate::middleware::capture::{CaptureBody, ShadowState};
use crate::models::mode::RoutingMode;
use crate::services::forwarder::{copy_response, outbound_method, Forwarder, FORWARDED_HEADER};
use crate::utils::body::buffer_request_body;
use crate::utils::decision::decide;

/// The single intercepted path, compared case-insensitively.
pub const INTERCEPT_PATH: &str = "/dctserver.aspx";

/// Middleware factory wrapping the host application.
///
/// Holds the two process-wide collaborators (the configuration snapshot
/// manager and the outbound forwarder) and hands clones to each worker's
/// service instance.
pub struct RequestInterceptor {
    manager: Arc<ConfigManager>,
    forwarder: Arc<Forwarder>,
}

impl RequestInterceptor {
    pub fn new(manager: Arc<ConfigManager>, forwarder: Arc<Forwarder>) -> Self {
        Self { manager, forwarder }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestInterceptor
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = InterceptorMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(InterceptorMiddleware {
            service: Rc::new(service),
            manager: self.manager.clone(),
            forwarder: self.forwarder.clone(),
        })
    }
}

pub struct InterceptorMiddleware<S> {
    service: Rc<S>,
    manager: Arc<ConfigManager>,
    forwarder: Arc<Forwarder>,
}

impl<S, B> Service<ServiceRequest> for InterceptorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let manager = self.manager.clone();
        let forwarder = self.forwarder.clone();

        Box::pin(async move {
            // Loop break: this request was emitted by this module.
            if is_forwarded(&req) {
                debug!("Request already forwarded by this module; passing through");
                return service.call(req).await.map(|res| res.map_into_boxed_body());
            }
            if !req.path().eq_ignore_ascii_case(INTERCEPT_PATH) {
                return service.call(req).await.map(|res| res.map_into_boxed_body());
            }

            // One snapshot per request.
            let config = manager.current().await;

            let mut req = req;
            let body = if req.method() == Method::POST {
                buffer_request_body(&mut req).await
            } else {
                None
            };

            match decide(req.method(), body.as_deref(), &config) {
                RoutingMode::RouteOld => {
                    service.call(req).await.map(|res| res.map_into_boxed_body())
                }
                RoutingMode::RouteNew => {
                    info!(
                        "Routing {} {} to {}",
                        req.method(),
                        req.path(),
                        config.new_service_url
                    );
                    let upstream = forwarder
                        .forward(
                            &config.new_service_url,
                            outbound_method(req.method()),
                            req.headers(),
                            content_type(&req),
                            body.as_deref(),
                        )
                        .await;

                    let response = match upstream {
                        Some(upstream) => match copy_response(upstream).await {
                            Ok(mirrored) => mirrored,
                            Err(e) => {
                                error!("Failed to mirror backend response: {}", e);
                                HttpResponse::InternalServerError().body("Error routing request")
                            }
                        },
                        None => HttpResponse::ServiceUnavailable()
                            .body("Error contacting backend service"),
                    };
                    // Complete the request here; the legacy handler never runs.
                    Ok(req.into_response(response.map_into_boxed_body()))
                }
                RoutingMode::RunParallel => {
                    info!(
                        "Shadowing {} {} to {}",
                        req.method(),
                        req.path(),
                        config.new_service_url
                    );
                    let cancel = CancellationToken::new();
                    let handle = {
                        let forwarder = forwarder.clone();
                        let url = config.new_service_url.clone();
                        let method = outbound_method(req.method());
                        let headers = req.headers().clone();
                        let content_type = content_type(&req).map(str::to_owned);
                        let body = body.clone();
                        let cancel = cancel.clone();
                        tokio::spawn(async move {
                            forwarder
                                .forward_shadow(url, method, headers, content_type, body, cancel)
                                .await
                        })
                    };

                    let res = service.call(req).await?;
                    let res = res.map_into_boxed_body().map_body(move |_, inner| {
                        CaptureBody::install(inner, ShadowState { cancel, handle })
                    });
                    Ok(res.map_into_boxed_body())
                }
            }
        })
    }
}

fn is_forwarded(req: &ServiceRequest) -> bool {
    req.headers()
        .get(FORWARDED_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn content_type(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}
