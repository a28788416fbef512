//! Legacy seat handler for the standalone binary.
//!
//! The interceptor was designed to run inside the host that owns the legacy
//! handler. When shunt-rs runs as its own process, something has to sit in
//! the legacy handler's seat: this route proxies the intercepted path to the
//! origin named by `Routing.LegacyService`, through the same forwarder and
//! response mirroring the module uses for the new service.
//!
//! Embedders wrapping their own application with the interceptor mount
//! their real handler here instead and never use this module.

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;
use std::sync::Arc;

use crate::config::hot_reload::ConfigManager;
use crate::middleware::interceptor::INTERCEPT_PATH;
use crate::services::forwarder::{copy_response, outbound_method, Forwarder};

/// Proxies the request to the configured legacy origin.
pub async fn legacy_seat(
    req: HttpRequest,
    body: web::Bytes,
    manager: web::Data<Arc<ConfigManager>>,
    forwarder: web::Data<Arc<Forwarder>>,
) -> HttpResponse {
    let config = manager.current().await;
    let Some(url) = config.legacy_service_url.clone() else {
        error!("No legacy service configured for the seat handler");
        return HttpResponse::ServiceUnavailable().body("Error contacting legacy service");
    };

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let body = if body.is_empty() { None } else { Some(&body[..]) };

    match forwarder
        .forward(
            &url,
            outbound_method(req.method()),
            req.headers(),
            content_type,
            body,
        )
        .await
    {
        Some(upstream) => match copy_response(upstream).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to mirror legacy response: {}", e);
                HttpResponse::InternalServerError().finish()
            }
        },
        None => HttpResponse::ServiceUnavailable().body("Error contacting legacy service"),
    }
}

/// Mounts the seat handler on the intercepted path, any method.
pub fn configure_legacy(cfg: &mut web::ServiceConfig) {
    cfg.route(INTERCEPT_PATH, web::route().to(legacy_seat));
}
